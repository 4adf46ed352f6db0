//! Header (Top)
//!
//! Displays:
//! - Application title
//! - Permit type picker
//! - Description and official link of the selected permit type

use std::fmt;

use iced::widget::{button, column, container, pick_list, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use checklist_core::models::PermitType;
use checklist_core::Tracker;

use super::MUTED;
use crate::Message;

/// Entry of the permit type picker; `id: None` is the "no permit type" choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermitChoice {
    pub id: Option<String>,
    label: String,
}

impl PermitChoice {
    pub fn none() -> Self {
        PermitChoice {
            id: None,
            label: "-- Select a permit type --".to_string(),
        }
    }

    pub fn of(permit: &PermitType) -> Self {
        PermitChoice {
            id: Some(permit.id.clone()),
            label: permit.label(),
        }
    }
}

impl fmt::Display for PermitChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Render the header with the permit picker
pub fn view_header(tracker: &Tracker) -> Element<'_, Message> {
    let mut choices = vec![PermitChoice::none()];
    choices.extend(tracker.permit_types().iter().map(PermitChoice::of));
    let selected = tracker
        .current_permit()
        .map(PermitChoice::of)
        .unwrap_or_else(PermitChoice::none);

    let picker = row![
        text("Permit type:").size(12).width(Length::Fixed(90.0)),
        pick_list(choices, Some(selected), Message::PermitSelected)
            .width(Length::Fill)
            .text_size(12),
    ]
    .align_y(Alignment::Center);

    let mut content = column![
        text("Permit Document Checklist").size(28),
        text("Track the paperwork for your residence permit application")
            .size(12)
            .color(MUTED),
        Space::new().height(8),
        picker,
    ]
    .spacing(4);

    if let Some(permit) = tracker.current_permit() {
        content = content.push(Space::new().height(4));
        content = content.push(view_permit_description(permit));
    }

    content.into()
}

fn view_permit_description(permit: &PermitType) -> Element<'_, Message> {
    let mut body = column![text(&permit.description).size(12)].spacing(6);

    if !permit.official_url.is_empty() {
        body = body.push(
            button(text("📖 View official requirements").size(11))
                .on_press(Message::OpenUrl(permit.official_url.clone()))
                .padding(Padding::from([2, 0]))
                .style(button::text),
        );
    }

    if let Some(date) = &permit.last_verified {
        body = body.push(text(format!("Last verified: {date}")).size(10).color(MUTED));
    }

    container(body)
        .padding(10)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}
