//! Documents Panel
//!
//! Displays the checklist grouped by category, in the fixed category order:
//! - Category header with icon and `completed/total` counter
//! - Document cards with checkbox, bilingual title, link, hints and notes preview

use chrono::NaiveDate;
use iced::widget::{button, checkbox, column, container, row, rule, text, Column, Space};
use iced::{Alignment, Color, Element, Length, Padding};

use checklist_core::display::{format_date, notes_preview, validity_hint, DueStatus};
use checklist_core::grouping::CategoryGroup;
use checklist_core::{Document, Tracker};

use super::{DANGER, MUTED};
use crate::Message;

/// Badge colour for a due-date status
fn due_color(status: DueStatus) -> [f32; 3] {
    match status {
        DueStatus::Overdue => DANGER,
        DueStatus::DueSoon => [0.824, 0.6, 0.133],
        DueStatus::Scheduled => MUTED,
    }
}

/// Render all category groups
pub fn view_documents_panel(tracker: &Tracker, today: NaiveDate, busy: bool) -> Element<'_, Message> {
    let groups = tracker.groups();
    if groups.is_empty() {
        return text("No documents for this selection.").size(12).color(MUTED).into();
    }

    let mut panel: Column<'_, Message> = column![text("Required documents").size(14)].spacing(12);
    for group in groups {
        panel = panel.push(view_category(group, today, busy));
    }
    panel.into()
}

fn view_category(group: CategoryGroup<'_>, today: NaiveDate, busy: bool) -> Element<'_, Message> {
    let header = row![
        text(group.icon.clone()).size(16),
        Space::new().width(6),
        text(group.title.clone()).size(13),
        Space::new().width(Length::Fill),
        text(group.counter()).size(11).color(MUTED),
    ]
    .align_y(Alignment::Center);

    let mut cards: Column<'_, Message> = column![].spacing(4);
    for doc in group.documents {
        cards = cards.push(view_document(doc, today, busy));
    }

    container(column![header, rule::horizontal(1), cards].spacing(6))
        .padding(8)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}

fn view_document(doc: &Document, today: NaiveDate, busy: bool) -> Element<'_, Message> {
    let mut done = checkbox(doc.is_complete);
    if !busy {
        let id = doc.id.clone();
        done = done.on_toggle(move |_| Message::ToggleDocument(id.clone()));
    }

    let title = column![
        text(&doc.name_fr)
            .size(13)
            .color_maybe(doc.is_complete.then(|| Color::from(MUTED))),
        text(&doc.name_en).size(11).color(MUTED),
    ];

    let mut meta = row![].spacing(12).align_y(Alignment::Center);
    meta = match &doc.link {
        Some(url) => meta.push(
            button(text(format!("🔗 {}", doc.link_text)).size(11))
                .on_press(Message::OpenUrl(url.clone()))
                .padding(0)
                .style(button::text),
        ),
        None => meta.push(text(format!("ℹ️ {}", doc.link_text)).size(11).color(MUTED)),
    };
    if let Some(days) = doc.validity_days {
        meta = meta.push(text(validity_hint(days)).size(10).color(MUTED));
    }
    if let (Some(date), Some(status)) = (doc.due_date, DueStatus::classify(doc.due_date, today)) {
        meta = meta.push(
            text(format!("📅 {}", format_date(date)))
                .size(10)
                .color(due_color(status)),
        );
    }

    let mut body = column![title].spacing(4);
    if !doc.description.is_empty() {
        body = body.push(text(&doc.description).size(11));
    }
    body = body.push(meta);
    if let Some(notes) = doc.notes_text() {
        body = body.push(text(format!("📝 {}", notes_preview(notes))).size(10).color(MUTED));
    }

    let mut notes_button = button(text("📝").size(12))
        .padding(Padding::from([2, 6]))
        .style(if doc.notes_text().is_some() { button::primary } else { button::secondary });
    if !busy {
        notes_button = notes_button.on_press(Message::OpenNotes(doc.id.clone()));
    }

    row![done, body.width(Length::Fill), notes_button]
        .spacing(8)
        .padding(Padding::from([6, 4]))
        .align_y(Alignment::Start)
        .into()
}
