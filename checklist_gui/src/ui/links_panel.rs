//! Important links panel

use iced::widget::{button, column, container, text, Column};
use iced::{Element, Length, Padding};

use checklist_core::models::{ImportantLink, Metadata};

use super::MUTED;
use crate::Message;

/// Render the important links and the "last verified" line
pub fn view_links_panel<'a>(links: &'a [ImportantLink], metadata: &'a Metadata) -> Element<'a, Message> {
    let mut content: Column<'_, Message> = column![text("Important links").size(14)].spacing(6);

    for link in links {
        let entry = column![
            text(&link.name_fr).size(12),
            text(&link.name_en).size(10).color(MUTED),
            text(&link.description).size(10),
        ]
        .spacing(2);
        content = content.push(
            button(entry)
                .on_press(Message::OpenUrl(link.url.clone()))
                .padding(Padding::from([4, 6]))
                .width(Length::Fill)
                .style(button::text),
        );
    }

    if let Some(date) = &metadata.last_verified {
        content = content.push(
            text(format!("Requirements last verified: {date}"))
                .size(10)
                .color(MUTED),
        );
    }

    container(content)
        .padding(10)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}
