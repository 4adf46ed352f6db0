//! Status Bar (Bottom)
//!
//! Displays:
//! - Backend in use (API base URL or demo data)
//! - Busy indicator while a request chain is in flight
//! - Status messages

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use super::MUTED;
use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(backend: &'a str, busy: bool, status: &'a str) -> Element<'a, Message> {
    let busy_info = if busy { "Saving..." } else { "" };

    row![
        text(backend).size(10).color(MUTED),
        Space::new().width(12),
        text(busy_info).size(10).color([0.6, 0.3, 0.0]),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
