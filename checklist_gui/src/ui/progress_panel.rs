//! Progress panel
//!
//! Bar, tinted percentage, "N of M documents completed" and the reset button.

use iced::widget::{button, column, container, progress_bar, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use checklist_core::progress::ProgressTone;
use checklist_core::ProgressSummary;

use crate::Message;

/// Percentage colour for a tone
pub fn tone_color(tone: ProgressTone) -> [f32; 3] {
    match tone {
        ProgressTone::Complete => [0.247, 0.725, 0.314],
        ProgressTone::Halfway => [0.345, 0.651, 1.0],
        ProgressTone::Started => [0.824, 0.6, 0.133],
    }
}

/// Render the progress summary
pub fn view_progress_panel(progress: ProgressSummary, busy: bool) -> Element<'static, Message> {
    let mut reset = button(text("Reset progress").size(11))
        .padding(Padding::from([4, 8]))
        .style(button::secondary);
    if !busy {
        reset = reset.on_press(Message::ResetRequested);
    }

    let content = column![
        row![
            text("Progress").size(14),
            Space::new().width(Length::Fill),
            text(format!("{}%", progress.percentage))
                .size(22)
                .color(tone_color(progress.tone())),
        ]
        .align_y(Alignment::Center),
        progress_bar(0.0..=100.0, progress.percentage as f32),
        row![
            text(progress.stats_line()).size(11),
            Space::new().width(Length::Fill),
            reset,
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(8);

    container(content)
        .padding(10)
        .width(Length::Fill)
        .style(container::bordered_box)
        .into()
}
