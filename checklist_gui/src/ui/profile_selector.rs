//! Profile selector
//!
//! One checkbox per non-common profile; `common` is always applied and not shown.

use iced::widget::{checkbox, column, row, text};
use iced::Element;

use checklist_core::Tracker;

use super::MUTED;
use crate::Message;

const DEFAULT_ICON: &str = "📋";

/// Render the profile checkboxes. Toggling is disabled while `busy`.
pub fn view_profile_selector(tracker: &Tracker, busy: bool) -> Element<'_, Message> {
    let mut chips = row![].spacing(16);

    for (id, profile) in tracker.selectable_profiles() {
        let label = format!("{} {}", profile.icon.as_deref().unwrap_or(DEFAULT_ICON), profile.name_en);
        let mut chip = checkbox(tracker.selected_profiles().contains(id))
            .label(label)
            .text_size(12);
        if !busy {
            let id = id.to_string();
            chip = chip.on_toggle(move |_| Message::ProfileToggled(id.clone()));
        }
        chips = chips.push(chip);
    }

    column![
        text("Your situation").size(14),
        text("Select what applies to you to show the relevant documents")
            .size(11)
            .color(MUTED),
        chips.wrap(),
    ]
    .spacing(6)
    .into()
}
