//! Modal dialog component
//!
//! Overlays shown above the checklist: the notes/due-date editor, the reset
//! confirmation, and alerts. Clicking the backdrop or pressing Escape sends
//! [`Message::ModalCancel`].

use iced::widget::{button, column, container, opaque, row, text, text_editor, text_input, Space};
use iced::{Alignment, Element, Length, Padding};

use super::{DANGER, MUTED};
use crate::Message;

/// Shown before the permit type's progress is cleared
pub const RESET_CONFIRMATION: &str = "Are you sure you want to reset all progress? \
This will clear all checkmarks, notes, and due dates. This cannot be undone.";

/// Types of modal dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalType {
    /// Notes and due-date editor for one document
    Notes {
        document_id: String,
        /// Bilingual document name
        title: String,
        /// Validation or save error shown inside the dialog
        error: Option<String>,
    },
    /// Confirm clearing all progress for the current permit type
    ConfirmReset,
    /// A single-button message
    Alert(String),
}

/// Render a modal backdrop (semi-transparent overlay that catches clicks)
pub fn view_backdrop() -> Element<'static, Message> {
    button(Space::new())
        .on_press(Message::ModalCancel)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_, _| {
            iced::widget::button::Style::default()
                .with_background(iced::Color::from_rgba(0.0, 0.0, 0.0, 0.5))
        })
        .into()
}

/// Render a modal dialog based on its type
pub fn view_modal<'a>(
    modal_type: &'a ModalType,
    notes: &'a text_editor::Content,
    due_date: &'a str,
    busy: bool,
) -> Element<'a, Message> {
    match modal_type {
        ModalType::Notes { title, error, .. } => view_notes_modal(title, error.as_deref(), notes, due_date, busy),
        ModalType::ConfirmReset => view_reset_modal(busy),
        ModalType::Alert(message) => view_alert_modal(message),
    }
}

fn view_notes_modal<'a>(
    title: &'a str,
    error: Option<&'a str>,
    notes: &'a text_editor::Content,
    due_date: &'a str,
    busy: bool,
) -> Element<'a, Message> {
    let editor = text_editor(notes)
        .placeholder("Add notes about this document...")
        .on_action(Message::NotesAction)
        .height(120)
        .size(12);

    let due_row = row![
        text("Due date:").size(11).width(Length::Fixed(70.0)),
        text_input("YYYY-MM-DD", due_date)
            .on_input(Message::DueDateChanged)
            .on_submit(Message::SaveNotes)
            .width(Length::Fixed(120.0))
            .padding(4)
            .size(11),
        Space::new().width(6),
        button(text("Clear").size(11))
            .on_press(Message::ClearDueDate)
            .padding(Padding::from([4, 8]))
            .style(button::secondary),
    ]
    .align_y(Alignment::Center);

    let mut save = button(text("Save").size(11))
        .padding(Padding::from([6, 16]))
        .style(button::primary);
    if !busy {
        save = save.on_press(Message::SaveNotes);
    }

    let buttons = row![
        Space::new().width(Length::Fill),
        button(text("Cancel").size(11))
            .on_press(Message::ModalCancel)
            .padding(Padding::from([6, 16]))
            .style(button::secondary),
        Space::new().width(8),
        save,
    ]
    .align_y(Alignment::Center);

    let mut content = column![
        text("Notes").size(18),
        text(title).size(12).color(MUTED),
        Space::new().height(12),
        editor,
        Space::new().height(8),
        due_row,
    ]
    .width(Length::Fixed(420.0));

    if let Some(error) = error {
        content = content.push(Space::new().height(8));
        content = content.push(text(error).size(11).color(DANGER));
    }
    content = content.push(Space::new().height(16));
    content = content.push(buttons);

    centered(content.into())
}

fn view_reset_modal(busy: bool) -> Element<'static, Message> {
    let mut confirm = button(text("Reset").size(11))
        .padding(Padding::from([6, 16]))
        .style(button::danger);
    if !busy {
        confirm = confirm.on_press(Message::ResetConfirmed);
    }

    let buttons = row![
        Space::new().width(Length::Fill),
        button(text("Cancel").size(11))
            .on_press(Message::ModalCancel)
            .padding(Padding::from([6, 16]))
            .style(button::secondary),
        Space::new().width(8),
        confirm,
    ]
    .align_y(Alignment::Center);

    let content = column![
        text("Reset Progress?").size(18),
        Space::new().height(12),
        text(RESET_CONFIRMATION).size(12),
        Space::new().height(20),
        buttons,
    ]
    .width(Length::Fixed(400.0));

    centered(content.into())
}

fn view_alert_modal(message: &str) -> Element<'_, Message> {
    let content = column![
        text(message).size(12),
        Space::new().height(20),
        container(
            button(text("OK").size(11))
                .on_press(Message::ModalCancel)
                .padding(Padding::from([6, 16]))
                .style(button::primary)
        )
        .align_x(iced::alignment::Horizontal::Right)
        .width(Length::Fill),
    ]
    .width(Length::Fixed(360.0));

    centered(content.into())
}

/// Box the dialog and center it on screen
fn centered(content: Element<'_, Message>) -> Element<'_, Message> {
    let modal_box = container(content)
        .padding(20)
        .style(container::bordered_box);

    container(opaque(modal_box))
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
}
