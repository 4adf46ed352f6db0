//! Presentation helpers shared by every renderer: due-date badges, date
//! formatting, notes previews and the due-date input parser.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{ChecklistError, ChecklistResult};

/// A due date within this many days (and not past) is "due soon".
pub const DUE_SOON_DAYS: i64 = 7;

/// Characters kept in the notes preview before `...` is appended.
pub const NOTES_PREVIEW_CHARS: usize = 50;

/// Colouring class of a due-date badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueStatus {
    /// Due date already passed
    Overdue,
    /// Due within [`DUE_SOON_DAYS`]
    DueSoon,
    /// Far enough away to need no highlight
    Scheduled,
}

impl DueStatus {
    /// Classify a due date against `today`.
    ///
    /// Returns `None` when there is no due date (no badge is shown).
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use checklist_core::display::DueStatus;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    /// let due = NaiveDate::from_ymd_opt(2026, 10, 22);
    /// assert_eq!(DueStatus::classify(due, today), Some(DueStatus::DueSoon));
    /// ```
    pub fn classify(due_date: Option<NaiveDate>, today: NaiveDate) -> Option<DueStatus> {
        let due = due_date?;
        let days_left = (due - today).num_days();
        Some(if days_left < 0 {
            DueStatus::Overdue
        } else if days_left <= DUE_SOON_DAYS {
            DueStatus::DueSoon
        } else {
            DueStatus::Scheduled
        })
    }

    /// CSS-style class name, handy for logs and snapshot tests
    pub fn class_name(&self) -> &'static str {
        match self {
            DueStatus::Overdue => "overdue",
            DueStatus::DueSoon => "due-soon",
            DueStatus::Scheduled => "",
        }
    }
}

/// `5 Mar 2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Truncate to `max_chars` characters, appending `...` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Notes preview for a document card
pub fn notes_preview(notes: &str) -> String {
    truncate(notes, NOTES_PREVIEW_CHARS)
}

/// `Valid for 90 days`
pub fn validity_hint(days: u32) -> String {
    format!("Valid for {days} days")
}

/// Parse the due-date input field: empty clears the date, otherwise `YYYY-MM-DD`.
pub fn parse_due_date_input(raw: &str) -> ChecklistResult<Option<NaiveDate>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| ChecklistError::invalid_input("due_date", raw, format!("expected YYYY-MM-DD ({e})")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_badge_classification() {
        let t = today();
        assert_eq!(DueStatus::classify(Some(t - Duration::days(1)), t), Some(DueStatus::Overdue));
        assert_eq!(DueStatus::classify(Some(t + Duration::days(3)), t), Some(DueStatus::DueSoon));
        assert_eq!(DueStatus::classify(Some(t + Duration::days(30)), t), Some(DueStatus::Scheduled));
        assert_eq!(DueStatus::classify(None, t), None);
    }

    #[test]
    fn test_badge_boundaries() {
        let t = today();
        assert_eq!(DueStatus::classify(Some(t), t), Some(DueStatus::DueSoon));
        assert_eq!(DueStatus::classify(Some(t + Duration::days(7)), t), Some(DueStatus::DueSoon));
        assert_eq!(DueStatus::classify(Some(t + Duration::days(8)), t), Some(DueStatus::Scheduled));
    }

    #[test]
    fn test_class_names() {
        assert_eq!(DueStatus::Overdue.class_name(), "overdue");
        assert_eq!(DueStatus::DueSoon.class_name(), "due-soon");
        assert_eq!(DueStatus::Scheduled.class_name(), "");
    }

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(format_date(d), "5 Mar 2026");
        let d = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert_eq!(format_date(d), "25 Dec 2026");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 50), "short");
        let exact = "x".repeat(50);
        assert_eq!(truncate(&exact, 50), exact);
        let long = "y".repeat(51);
        assert_eq!(truncate(&long, 50), format!("{}...", "y".repeat(50)));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let accented = "é".repeat(60);
        let preview = notes_preview(&accented);
        assert_eq!(preview.chars().count(), 53);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_parse_due_date_input() {
        assert_eq!(parse_due_date_input("").unwrap(), None);
        assert_eq!(parse_due_date_input("  ").unwrap(), None);
        assert_eq!(
            parse_due_date_input("2026-11-02").unwrap(),
            NaiveDate::from_ymd_opt(2026, 11, 2)
        );
        let err = parse_due_date_input("02/11/2026").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_validity_hint() {
        assert_eq!(validity_hint(90), "Valid for 90 days");
    }
}
