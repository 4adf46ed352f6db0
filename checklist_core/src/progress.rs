//! # Progress Aggregation
//!
//! `completed = count(is_complete)`, `percentage = round(100 * completed / total)`,
//! and 0% for an empty checklist. The backend reports the same numbers through
//! `GET /progress/{permit}`; the client computes them locally for per-category
//! counters and as a fallback when a progress refresh fails.

use serde::{Deserialize, Serialize};

use crate::models::{Document, ProgressSummary};

impl ProgressSummary {
    /// Build a summary from raw counts.
    ///
    /// `completed` is clamped to `total`.
    ///
    /// ```rust
    /// use checklist_core::models::ProgressSummary;
    ///
    /// let p = ProgressSummary::new(1, 4);
    /// assert_eq!((p.completed, p.total, p.percentage), (1, 4, 25));
    /// ```
    pub fn new(completed: u32, total: u32) -> Self {
        let completed = completed.min(total);
        ProgressSummary {
            completed,
            total,
            remaining: total - completed,
            percentage: percentage(completed, total),
        }
    }

    /// Summarise a document list.
    pub fn from_documents<'a>(documents: impl IntoIterator<Item = &'a Document>) -> Self {
        let (completed, total) = documents
            .into_iter()
            .fold((0u32, 0u32), |(done, all), doc| (done + u32::from(doc.is_complete), all + 1));
        ProgressSummary::new(completed, total)
    }

    /// Colour band for the percentage label
    pub fn tone(&self) -> ProgressTone {
        ProgressTone::for_percentage(self.percentage)
    }

    /// `"2 of 4 documents completed"`
    pub fn stats_line(&self) -> String {
        format!("{} of {} documents completed", self.completed, self.total)
    }
}

impl Default for ProgressSummary {
    fn default() -> Self {
        ProgressSummary::new(0, 0)
    }
}

/// Rounded completion percentage (half rounds up), 0 for an empty list.
pub fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((u64::from(completed) * 200 + u64::from(total)) / (u64::from(total) * 2)) as u32
}

/// Colour band used to tint the percentage label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressTone {
    /// Everything done
    Complete,
    /// At least half done
    Halfway,
    /// Less than half done
    Started,
}

impl ProgressTone {
    pub fn for_percentage(percentage: u32) -> Self {
        if percentage >= 100 {
            ProgressTone::Complete
        } else if percentage >= 50 {
            ProgressTone::Halfway
        } else {
            ProgressTone::Started
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, done: bool) -> Document {
        let mut d: Document =
            serde_json::from_str(&format!(r#"{{"id":"{id}","name_en":"{id}","name_fr":"{id}"}}"#)).unwrap();
        d.is_complete = done;
        d
    }

    #[test]
    fn test_empty_is_zero_percent() {
        let p = ProgressSummary::from_documents(&Vec::<Document>::new());
        assert_eq!(p, ProgressSummary { completed: 0, total: 0, remaining: 0, percentage: 0 });
    }

    #[test]
    fn test_one_of_four() {
        let docs = vec![doc("a", true), doc("b", false), doc("c", false), doc("d", false)];
        let p = ProgressSummary::from_documents(&docs);
        assert_eq!((p.completed, p.total, p.remaining, p.percentage), (1, 4, 3, 25));
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(7, 7), 100);
        assert_eq!(percentage(0, 5), 0);
    }

    #[test]
    fn test_percentage_matches_float_round_for_small_lists() {
        for total in 1..=40u32 {
            for completed in 0..=total {
                let expected = (100.0 * completed as f64 / total as f64).round() as u32;
                assert_eq!(percentage(completed, total), expected, "{completed}/{total}");
            }
        }
    }

    #[test]
    fn test_completed_clamped() {
        assert_eq!(ProgressSummary::new(5, 3).completed, 3);
    }

    #[test]
    fn test_tone_bands() {
        assert_eq!(ProgressSummary::new(4, 4).tone(), ProgressTone::Complete);
        assert_eq!(ProgressSummary::new(2, 4).tone(), ProgressTone::Halfway);
        assert_eq!(ProgressSummary::new(1, 4).tone(), ProgressTone::Started);
        assert_eq!(ProgressSummary::new(0, 0).tone(), ProgressTone::Started);
    }

    #[test]
    fn test_stats_line() {
        assert_eq!(ProgressSummary::new(2, 4).stats_line(), "2 of 4 documents completed");
    }
}
