//! # Data Model
//!
//! Wire types for the checklist API. Field names follow the JSON the backend
//! emits (`name_en`, `is_complete`, `due_date`, ...), so every type here
//! round-trips through `serde_json` without renames.
//!
//! ## Structure
//!
//! ```text
//! Envelope<T>        {success, data?, error?}
//! PermitType         immutable reference data
//! Category, Profile  immutable reference data (served as id-keyed maps)
//! Document           backend-owned; cached and optimistically mutated
//! ProgressSummary    derived {completed, total, remaining, percentage}
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Profile id that is always part of the active selection.
pub const COMMON_PROFILE: &str = "common";

/// Categories keyed by id, as served by `GET /categories`.
pub type CategoryMap = BTreeMap<String, Category>;

/// Profiles keyed by id, as served by `GET /profiles`.
pub type ProfileMap = BTreeMap<String, Profile>;

/// The `{success, data}` envelope wrapping every API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Server-side error message, present on some `success: false` replies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A kind of administrative application with its own checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitType {
    pub id: String,
    pub name_en: String,
    pub name_fr: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub official_url: String,
    #[serde(default)]
    pub last_verified: Option<String>,
}

impl PermitType {
    /// Selector label, e.g. `Residence Permit (Renewal) (Titre de Séjour)`
    pub fn label(&self) -> String {
        format!("{} ({})", self.name_en, self.name_fr)
    }
}

/// Document category (identity, financial, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name_en: String,
    #[serde(default)]
    pub name_fr: String,
    #[serde(default)]
    pub icon: String,
}

/// Applicant attribute that decides which documents apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name_en: String,
    #[serde(default)]
    pub name_fr: String,
    #[serde(default)]
    pub icon: Option<String>,
}

/// A required document and its completion state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    /// Category id; `None` lands in the "other" bucket
    #[serde(default)]
    pub category: Option<String>,

    pub name_en: String,
    pub name_fr: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub link: Option<String>,

    #[serde(default)]
    pub link_text: String,

    #[serde(default)]
    pub validity_days: Option<u32>,

    /// SQLite-backed servers send 0/1 here
    #[serde(default, deserialize_with = "bool_from_int_or_bool")]
    pub is_complete: bool,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    /// Profiles this document applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profiles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
}

impl Document {
    /// Modal heading, e.g. `Valid Passport (Passeport valide)`
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name_en, self.name_fr)
    }

    /// Notes with surrounding whitespace removed, `None` when blank
    pub fn notes_text(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Whether the document applies under the given profile ids.
    ///
    /// A document with no profile list shares none with the selection.
    pub fn applies_to<'a>(&self, mut selected: impl Iterator<Item = &'a str>) -> bool {
        selected.any(|p| self.profiles.iter().any(|own| own == p))
    }
}

/// Aggregate progress for a permit type under the active profile filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawProgress")]
pub struct ProgressSummary {
    pub completed: u32,
    pub total: u32,
    pub remaining: u32,
    pub percentage: u32,
}

/// Lenient wire form: `remaining` may be missing and `percentage` may be a float.
#[derive(Deserialize)]
struct RawProgress {
    completed: u32,
    total: u32,
    #[serde(default)]
    remaining: Option<u32>,
    #[serde(default)]
    percentage: Option<f64>,
}

impl From<RawProgress> for ProgressSummary {
    fn from(raw: RawProgress) -> Self {
        let computed = ProgressSummary::new(raw.completed, raw.total);
        ProgressSummary {
            remaining: raw.remaining.unwrap_or(computed.remaining),
            percentage: raw
                .percentage
                .map(|p| p.round().clamp(0.0, 100.0) as u32)
                .unwrap_or(computed.percentage),
            ..computed
        }
    }
}

/// External link shown in the "important links" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportantLink {
    pub name_en: String,
    #[serde(default)]
    pub name_fr: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// Optional catalogue metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub last_verified: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

/// Persisted user preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub selected_profiles: Option<Vec<String>>,
}

/// Timestamp format used for `completed_at`
pub fn completion_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn bool_from_int_or_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
        Flag::Null(()) => false,
    })
}
