//! # Checklist API Client
//!
//! One method per backend endpoint on the [`ChecklistApi`] trait. Every
//! implementation unwraps the `{success, data}` envelope and reports network
//! failures, non-2xx statuses and `success: false` replies as errors; callers
//! decide recovery.
//!
//! - [`http::HttpApi`] - reqwest-backed client for a real server
//! - [`memory::MemoryApi`] - in-process backend for tests and demo mode
//!
//! ## Endpoints
//!
//! ```text
//! GET  categories | profiles | permit-types | important-links | metadata | user-settings
//! GET  documents/{permit}?profiles=csv     GET progress/{permit}?profiles=csv
//! POST documents/{id}/complete | incomplete | notes {notes} | due-date {due_date}
//! POST user-settings/profiles {profiles}   POST reset/{permit}
//! ```

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde_json::{json, Value};

use crate::errors::ChecklistResult;
use crate::models::{CategoryMap, Document, ImportantLink, Metadata, PermitType, ProfileMap, ProgressSummary, UserSettings};
use crate::selection::ProfileSelection;

pub mod http;
pub mod memory;

pub use http::HttpApi;
pub use memory::{Catalog, MemoryApi};

/// Typed access to the checklist backend.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ChecklistApi: Send + Sync {
    async fn categories(&self) -> ChecklistResult<CategoryMap>;

    async fn profiles(&self) -> ChecklistResult<ProfileMap>;

    async fn permit_types(&self) -> ChecklistResult<Vec<PermitType>>;

    async fn important_links(&self) -> ChecklistResult<Vec<ImportantLink>>;

    async fn metadata(&self) -> ChecklistResult<Metadata>;

    async fn user_settings(&self) -> ChecklistResult<UserSettings>;

    /// Documents of a permit type that apply under `profiles`
    async fn documents(&self, permit_id: &str, profiles: &ProfileSelection) -> ChecklistResult<Vec<Document>>;

    /// Progress of a permit type under `profiles`
    async fn progress(&self, permit_id: &str, profiles: &ProfileSelection) -> ChecklistResult<ProgressSummary>;

    async fn mark_complete(&self, document_id: &str) -> ChecklistResult<()>;

    async fn mark_incomplete(&self, document_id: &str) -> ChecklistResult<()>;

    async fn update_notes(&self, document_id: &str, notes: &str) -> ChecklistResult<()>;

    async fn update_due_date(&self, document_id: &str, due_date: Option<NaiveDate>) -> ChecklistResult<()>;

    /// Persist the profile selection as a user preference
    async fn save_profiles(&self, profiles: &ProfileSelection) -> ChecklistResult<()>;

    /// Clear completion flags, notes and due dates for a permit type
    async fn reset(&self, permit_id: &str) -> ChecklistResult<()>;
}

/// Endpoint family, without per-call arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointKind {
    Categories,
    Profiles,
    PermitTypes,
    ImportantLinks,
    Metadata,
    UserSettings,
    Documents,
    Progress,
    Complete,
    Incomplete,
    Notes,
    DueDate,
    SaveProfiles,
    Reset,
}

/// A fully specified API call: method, path, query and JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Categories,
    Profiles,
    PermitTypes,
    ImportantLinks,
    Metadata,
    UserSettings,
    Documents { permit_id: String, profiles: ProfileSelection },
    Progress { permit_id: String, profiles: ProfileSelection },
    Complete { document_id: String },
    Incomplete { document_id: String },
    Notes { document_id: String, notes: String },
    DueDate { document_id: String, due_date: Option<NaiveDate> },
    SaveProfiles { profiles: ProfileSelection },
    Reset { permit_id: String },
}

impl Endpoint {
    pub fn kind(&self) -> EndpointKind {
        match self {
            Endpoint::Categories => EndpointKind::Categories,
            Endpoint::Profiles => EndpointKind::Profiles,
            Endpoint::PermitTypes => EndpointKind::PermitTypes,
            Endpoint::ImportantLinks => EndpointKind::ImportantLinks,
            Endpoint::Metadata => EndpointKind::Metadata,
            Endpoint::UserSettings => EndpointKind::UserSettings,
            Endpoint::Documents { .. } => EndpointKind::Documents,
            Endpoint::Progress { .. } => EndpointKind::Progress,
            Endpoint::Complete { .. } => EndpointKind::Complete,
            Endpoint::Incomplete { .. } => EndpointKind::Incomplete,
            Endpoint::Notes { .. } => EndpointKind::Notes,
            Endpoint::DueDate { .. } => EndpointKind::DueDate,
            Endpoint::SaveProfiles { .. } => EndpointKind::SaveProfiles,
            Endpoint::Reset { .. } => EndpointKind::Reset,
        }
    }

    pub fn method(&self) -> Method {
        match self.kind() {
            EndpointKind::Complete
            | EndpointKind::Incomplete
            | EndpointKind::Notes
            | EndpointKind::DueDate
            | EndpointKind::SaveProfiles
            | EndpointKind::Reset => Method::POST,
            _ => Method::GET,
        }
    }

    /// Path segments below the API base (ids are separate, unescaped segments)
    pub fn segments(&self) -> Vec<&str> {
        match self {
            Endpoint::Categories => vec!["categories"],
            Endpoint::Profiles => vec!["profiles"],
            Endpoint::PermitTypes => vec!["permit-types"],
            Endpoint::ImportantLinks => vec!["important-links"],
            Endpoint::Metadata => vec!["metadata"],
            Endpoint::UserSettings => vec!["user-settings"],
            Endpoint::Documents { permit_id, .. } => vec!["documents", permit_id.as_str()],
            Endpoint::Progress { permit_id, .. } => vec!["progress", permit_id.as_str()],
            Endpoint::Complete { document_id } => vec!["documents", document_id.as_str(), "complete"],
            Endpoint::Incomplete { document_id } => vec!["documents", document_id.as_str(), "incomplete"],
            Endpoint::Notes { document_id, .. } => vec!["documents", document_id.as_str(), "notes"],
            Endpoint::DueDate { document_id, .. } => vec!["documents", document_id.as_str(), "due-date"],
            Endpoint::SaveProfiles { .. } => vec!["user-settings", "profiles"],
            Endpoint::Reset { permit_id } => vec!["reset", permit_id.as_str()],
        }
    }

    /// `profiles` query parameter, for the per-permit queries
    pub fn query(&self) -> Option<(&'static str, String)> {
        match self {
            Endpoint::Documents { profiles, .. } | Endpoint::Progress { profiles, .. } => {
                Some(("profiles", profiles.to_csv()))
            }
            _ => None,
        }
    }

    /// JSON request body, for the mutations that take one
    pub fn body(&self) -> Option<Value> {
        match self {
            Endpoint::Notes { notes, .. } => Some(json!({ "notes": notes })),
            Endpoint::DueDate { due_date, .. } => Some(json!({ "due_date": due_date })),
            Endpoint::SaveProfiles { profiles } => Some(json!({ "profiles": profiles.to_vec() })),
            _ => None,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method(), self.segments().join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reference_endpoints_are_plain_gets() {
        for (endpoint, path) in [
            (Endpoint::Categories, "GET /categories"),
            (Endpoint::Profiles, "GET /profiles"),
            (Endpoint::PermitTypes, "GET /permit-types"),
            (Endpoint::ImportantLinks, "GET /important-links"),
            (Endpoint::Metadata, "GET /metadata"),
            (Endpoint::UserSettings, "GET /user-settings"),
        ] {
            assert_eq!(endpoint.to_string(), path);
            assert!(endpoint.query().is_none());
            assert!(endpoint.body().is_none());
        }
    }

    #[test]
    fn test_document_mutations() {
        let id = "cr_passport".to_string();
        assert_eq!(
            Endpoint::Complete { document_id: id.clone() }.to_string(),
            "POST /documents/cr_passport/complete"
        );
        assert_eq!(
            Endpoint::Incomplete { document_id: id.clone() }.to_string(),
            "POST /documents/cr_passport/incomplete"
        );

        let notes = Endpoint::Notes { document_id: id.clone(), notes: "ask HR".into() };
        assert_eq!(notes.to_string(), "POST /documents/cr_passport/notes");
        assert_eq!(notes.body(), Some(json!({ "notes": "ask HR" })));

        let due = Endpoint::DueDate { document_id: id.clone(), due_date: NaiveDate::from_ymd_opt(2026, 11, 2) };
        assert_eq!(due.to_string(), "POST /documents/cr_passport/due-date");
        assert_eq!(due.body(), Some(json!({ "due_date": "2026-11-02" })));

        let cleared = Endpoint::DueDate { document_id: id, due_date: None };
        assert_eq!(cleared.body(), Some(json!({ "due_date": null })));
    }

    #[test]
    fn test_permit_queries_carry_profiles() {
        let profiles = ProfileSelection::from_ids(["married"]);
        let docs = Endpoint::Documents { permit_id: "titre_sejour".into(), profiles: profiles.clone() };
        assert_eq!(docs.to_string(), "GET /documents/titre_sejour");
        assert_eq!(docs.query(), Some(("profiles", "common,married".to_string())));

        let progress = Endpoint::Progress { permit_id: "titre_sejour".into(), profiles };
        assert_eq!(progress.method(), Method::GET);
        assert_eq!(progress.query(), Some(("profiles", "common,married".to_string())));
    }

    #[test]
    fn test_settings_and_reset() {
        let save = Endpoint::SaveProfiles { profiles: ProfileSelection::from_ids(["children"]) };
        assert_eq!(save.to_string(), "POST /user-settings/profiles");
        assert_eq!(save.body(), Some(json!({ "profiles": ["children", "common"] })));

        let reset = Endpoint::Reset { permit_id: "carte_resident".into() };
        assert_eq!(reset.to_string(), "POST /reset/carte_resident");
        assert_eq!(reset.kind(), EndpointKind::Reset);
    }
}
