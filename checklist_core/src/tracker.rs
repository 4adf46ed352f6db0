//! # View State
//!
//! [`Tracker`] holds everything the UI renders: reference data loaded at
//! startup, the selected permit type and profiles, the cached document list
//! and its progress summary, and which document the notes editor is open on.
//! It is mutated only through the named methods below and never performs I/O;
//! the async side lives in [`crate::session`].
//!
//! ## Invariants
//!
//! - the profile selection always contains `common`
//! - `documents` and `progress` always belong to [`Tracker::checklist_key`];
//!   replies for any other key are dropped by [`Tracker::apply_checklist`]
//! - an optimistic toggle is a [`PendingToggle`] that is consumed exactly once,
//!   by [`Tracker::commit_toggle`] or [`Tracker::rollback_toggle`]; both are
//!   no-ops once the checklist it was taken on is no longer current

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ChecklistError, ChecklistResult};
use crate::grouping::{group_documents, CategoryGroup};
use crate::models::{
    CategoryMap, Document, ImportantLink, Metadata, PermitType, Profile, ProfileMap, ProgressSummary, COMMON_PROFILE,
};
use crate::selection::ProfileSelection;

/// Identifies one checklist fetch: a permit type under a profile filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChecklistKey {
    pub permit_id: String,
    pub profiles: ProfileSelection,
}

/// A fetched checklist, tagged with the key it was requested for.
#[derive(Debug, Clone, PartialEq)]
pub struct Checklist {
    pub key: ChecklistKey,
    pub documents: Vec<Document>,
    pub progress: ProgressSummary,
}

/// Everything loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    pub categories: CategoryMap,
    pub profiles: ProfileMap,
    pub permit_types: Vec<PermitType>,
    pub important_links: Vec<ImportantLink>,
    pub metadata: Metadata,
    pub selected_profiles: ProfileSelection,
}

/// An optimistic completion flip awaiting the server's answer.
///
/// Not `Clone`; it goes back to the tracker exactly once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending toggle must be committed or rolled back"]
pub struct PendingToggle {
    key: ChecklistKey,
    document_id: String,
    previous: bool,
    target: bool,
}

impl PendingToggle {
    /// Checklist the flip was made on
    pub fn key(&self) -> &ChecklistKey {
        &self.key
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Completion state the mutation asks for
    pub fn target(&self) -> bool {
        self.target
    }

    pub fn previous(&self) -> bool {
        self.previous
    }
}

/// Editable copy of a document's notes and due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesDraft {
    pub document_id: String,
    /// Bilingual document name for the dialog heading
    pub title: String,
    pub notes: String,
    /// Due date as typed, `YYYY-MM-DD` or empty
    pub due_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct Tracker {
    categories: CategoryMap,
    profiles: ProfileMap,
    permit_types: Vec<PermitType>,
    important_links: Vec<ImportantLink>,
    metadata: Metadata,

    current_permit: Option<String>,
    selected_profiles: ProfileSelection,
    documents: Vec<Document>,
    progress: Option<ProgressSummary>,
    editing_doc_id: Option<String>,
}

impl Tracker {
    pub fn new(reference: ReferenceData) -> Self {
        Tracker {
            categories: reference.categories,
            profiles: reference.profiles,
            permit_types: reference.permit_types,
            important_links: reference.important_links,
            metadata: reference.metadata,
            selected_profiles: reference.selected_profiles,
            ..Tracker::default()
        }
    }

    pub fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    pub fn permit_types(&self) -> &[PermitType] {
        &self.permit_types
    }

    pub fn important_links(&self) -> &[ImportantLink] {
        &self.important_links
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn current_permit(&self) -> Option<&PermitType> {
        let id = self.current_permit.as_deref()?;
        self.permit_types.iter().find(|p| p.id == id)
    }

    pub fn selected_profiles(&self) -> &ProfileSelection {
        &self.selected_profiles
    }

    /// Profiles offered as checkboxes (`common` is implied), in id order
    pub fn selectable_profiles(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles
            .iter()
            .filter(|(id, _)| id.as_str() != COMMON_PROFILE)
            .map(|(id, profile)| (id.as_str(), profile))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == document_id)
    }

    /// Last known progress, `None` until the first checklist arrives
    pub fn progress(&self) -> Option<ProgressSummary> {
        self.progress
    }

    pub fn editing_doc_id(&self) -> Option<&str> {
        self.editing_doc_id.as_deref()
    }

    /// Documents grouped for rendering
    pub fn groups(&self) -> Vec<CategoryGroup<'_>> {
        group_documents(&self.documents, &self.categories)
    }

    /// Key the cached checklist must belong to, `None` without a permit type
    pub fn checklist_key(&self) -> Option<ChecklistKey> {
        self.current_permit.as_ref().map(|permit_id| ChecklistKey {
            permit_id: permit_id.clone(),
            profiles: self.selected_profiles.clone(),
        })
    }

    /// Switch permit type. Returns the checklist to fetch.
    ///
    /// `None`, a blank id or an unknown id clears the selection.
    pub fn select_permit(&mut self, permit_id: Option<&str>) -> Option<ChecklistKey> {
        let known = permit_id
            .map(str::trim)
            .filter(|id| self.permit_types.iter().any(|p| p.id == *id));
        match known {
            Some(id) => {
                if self.current_permit.as_deref() != Some(id) {
                    self.documents.clear();
                    self.progress = None;
                    self.editing_doc_id = None;
                }
                self.current_permit = Some(id.to_string());
                self.checklist_key()
            }
            None => {
                self.clear_permit();
                None
            }
        }
    }

    /// Hide all permit-dependent state.
    pub fn clear_permit(&mut self) {
        self.current_permit = None;
        self.documents.clear();
        self.progress = None;
        self.editing_doc_id = None;
    }

    /// Flip a profile in or out of the filter.
    ///
    /// Returns the checklist to refetch when a permit type is selected.
    pub fn toggle_profile(&mut self, profile_id: &str) -> Option<ChecklistKey> {
        if profile_id == COMMON_PROFILE {
            return None;
        }
        let selected = self.selected_profiles.toggle(profile_id);
        debug!(profile = profile_id, selected, "profile toggled");
        self.checklist_key()
    }

    /// Install a fetched checklist if it still matches the current key.
    ///
    /// Returns `false` (and changes nothing) for a stale reply.
    pub fn apply_checklist(&mut self, checklist: Checklist) -> bool {
        if self.checklist_key().as_ref() != Some(&checklist.key) {
            debug!(permit = %checklist.key.permit_id, "discarding stale checklist");
            return false;
        }
        self.documents = checklist.documents;
        self.progress = Some(checklist.progress);
        let editing_gone = self
            .editing_doc_id
            .as_ref()
            .is_some_and(|id| !self.documents.iter().any(|d| &d.id == id));
        if editing_gone {
            self.editing_doc_id = None;
        }
        true
    }

    /// Progress computed from the cached documents
    pub fn local_progress(&self) -> ProgressSummary {
        ProgressSummary::from_documents(&self.documents)
    }

    /// Drop the cached checklist after a failed fetch for `key`.
    ///
    /// Returns `false` (and changes nothing) when `key` is no longer current.
    pub fn abandon_checklist(&mut self, key: &ChecklistKey) -> bool {
        if self.checklist_key().as_ref() != Some(key) {
            return false;
        }
        self.documents.clear();
        self.progress = None;
        self.editing_doc_id = None;
        true
    }

    /// Optimistically flip a document's completion flag.
    pub fn begin_toggle(&mut self, document_id: &str) -> ChecklistResult<PendingToggle> {
        let key = self
            .checklist_key()
            .ok_or_else(|| ChecklistError::not_found("document", document_id))?;
        let doc = self
            .documents
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| ChecklistError::not_found("document", document_id))?;
        let previous = doc.is_complete;
        doc.is_complete = !previous;
        Ok(PendingToggle {
            key,
            document_id: document_id.to_string(),
            previous,
            target: !previous,
        })
    }

    /// Keep the flip. `progress` is the refreshed server summary, or `None`
    /// when the refresh failed and the local count should be used.
    pub fn commit_toggle(&mut self, pending: PendingToggle, progress: Option<ProgressSummary>) {
        if !self.owns(&pending) {
            return;
        }
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == pending.document_id) {
            doc.is_complete = pending.target;
            if !pending.target {
                doc.completed_at = None;
            }
        }
        self.progress = Some(progress.unwrap_or_else(|| self.local_progress()));
    }

    /// Undo the flip. Progress is left as it was.
    pub fn rollback_toggle(&mut self, pending: PendingToggle) {
        if !self.owns(&pending) {
            return;
        }
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == pending.document_id) {
            doc.is_complete = pending.previous;
        }
    }

    fn owns(&self, pending: &PendingToggle) -> bool {
        let current = self.checklist_key().as_ref() == Some(&pending.key);
        if !current {
            debug!(document = %pending.document_id, "toggle reply for a checklist no longer shown");
        }
        current
    }

    /// Open the notes editor on a document and return its draft.
    pub fn open_editor(&mut self, document_id: &str) -> ChecklistResult<NotesDraft> {
        let doc = self
            .document(document_id)
            .ok_or_else(|| ChecklistError::not_found("document", document_id))?;
        let draft = NotesDraft {
            document_id: doc.id.clone(),
            title: doc.display_name(),
            notes: doc.notes.clone().unwrap_or_default(),
            due_date: doc.due_date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        };
        self.editing_doc_id = Some(draft.document_id.clone());
        Ok(draft)
    }

    pub fn close_editor(&mut self) {
        self.editing_doc_id = None;
    }

    /// Record saved notes and due date, closing the editor if it is on this document.
    pub fn apply_annotations(&mut self, document_id: &str, notes: &str, due_date: Option<NaiveDate>) {
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == document_id) {
            doc.notes = Some(notes.to_string());
            doc.due_date = due_date;
        }
        if self.editing_doc_id.as_deref() == Some(document_id) {
            self.editing_doc_id = None;
        }
    }
}
