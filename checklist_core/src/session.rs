//! # Workflows
//!
//! Each user action as a chain of awaited API calls. These functions borrow
//! a [`ChecklistApi`] and return plain values for the caller to hand to the
//! [`Tracker`](crate::tracker::Tracker); they hold no state of their own.
//!
//! ```text
//! startup         categories | profiles | metadata  (joined)
//!                 -> permit-types -> important-links -> user-settings
//! select permit   documents -> progress
//! toggle profile  save profiles (best effort) -> documents -> progress
//! toggle doc      complete|incomplete -> progress (fallback: local count)
//! save notes      notes -> due-date
//! reset           reset -> documents -> progress
//! ```

use chrono::NaiveDate;
use futures::join;
use tracing::{info, warn};

use crate::api::ChecklistApi;
use crate::errors::ChecklistResult;
use crate::models::{Metadata, ProgressSummary};
use crate::selection::ProfileSelection;
use crate::tracker::{Checklist, ChecklistKey, ReferenceData};

/// Load all reference data.
///
/// Metadata and user settings are optional: their failures fall back to
/// defaults. Any other failure aborts startup.
pub async fn load_reference_data(api: &dyn ChecklistApi) -> ChecklistResult<ReferenceData> {
    let (categories, profiles, metadata) = join!(api.categories(), api.profiles(), api.metadata());
    let categories = categories?;
    let profiles = profiles?;
    let metadata = metadata.unwrap_or_else(|e| {
        warn!(code = e.error_code(), error = %e, "metadata unavailable");
        Metadata::default()
    });

    let permit_types = api.permit_types().await?;
    let important_links = api.important_links().await?;

    let selected_profiles = match api.user_settings().await {
        Ok(settings) => settings
            .selected_profiles
            .map(ProfileSelection::from)
            .unwrap_or_default(),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "user settings unavailable");
            ProfileSelection::default()
        }
    };

    info!(
        permit_types = permit_types.len(),
        categories = categories.len(),
        profiles = profiles.len(),
        "reference data loaded"
    );

    Ok(ReferenceData {
        categories,
        profiles,
        permit_types,
        important_links,
        metadata,
        selected_profiles,
    })
}

/// Fetch the documents and then the progress for a key.
pub async fn load_checklist(api: &dyn ChecklistApi, key: ChecklistKey) -> ChecklistResult<Checklist> {
    let documents = api.documents(&key.permit_id, &key.profiles).await?;
    let progress = api.progress(&key.permit_id, &key.profiles).await?;
    info!(
        permit = %key.permit_id,
        profiles = %key.profiles.to_csv(),
        documents = documents.len(),
        "checklist loaded"
    );
    Ok(Checklist {
        key,
        documents,
        progress,
    })
}

/// Persist a changed profile filter, then reload the checklist under it.
pub async fn change_profiles(api: &dyn ChecklistApi, key: ChecklistKey) -> ChecklistResult<Checklist> {
    save_profiles_best_effort(api, &key.profiles).await;
    load_checklist(api, key).await
}

/// Store the profile preference; failures are logged and otherwise ignored.
pub async fn save_profiles_best_effort(api: &dyn ChecklistApi, profiles: &ProfileSelection) {
    if let Err(e) = api.save_profiles(profiles).await {
        warn!(code = e.error_code(), error = %e, "could not save profile preference");
    }
}

/// Mark a document complete or incomplete, then refresh progress.
///
/// An `Err` means the mutation itself failed and the optimistic flip must be
/// rolled back. `Ok(None)` means the mutation succeeded but the progress
/// refresh did not.
pub async fn set_completion(
    api: &dyn ChecklistApi,
    key: &ChecklistKey,
    document_id: &str,
    complete: bool,
) -> ChecklistResult<Option<ProgressSummary>> {
    if complete {
        api.mark_complete(document_id).await?;
    } else {
        api.mark_incomplete(document_id).await?;
    }
    info!(document = document_id, complete, "completion saved");

    match api.progress(&key.permit_id, &key.profiles).await {
        Ok(progress) => Ok(Some(progress)),
        Err(e) => {
            warn!(code = e.error_code(), error = %e, "progress refresh failed, using local count");
            Ok(None)
        }
    }
}

/// Save notes, then the due date. The two writes are independent.
pub async fn save_annotations(
    api: &dyn ChecklistApi,
    document_id: &str,
    notes: &str,
    due_date: Option<NaiveDate>,
) -> ChecklistResult<()> {
    api.update_notes(document_id, notes).await?;
    api.update_due_date(document_id, due_date).await?;
    info!(document = document_id, due = ?due_date, "annotations saved");
    Ok(())
}

/// Clear all progress for the key's permit type and reload its checklist.
pub async fn reset_permit(api: &dyn ChecklistApi, key: ChecklistKey) -> ChecklistResult<Checklist> {
    api.reset(&key.permit_id).await?;
    info!(permit = %key.permit_id, "progress reset");
    load_checklist(api, key).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EndpointKind, MemoryApi};
    use pretty_assertions::assert_eq;

    fn key(permit: &str) -> ChecklistKey {
        ChecklistKey {
            permit_id: permit.to_string(),
            profiles: ProfileSelection::common_only(),
        }
    }

    #[tokio::test]
    async fn test_reference_data_defaults_optional_parts() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::Metadata);
        api.fail(EndpointKind::UserSettings);

        let data = load_reference_data(&api).await.unwrap();
        assert_eq!(data.metadata, Metadata::default());
        assert_eq!(data.selected_profiles, ProfileSelection::common_only());
        assert_eq!(data.permit_types.len(), 2);
    }

    #[tokio::test]
    async fn test_reference_data_fails_on_required_part() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::PermitTypes);
        let err = load_reference_data(&api).await.unwrap_err();
        assert_eq!(err.error_code(), "REJECTED");
    }

    #[tokio::test]
    async fn test_saved_profiles_restored() {
        let api = MemoryApi::sample();
        api.save_profiles(&ProfileSelection::from_ids(["married"])).await.unwrap();
        let data = load_reference_data(&api).await.unwrap();
        assert!(data.selected_profiles.contains("married"));
        assert!(data.selected_profiles.contains("common"));
    }

    #[tokio::test]
    async fn test_checklist_calls_documents_then_progress() {
        let api = MemoryApi::sample();
        let checklist = load_checklist(&api, key("titre_sejour")).await.unwrap();
        assert_eq!(checklist.progress.total as usize, checklist.documents.len());
        assert_eq!(
            api.calls(),
            vec!["GET /documents/titre_sejour".to_string(), "GET /progress/titre_sejour".to_string()]
        );
    }

    #[tokio::test]
    async fn test_profile_save_failure_does_not_block_reload() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::SaveProfiles);
        let mut k = key("carte_resident");
        k.profiles = ProfileSelection::from_ids(["married"]);
        let checklist = change_profiles(&api, k).await.unwrap();
        assert!(checklist.documents.iter().any(|d| d.id == "cr_marriage_certificate"));
        assert_eq!(api.saved_profiles(), None);
    }

    #[tokio::test]
    async fn test_completion_progress_fallback() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::Progress);
        let refreshed = set_completion(&api, &key("carte_resident"), "cr_passport", true).await.unwrap();
        assert_eq!(refreshed, None);
        assert!(api.document("cr_passport").unwrap().is_complete);
    }

    #[tokio::test]
    async fn test_completion_failure_is_error() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::Incomplete);
        assert!(set_completion(&api, &key("carte_resident"), "cr_passport", false).await.is_err());
    }

    #[tokio::test]
    async fn test_annotations_written_in_order() {
        let api = MemoryApi::sample();
        let due = NaiveDate::from_ymd_opt(2026, 12, 1);
        save_annotations(&api, "cr_photos", "booth", due).await.unwrap();
        assert_eq!(
            api.calls(),
            vec![
                "POST /documents/cr_photos/notes".to_string(),
                "POST /documents/cr_photos/due-date".to_string(),
            ]
        );
        let doc = api.document("cr_photos").unwrap();
        assert_eq!(doc.notes.as_deref(), Some("booth"));
        assert_eq!(doc.due_date, due);
    }

    #[tokio::test]
    async fn test_notes_failure_skips_due_date() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::Notes);
        assert!(save_annotations(&api, "cr_photos", "x", None).await.is_err());
        assert_eq!(api.calls(), vec!["POST /documents/cr_photos/notes".to_string()]);
    }
}
