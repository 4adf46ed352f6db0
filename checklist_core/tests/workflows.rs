use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use checklist_core::api::{Catalog, ChecklistApi, EndpointKind, MemoryApi};
use checklist_core::models::{Category, Document, PermitType, ProgressSummary};
use checklist_core::{session, ChecklistKey, Tracker};

const PERMIT: &str = "permit_x";
const OTHER_PERMIT: &str = "permit_y";

fn permit(id: &str, name: &str) -> PermitType {
    PermitType {
        id: id.to_string(),
        name_en: name.to_string(),
        name_fr: name.to_string(),
        description: "Test permit".to_string(),
        official_url: "https://example.org/permits".to_string(),
        last_verified: None,
    }
}

fn document(id: &str, category: &str, done: bool) -> Document {
    let json = format!(
        r#"{{"id":"{id}","name_en":"{id}","name_fr":"{id}","category":"{category}","profiles":["common"],"is_complete":{}}}"#,
        u8::from(done)
    );
    serde_json::from_str(&json).unwrap()
}

/// Permit type X with 4 documents, one already complete, and permit type Y
/// with 3 open documents.
fn backend() -> MemoryApi {
    let mut catalog = Catalog::default();
    catalog.categories.insert(
        "identity".to_string(),
        Category { name_en: "Identity Documents".into(), name_fr: "Pièces d'identité".into(), icon: "🪪".into() },
    );
    catalog.permit_types.push(permit(PERMIT, "Permit X"));
    catalog.permit_types.push(permit(OTHER_PERMIT, "Permit Y"));
    let catalog = catalog
        .with_document(PERMIT, document("passport", "identity", true))
        .with_document(PERMIT, document("photos", "identity", false))
        .with_document(PERMIT, document("birth", "identity", false))
        .with_document(PERMIT, document("visa", "identity", false))
        .with_document(OTHER_PERMIT, document("y_passport", "identity", false))
        .with_document(OTHER_PERMIT, document("y_lease", "identity", false))
        .with_document(OTHER_PERMIT, document("y_stamp", "identity", false));
    MemoryApi::new(catalog)
}

async fn open(api: &MemoryApi) -> Tracker {
    let mut tracker = Tracker::new(session::load_reference_data(api).await.unwrap());
    let key = tracker.select_permit(Some(PERMIT)).unwrap();
    let checklist = session::load_checklist(api, key).await.unwrap();
    assert!(tracker.apply_checklist(checklist));
    tracker
}

async fn toggle(api: &MemoryApi, tracker: &mut Tracker, document_id: &str) {
    let key = tracker.checklist_key().unwrap();
    let pending = tracker.begin_toggle(document_id).unwrap();
    match session::set_completion(api, &key, document_id, pending.target()).await {
        Ok(progress) => tracker.commit_toggle(pending, progress),
        Err(_) => tracker.rollback_toggle(pending),
    }
}

#[tokio::test]
async fn progress_follows_completion() {
    let api = backend();
    let mut tracker = open(&api).await;
    assert_eq!(
        tracker.progress(),
        Some(ProgressSummary { completed: 1, total: 4, remaining: 3, percentage: 25 })
    );

    toggle(&api, &mut tracker, "photos").await;

    let progress = tracker.progress().unwrap();
    assert_eq!((progress.completed, progress.total, progress.percentage), (2, 4, 50));
    assert_eq!(tracker.groups()[0].counter(), "2/4");
    assert!(api.document("photos").unwrap().is_complete);
}

#[tokio::test]
async fn double_toggle_returns_to_original_state() {
    let api = backend();
    let mut tracker = open(&api).await;

    toggle(&api, &mut tracker, "passport").await;
    toggle(&api, &mut tracker, "passport").await;

    assert!(tracker.document("passport").unwrap().is_complete);
    let key = tracker.checklist_key().unwrap();
    let server = api.progress(&key.permit_id, &key.profiles).await.unwrap();
    assert_eq!(server, ProgressSummary::new(1, 4));
    assert_eq!(tracker.progress(), Some(server));
}

#[tokio::test]
async fn failed_toggle_rolls_back() {
    let api = backend();
    let mut tracker = open(&api).await;
    let before = tracker.progress();

    api.fail(EndpointKind::Complete);
    toggle(&api, &mut tracker, "visa").await;

    assert!(!tracker.document("visa").unwrap().is_complete);
    assert!(!api.document("visa").unwrap().is_complete);
    assert_eq!(tracker.progress(), before);
}

#[tokio::test]
async fn reset_clears_annotations_and_completion() {
    let api = backend();
    let mut tracker = open(&api).await;

    let due = NaiveDate::from_ymd_opt(2026, 11, 20);
    session::save_annotations(&api, "photos", "photo booth on Monday", due).await.unwrap();
    tracker.apply_annotations("photos", "photo booth on Monday", due);
    toggle(&api, &mut tracker, "birth").await;

    let key = tracker.checklist_key().unwrap();
    let checklist = session::reset_permit(&api, key).await.unwrap();
    assert!(tracker.apply_checklist(checklist));

    for doc in tracker.documents() {
        assert!(!doc.is_complete, "{} still complete", doc.id);
        assert_eq!(doc.notes, None);
        assert_eq!(doc.due_date, None);
    }
    assert_eq!(tracker.progress(), Some(ProgressSummary::new(0, 4)));
}

#[tokio::test]
async fn failed_reset_leaves_state_untouched() {
    let api = backend();
    let mut tracker = open(&api).await;
    api.fail(EndpointKind::Reset);

    let key = tracker.checklist_key().unwrap();
    assert!(session::reset_permit(&api, key).await.is_err());
    assert!(tracker.document("passport").unwrap().is_complete);
    assert_eq!(tracker.progress(), Some(ProgressSummary::new(1, 4)));
}

#[tokio::test]
async fn stale_checklist_is_discarded() {
    let api = backend();
    let mut tracker = Tracker::new(session::load_reference_data(&api).await.unwrap());

    let first = tracker.select_permit(Some(PERMIT)).unwrap();
    let in_flight = session::load_checklist(&api, first).await.unwrap();

    // The user moved on before the reply arrived.
    tracker.select_permit(None);
    assert!(!tracker.apply_checklist(in_flight));
    assert!(tracker.documents().is_empty());

    let stale_key = ChecklistKey {
        permit_id: PERMIT.to_string(),
        profiles: checklist_core::ProfileSelection::from_ids(["married"]),
    };
    tracker.select_permit(Some(PERMIT));
    let other = session::load_checklist(&api, stale_key).await.unwrap();
    assert!(!tracker.apply_checklist(other));
}

#[tokio::test]
async fn toggle_reply_after_permit_switch_leaves_new_permit_alone() {
    let api = backend();
    let mut tracker = open(&api).await;

    let key = tracker.checklist_key().unwrap();
    let pending = tracker.begin_toggle("photos").unwrap();

    let other = tracker.select_permit(Some(OTHER_PERMIT)).unwrap();
    let checklist = session::load_checklist(&api, other).await.unwrap();
    assert!(tracker.apply_checklist(checklist));
    assert_eq!(tracker.progress(), Some(ProgressSummary::new(0, 3)));

    let progress = session::set_completion(&api, &key, "photos", pending.target()).await.unwrap();
    tracker.commit_toggle(pending, progress);

    assert_eq!(tracker.progress(), Some(ProgressSummary::new(0, 3)));
    assert_eq!(tracker.documents().len(), 3);
    assert!(api.document("photos").unwrap().is_complete);
}

#[tokio::test]
async fn failed_profile_reload_drops_mismatched_checklist() {
    let api = backend();
    let mut tracker = open(&api).await;

    api.fail(EndpointKind::Documents);
    let key = tracker.toggle_profile("married").unwrap();
    assert!(session::change_profiles(&api, key.clone()).await.is_err());
    assert!(tracker.abandon_checklist(&key));

    assert!(tracker.documents().is_empty());
    assert_eq!(tracker.progress(), None);
    assert!(tracker.begin_toggle("photos").is_err());

    api.recover(EndpointKind::Documents);
    let checklist = session::load_checklist(&api, tracker.checklist_key().unwrap()).await.unwrap();
    assert!(tracker.apply_checklist(checklist));
    assert_eq!(tracker.progress(), Some(ProgressSummary::new(1, 4)));
}
