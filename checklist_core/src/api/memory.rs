//! In-process [`ChecklistApi`] backend.
//!
//! Behaves like the real server for everything the client can observe:
//! profile filtering, progress counts, per-document mutations and reset.
//! Tests inject failures per [`EndpointKind`] and inspect the call log;
//! demo mode runs the GUI against [`Catalog::sample`].

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{ChecklistApi, Endpoint, EndpointKind};
use crate::errors::{ChecklistError, ChecklistResult};
use crate::models::{
    completion_timestamp, Category, CategoryMap, Document, ImportantLink, Metadata, PermitType, Profile, ProfileMap,
    ProgressSummary, UserSettings, COMMON_PROFILE,
};
use crate::selection::ProfileSelection;

/// Reference data plus the per-permit document lists.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: CategoryMap,
    pub profiles: ProfileMap,
    pub permit_types: Vec<PermitType>,
    pub important_links: Vec<ImportantLink>,
    pub metadata: Metadata,
    /// Documents keyed by permit id, in display order
    pub documents: BTreeMap<String, Vec<Document>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    catalog: Catalog,
    selected_profiles: Option<Vec<String>>,
    failing: HashSet<EndpointKind>,
    calls: Vec<String>,
}

/// Thread-safe in-memory backend.
#[derive(Debug, Default)]
pub struct MemoryApi {
    state: Mutex<MemoryState>,
}

impl MemoryApi {
    pub fn new(catalog: Catalog) -> Self {
        MemoryApi {
            state: Mutex::new(MemoryState {
                catalog,
                ..MemoryState::default()
            }),
        }
    }

    /// Backend seeded with [`Catalog::sample`]
    pub fn sample() -> Self {
        Self::new(Catalog::sample())
    }

    /// Make every call to `kind` fail with a rejection until [`recover`](Self::recover).
    pub fn fail(&self, kind: EndpointKind) {
        self.lock().failing.insert(kind);
    }

    pub fn recover(&self, kind: EndpointKind) {
        self.lock().failing.remove(&kind);
    }

    /// Endpoints called so far, e.g. `POST /documents/cr_photos/notes`
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Server-side copy of a document
    pub fn document(&self, document_id: &str) -> Option<Document> {
        self.lock()
            .catalog
            .documents
            .values()
            .flatten()
            .find(|d| d.id == document_id)
            .cloned()
    }

    /// Stored profile preference
    pub fn saved_profiles(&self) -> Option<Vec<String>> {
        self.lock().selected_profiles.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and apply failure injection, then hand out the state.
    fn enter(&self, endpoint: &Endpoint) -> ChecklistResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls.push(endpoint.to_string());
        if state.failing.contains(&endpoint.kind()) {
            return Err(ChecklistError::rejected(
                endpoint.to_string(),
                Some("injected failure".to_string()),
            ));
        }
        Ok(state)
    }

    fn update_document(
        &self,
        endpoint: Endpoint,
        document_id: &str,
        apply: impl FnOnce(&mut Document),
    ) -> ChecklistResult<()> {
        let mut state = self.enter(&endpoint)?;
        let doc = state
            .catalog
            .documents
            .values_mut()
            .flatten()
            .find(|d| d.id == document_id)
            .ok_or_else(|| ChecklistError::rejected(endpoint.to_string(), None))?;
        apply(doc);
        Ok(())
    }

    fn filtered(state: &MemoryState, permit_id: &str, profiles: &ProfileSelection) -> Vec<Document> {
        state
            .catalog
            .documents
            .get(permit_id)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.applies_to(profiles.iter()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ChecklistApi for MemoryApi {
    async fn categories(&self) -> ChecklistResult<CategoryMap> {
        Ok(self.enter(&Endpoint::Categories)?.catalog.categories.clone())
    }

    async fn profiles(&self) -> ChecklistResult<ProfileMap> {
        Ok(self.enter(&Endpoint::Profiles)?.catalog.profiles.clone())
    }

    async fn permit_types(&self) -> ChecklistResult<Vec<PermitType>> {
        Ok(self.enter(&Endpoint::PermitTypes)?.catalog.permit_types.clone())
    }

    async fn important_links(&self) -> ChecklistResult<Vec<ImportantLink>> {
        Ok(self.enter(&Endpoint::ImportantLinks)?.catalog.important_links.clone())
    }

    async fn metadata(&self) -> ChecklistResult<Metadata> {
        Ok(self.enter(&Endpoint::Metadata)?.catalog.metadata.clone())
    }

    async fn user_settings(&self) -> ChecklistResult<UserSettings> {
        let state = self.enter(&Endpoint::UserSettings)?;
        Ok(UserSettings {
            selected_profiles: state.selected_profiles.clone(),
        })
    }

    async fn documents(&self, permit_id: &str, profiles: &ProfileSelection) -> ChecklistResult<Vec<Document>> {
        let state = self.enter(&Endpoint::Documents {
            permit_id: permit_id.to_string(),
            profiles: profiles.clone(),
        })?;
        Ok(Self::filtered(&state, permit_id, profiles))
    }

    async fn progress(&self, permit_id: &str, profiles: &ProfileSelection) -> ChecklistResult<ProgressSummary> {
        let state = self.enter(&Endpoint::Progress {
            permit_id: permit_id.to_string(),
            profiles: profiles.clone(),
        })?;
        Ok(ProgressSummary::from_documents(&Self::filtered(&state, permit_id, profiles)))
    }

    async fn mark_complete(&self, document_id: &str) -> ChecklistResult<()> {
        let endpoint = Endpoint::Complete {
            document_id: document_id.to_string(),
        };
        self.update_document(endpoint, document_id, |doc| {
            doc.is_complete = true;
            doc.completed_at = Some(completion_timestamp(Utc::now()));
        })
    }

    async fn mark_incomplete(&self, document_id: &str) -> ChecklistResult<()> {
        let endpoint = Endpoint::Incomplete {
            document_id: document_id.to_string(),
        };
        self.update_document(endpoint, document_id, |doc| {
            doc.is_complete = false;
            doc.completed_at = None;
        })
    }

    async fn update_notes(&self, document_id: &str, notes: &str) -> ChecklistResult<()> {
        let endpoint = Endpoint::Notes {
            document_id: document_id.to_string(),
            notes: notes.to_string(),
        };
        self.update_document(endpoint, document_id, |doc| doc.notes = Some(notes.to_string()))
    }

    async fn update_due_date(&self, document_id: &str, due_date: Option<NaiveDate>) -> ChecklistResult<()> {
        let endpoint = Endpoint::DueDate {
            document_id: document_id.to_string(),
            due_date,
        };
        self.update_document(endpoint, document_id, |doc| doc.due_date = due_date)
    }

    async fn save_profiles(&self, profiles: &ProfileSelection) -> ChecklistResult<()> {
        let mut state = self.enter(&Endpoint::SaveProfiles {
            profiles: profiles.clone(),
        })?;
        state.selected_profiles = Some(profiles.to_vec());
        Ok(())
    }

    async fn reset(&self, permit_id: &str) -> ChecklistResult<()> {
        let mut state = self.enter(&Endpoint::Reset {
            permit_id: permit_id.to_string(),
        })?;
        if let Some(docs) = state.catalog.documents.get_mut(permit_id) {
            for doc in docs {
                doc.is_complete = false;
                doc.completed_at = None;
                doc.notes = None;
                doc.due_date = None;
            }
        }
        Ok(())
    }
}

impl Catalog {
    /// Add a document under a permit type
    pub fn with_document(mut self, permit_id: &str, document: Document) -> Self {
        self.documents.entry(permit_id.to_string()).or_default().push(document);
        self
    }

    /// Small two-permit catalogue for demo mode.
    pub fn sample() -> Self {
        let mut catalog = Catalog {
            metadata: Metadata {
                last_verified: Some("2026-01-15".to_string()),
                source_url: Some("https://www.service-public.fr/particuliers/vosdroits/N110".to_string()),
            },
            ..Catalog::default()
        };

        for (id, en, fr, icon) in [
            ("identity", "Identity Documents", "Pièces d'identité", "🪪"),
            ("family", "Family Situation", "Situation familiale", "👨‍👩‍👧"),
            ("residence", "Proof of Residence", "Justificatifs de domicile", "🏠"),
            ("financial", "Financial Documents", "Documents financiers", "💰"),
            ("administrative", "Administrative Documents", "Documents administratifs", "📋"),
            ("integration", "Integration Requirements", "Conditions d'intégration", "🇫🇷"),
            ("payment", "Payment", "Paiement", "💳"),
        ] {
            catalog.categories.insert(
                id.to_string(),
                Category {
                    name_en: en.to_string(),
                    name_fr: fr.to_string(),
                    icon: icon.to_string(),
                },
            );
        }

        for (id, en, fr, icon) in [
            (COMMON_PROFILE, "Everyone", "Tous", "📋"),
            ("married", "Married / PACS", "Marié(e) / Pacsé(e)", "💍"),
            ("children", "With children", "Avec enfants", "👶"),
            ("employed", "Employed", "Salarié(e)", "💼"),
        ] {
            catalog.profiles.insert(
                id.to_string(),
                Profile {
                    name_en: en.to_string(),
                    name_fr: fr.to_string(),
                    icon: Some(icon.to_string()),
                },
            );
        }

        catalog.permit_types = vec![
            PermitType {
                id: "carte_resident".to_string(),
                name_en: "EU Long-Term Resident Card (10 years)".to_string(),
                name_fr: "Carte de Résident de Longue Durée-UE".to_string(),
                description: "A 10-year residence card for foreigners who have lived legally in France for at least 5 years.".to_string(),
                official_url: "https://www.service-public.fr/particuliers/vosdroits/F17359".to_string(),
                last_verified: Some("2026-01-15".to_string()),
            },
            PermitType {
                id: "titre_sejour".to_string(),
                name_en: "Residence Permit (Renewal)".to_string(),
                name_fr: "Titre de Séjour".to_string(),
                description: "Renewal of your current residence permit (typically 1-4 years).".to_string(),
                official_url: "https://www.service-public.fr/particuliers/vosdroits/N110".to_string(),
                last_verified: Some("2026-01-15".to_string()),
            },
        ];

        catalog.important_links = vec![
            ImportantLink {
                name_en: "ANEF - Online Application Portal".to_string(),
                name_fr: "ANEF - Portail de demande en ligne".to_string(),
                url: "https://administration-etrangers-en-france.interieur.gouv.fr/".to_string(),
                description: "Submit your application online through the official French immigration portal.".to_string(),
            },
            ImportantLink {
                name_en: "Purchase Tax Stamp".to_string(),
                name_fr: "Achat de timbre fiscal".to_string(),
                url: "https://timbres.impots.gouv.fr/".to_string(),
                description: "Official portal to purchase the required tax stamp online.".to_string(),
            },
        ];

        let common = &[COMMON_PROFILE][..];
        let rows: [(&str, &str, &str, &str, &str, Option<&str>, &str, Option<u32>, &[&str]); 10] = [
            ("carte_resident", "cr_passport", "identity", "Valid Passport", "Passeport valide", None, "Already possessed", None, common),
            ("carte_resident", "cr_photos", "identity", "3 ID Photos / e-photo", "3 photos d'identité / e-photo", Some("https://www.service-public.fr/particuliers/vosdroits/F10619"), "Photo requirements", Some(180), common),
            ("carte_resident", "cr_proof_of_address", "residence", "Proof of Address (less than 6 months)", "Justificatif de domicile (moins de 6 mois)", Some("https://www.service-public.fr/particuliers/vosdroits/F33052"), "Official requirements", Some(180), common),
            ("carte_resident", "cr_resources_5years", "financial", "Proof of Resources (last 5 years)", "Justificatifs de ressources (5 dernières années)", Some("https://www.impots.gouv.fr/"), "Tax portal (avis d'imposition)", None, &["employed"]),
            ("carte_resident", "cr_marriage_certificate", "family", "Marriage Certificate", "Acte de mariage", None, "Request from the civil registry", Some(90), &["married"]),
            ("carte_resident", "cr_french_b1", "integration", "French B1 Level Certificate", "Attestation niveau B1 français", Some("https://www.service-public.fr/particuliers/vosdroits/F34501"), "Language requirements", None, common),
            ("carte_resident", "cr_tax_stamp", "payment", "Tax Stamp (225 €)", "Timbre fiscal (225 €)", Some("https://timbres.impots.gouv.fr/"), "Buy online", None, common),
            ("titre_sejour", "ts_passport", "identity", "Valid Passport", "Passeport valide", None, "Already possessed", None, common),
            ("titre_sejour", "ts_current_permit", "administrative", "Current Residence Permit", "Titre de séjour actuel", None, "Already possessed", None, common),
            ("titre_sejour", "ts_birth_certificates_children", "family", "Children's Birth Certificates", "Actes de naissance des enfants", None, "Request from the civil registry", Some(90), &["children"]),
        ];

        for (order, (permit, id, category, en, fr, link, link_text, validity, profiles)) in rows.into_iter().enumerate() {
            let document = Document {
                id: id.to_string(),
                category: Some(category.to_string()),
                name_en: en.to_string(),
                name_fr: fr.to_string(),
                description: String::new(),
                link: link.map(str::to_string),
                link_text: link_text.to_string(),
                validity_days: validity,
                is_complete: false,
                notes: None,
                due_date: None,
                profiles: profiles.iter().map(|p| p.to_string()).collect(),
                completed_at: None,
                permit_type: Some(permit.to_string()),
                sort_order: Some(order as i64),
            };
            catalog = catalog.with_document(permit, document);
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_profile_filtering() {
        let api = MemoryApi::sample();
        let common = ProfileSelection::common_only();
        let docs = api.documents("carte_resident", &common).await.unwrap();
        assert!(docs.iter().all(|d| d.profiles.iter().any(|p| p == COMMON_PROFILE)));

        let married = ProfileSelection::from_ids(["married"]);
        let with_married = api.documents("carte_resident", &married).await.unwrap();
        assert_eq!(with_married.len(), docs.len() + 1);
        assert!(with_married.iter().any(|d| d.id == "cr_marriage_certificate"));
    }

    #[tokio::test]
    async fn test_unknown_permit_is_empty() {
        let api = MemoryApi::sample();
        let profiles = ProfileSelection::common_only();
        assert!(api.documents("visa_talent", &profiles).await.unwrap().is_empty());
        assert_eq!(api.progress("visa_talent", &profiles).await.unwrap(), ProgressSummary::new(0, 0));
    }

    #[tokio::test]
    async fn test_mutations_and_unknown_document() {
        let api = MemoryApi::sample();
        api.mark_complete("cr_passport").await.unwrap();
        let doc = api.document("cr_passport").unwrap();
        assert!(doc.is_complete);
        assert!(doc.completed_at.is_some());

        api.mark_incomplete("cr_passport").await.unwrap();
        assert!(!api.document("cr_passport").unwrap().is_complete);

        let err = api.mark_complete("nope").await.unwrap_err();
        assert_eq!(err.error_code(), "REJECTED");
    }

    #[tokio::test]
    async fn test_failure_injection_and_call_log() {
        let api = MemoryApi::sample();
        api.fail(EndpointKind::Complete);
        assert!(api.mark_complete("cr_passport").await.is_err());
        assert!(!api.document("cr_passport").unwrap().is_complete);

        api.recover(EndpointKind::Complete);
        api.mark_complete("cr_passport").await.unwrap();
        assert_eq!(
            api.calls(),
            vec![
                "POST /documents/cr_passport/complete".to_string(),
                "POST /documents/cr_passport/complete".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_user_settings_roundtrip() {
        let api = MemoryApi::sample();
        assert_eq!(api.user_settings().await.unwrap().selected_profiles, None);
        api.save_profiles(&ProfileSelection::from_ids(["children"])).await.unwrap();
        assert_eq!(
            api.user_settings().await.unwrap().selected_profiles,
            Some(vec!["children".to_string(), "common".to_string()])
        );
    }

    #[test]
    fn test_sample_catalog_shape() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.permit_types.len(), 2);
        assert!(catalog.profiles.contains_key(COMMON_PROFILE));
        for permit in &catalog.permit_types {
            assert!(catalog.documents.contains_key(&permit.id), "{} has documents", permit.id);
        }
    }
}
