//! Deterministic demo requests mirroring the portal's sample screens.

use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::AuditSink;
use crate::domain::document::{DocumentCategory, IssuedDocument};
use crate::domain::request::{Decision, DocumentType, RequestId};
use crate::errors::LifecycleError;
use crate::lifecycle::CreateRequestInput;
use crate::session::Session;

struct SeedRequest {
    document_type: DocumentType,
    year_offset: usize,
    copies: u32,
    reason: &'static str,
    decision: Option<(Decision, &'static str, &'static str)>,
}

// Oldest first, so the most recent seed ends up at the head of the list.
const SEED_REQUESTS: [SeedRequest; 5] = [
    SeedRequest {
        document_type: DocumentType::SuccessCertificate,
        year_offset: 1,
        copies: 1,
        reason: "Dossier de bourse",
        decision: Some((Decision::Rejected, "Professeur", "Info manquante")),
    },
    SeedRequest {
        document_type: DocumentType::Transcript,
        year_offset: 1,
        copies: 1,
        reason: "Bulletin S2",
        decision: Some((Decision::Approved, "Admin", "Vérifié OK")),
    },
    SeedRequest {
        document_type: DocumentType::InternshipAgreement,
        year_offset: 0,
        copies: 1,
        reason: "Convention de stage de fin d'année",
        decision: Some((Decision::Approved, "Admin", "Entreprise confirmée")),
    },
    SeedRequest {
        document_type: DocumentType::Transcript,
        year_offset: 2,
        copies: 2,
        reason: "Dossier administratif",
        decision: None,
    },
    SeedRequest {
        document_type: DocumentType::InscriptionCertificate,
        year_offset: 1,
        copies: 1,
        reason: "Besoin pour inscription universitaire",
        decision: None,
    },
];

struct SeedDocument {
    id: &'static str,
    title: &'static str,
    category: DocumentCategory,
    issued_on: (i32, u32, u32),
    decision: Decision,
}

// Documents delivered before the session's requests, as on the documents screen.
const SEED_DOCUMENTS: [SeedDocument; 5] = [
    SeedDocument {
        id: "doc-0001",
        title: "Certificat de scolarité",
        category: DocumentCategory::Attestation,
        issued_on: (2025, 9, 18),
        decision: Decision::Approved,
    },
    SeedDocument {
        id: "doc-0002",
        title: "Relevé de notes S2",
        category: DocumentCategory::Bulletin,
        issued_on: (2025, 7, 2),
        decision: Decision::Approved,
    },
    SeedDocument {
        id: "doc-0003",
        title: "Attestation de stage",
        category: DocumentCategory::Convention,
        issued_on: (2025, 5, 14),
        decision: Decision::Rejected,
    },
    SeedDocument {
        id: "doc-0004",
        title: "Diplôme Bac",
        category: DocumentCategory::Other,
        issued_on: (2024, 6, 20),
        decision: Decision::Approved,
    },
    SeedDocument {
        id: "doc-0005",
        title: "Certificat médical",
        category: DocumentCategory::Other,
        issued_on: (2025, 8, 11),
        decision: Decision::Rejected,
    },
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeededRequestInfo {
    pub request_id: RequestId,
    pub document_type: String,
    pub status: String,
}

pub struct DemoDataset;

impl DemoDataset {
    /// Files the archived demo documents, then submits the demo requests
    /// through the regular lifecycle and applies their review decisions.
    /// Years are picked inside the session's window, clamped to its oldest year.
    pub fn load<S>(session: &mut Session<S>) -> Result<Vec<SeededRequestInfo>, LifecycleError>
    where
        S: AuditSink,
    {
        for seed in &SEED_DOCUMENTS {
            let (year, month, day) = seed.issued_on;
            let Some(issued_on) = NaiveDate::from_ymd_opt(year, month, day) else {
                continue;
            };
            session.file_document(IssuedDocument::new(
                seed.id,
                seed.title,
                seed.category,
                issued_on,
                seed.decision,
            ));
        }

        let mut seeded = Vec::with_capacity(SEED_REQUESTS.len());

        for seed in &SEED_REQUESTS {
            let labels = session.school_years().labels();
            let year = labels
                .get(seed.year_offset)
                .or_else(|| labels.last())
                .cloned()
                .unwrap_or_default();

            let input = CreateRequestInput::new(seed.document_type, year, seed.copies, seed.reason);
            let mut request = session.submit(&input)?;
            if let Some((decision, actor, reason)) = seed.decision {
                request = session.decide(&request.id, decision, Some(actor), reason)?;
            }

            seeded.push(SeededRequestInfo {
                request_id: request.id.clone(),
                document_type: request.document_type.label().to_string(),
                status: request.status.label().to_string(),
            });
        }

        Ok(seeded)
    }
}
