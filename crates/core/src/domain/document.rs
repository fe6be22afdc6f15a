use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::request::{Decision, DocumentRequest, DocumentType, RequestId, RequestStatus};

pub const DELIVERY_FORMAT: &str = "PDF";

/// Chips on the documents dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    Attestation,
    Bulletin,
    Convention,
    Other,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 4] =
        [Self::Attestation, Self::Bulletin, Self::Convention, Self::Other];

    pub fn of(kind: DocumentType) -> Self {
        match kind {
            DocumentType::InscriptionCertificate | DocumentType::SuccessCertificate => {
                Self::Attestation
            }
            DocumentType::Transcript => Self::Bulletin,
            DocumentType::InternshipAgreement => Self::Convention,
            DocumentType::Other => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Attestation => "Attestation",
            Self::Bulletin => "Bulletin",
            Self::Convention => "Convention",
            Self::Other => "Autre",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::Attestation => "attestation",
            Self::Bulletin => "bulletin",
            Self::Convention => "convention",
            Self::Other => "other",
        }
    }

    pub fn parse_input(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == needle || category.label().to_lowercase() == needle)
    }
}

/// A document the school has delivered, or refused to deliver.
///
/// Only decided documents reach the library, so the status is always
/// approved or rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedDocument {
    pub id: String,
    pub title: String,
    pub format: String,
    pub category: DocumentCategory,
    pub issued_on: NaiveDate,
    status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl IssuedDocument {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: DocumentCategory,
        issued_on: NaiveDate,
        decision: Decision,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            format: DELIVERY_FORMAT.to_string(),
            category,
            issued_on,
            status: decision.resulting_status(),
            request_id: None,
        }
    }

    /// The library entry for a decided request; `None` while it is pending.
    pub fn from_decided(request: &DocumentRequest) -> Option<Self> {
        let event = request.history().last()?;
        let sequence = request.id.0.trim_start_matches("r-");
        Some(Self {
            request_id: Some(request.id.clone()),
            ..Self::new(
                format!("doc-{sequence}"),
                format!("{} {}", request.document_type.label(), request.school_year),
                DocumentCategory::of(request.document_type),
                event.date.date_naive(),
                event.decision,
            )
        })
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }
}
