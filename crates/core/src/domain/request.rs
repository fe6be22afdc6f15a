use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DecisionError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    InscriptionCertificate,
    SuccessCertificate,
    Transcript,
    InternshipAgreement,
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        Self::InscriptionCertificate,
        Self::SuccessCertificate,
        Self::Transcript,
        Self::InternshipAgreement,
        Self::Other,
    ];

    /// Label shown on the portal's document type chips.
    pub fn label(self) -> &'static str {
        match self {
            Self::InscriptionCertificate => "Attestation d'inscription",
            Self::SuccessCertificate => "Attestation de réussite",
            Self::Transcript => "Bulletin",
            Self::InternshipAgreement => "Convention",
            Self::Other => "Autre",
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::InscriptionCertificate => "inscription_certificate",
            Self::SuccessCertificate => "success_certificate",
            Self::Transcript => "transcript",
            Self::InternshipAgreement => "internship_agreement",
            Self::Other => "other",
        }
    }

    /// Accepts either the snake_case key or the portal label, ignoring case and
    /// surrounding whitespace.
    pub fn parse_input(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == needle || kind.label().to_lowercase() == needle)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "en cours",
            Self::Approved => "validé",
            Self::Rejected => "rejeté",
        }
    }

    pub fn parse_input(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "pending" | "en cours" | "en attente" => Some(Self::Pending),
            "approved" | "validé" | "valide" => Some(Self::Approved),
            "rejected" | "rejeté" | "rejete" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn resulting_status(self) -> RequestStatus {
        match self {
            Self::Approved => RequestStatus::Approved,
            Self::Rejected => RequestStatus::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub actor_name: String,
    pub decision: Decision,
    pub reason: String,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub id: RequestId,
    pub document_type: DocumentType,
    pub school_year: String,
    pub copies: u32,
    pub reason: String,
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    history: Vec<StatusEvent>,
}

impl DocumentRequest {
    /// Builds a freshly submitted request: pending, with no history.
    pub fn submitted(
        id: RequestId,
        document_type: DocumentType,
        school_year: impl Into<String>,
        copies: u32,
        reason: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_type,
            school_year: school_year.into(),
            copies,
            reason: reason.into(),
            status: RequestStatus::Pending,
            submitted_at,
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[StatusEvent] {
        &self.history
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        matches!(
            (self.status, next),
            (RequestStatus::Pending, RequestStatus::Approved)
                | (RequestStatus::Pending, RequestStatus::Rejected)
        )
    }

    pub fn is_cancelable(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Appends the decision to the history and moves the status. Terminal
    /// requests are left untouched.
    pub fn apply_decision(&mut self, event: StatusEvent) -> Result<(), DecisionError> {
        let next = event.decision.resulting_status();
        if !self.can_transition_to(next) {
            return Err(DecisionError::AlreadyFinalized {
                id: self.id.clone(),
                status: self.status,
            });
        }

        self.history.push(event);
        self.status = next;
        Ok(())
    }
}
