use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::request::{Decision, DocumentRequest, RequestId, RequestStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub request_id: RequestId,
    pub title: String,
    pub subtitle: String,
    pub status: RequestStatus,
    pub date: DateTime<Utc>,
    pub details: String,
}

impl Notification {
    pub fn submitted(request: &DocumentRequest) -> Self {
        let label = request.document_type.label();
        Self {
            id: Uuid::new_v4().to_string(),
            request_id: request.id.clone(),
            title: "Demande envoyée".to_string(),
            subtitle: label.to_string(),
            status: RequestStatus::Pending,
            date: request.submitted_at,
            details: format!("Demande envoyée pour : {label} ({}).", request.school_year),
        }
    }

    pub fn decided(
        request: &DocumentRequest,
        decision: Decision,
        reason: &str,
        date: DateTime<Utc>,
    ) -> Self {
        let title = match decision {
            Decision::Approved => "Demande validée",
            Decision::Rejected => "Demande rejetée",
        };
        Self {
            id: Uuid::new_v4().to_string(),
            request_id: request.id.clone(),
            title: title.to_string(),
            subtitle: request.document_type.label().to_string(),
            status: decision.resulting_status(),
            date,
            details: reason.to_string(),
        }
    }
}
