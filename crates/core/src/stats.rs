use serde::{Deserialize, Serialize};

use crate::domain::request::{DocumentRequest, RequestStatus};

/// Counters shown on the staff dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub processed: usize,
    pub pending: usize,
    pub rejected: usize,
    pub approved: usize,
}

impl DashboardStats {
    pub fn from_requests(requests: &[DocumentRequest]) -> Self {
        requests.iter().fold(Self::default(), |mut stats, request| {
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::Approved => stats.approved += 1,
                RequestStatus::Rejected => stats.rejected += 1,
            }
            if request.status.is_terminal() {
                stats.processed += 1;
            }
            stats
        })
    }
}
