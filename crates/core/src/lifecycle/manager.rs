use chrono::Utc;
use tracing::{debug, info};

use crate::audit::{AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink};
use crate::domain::request::{Decision, DocumentRequest, RequestId, StatusEvent};
use crate::domain::school_year::SchoolYearWindow;
use crate::errors::{CancelError, DecisionError, ValidationError};
use crate::filter::{self, StatusFilter};
use crate::lifecycle::input::{meets_min_reason, validate, CreateRequestInput};
use crate::store::RequestStore;

/// Applies the request lifecycle rules to a session's [`RequestStore`].
///
/// The manager holds no requests itself; the store is owned by the session
/// and borrowed for each operation. Every operation is synchronous and either
/// fully applies or leaves the store untouched.
pub struct RequestLifecycleManager<S> {
    years: SchoolYearWindow,
    sink: S,
    audit: AuditContext,
}

impl<S> RequestLifecycleManager<S>
where
    S: AuditSink,
{
    pub fn new(years: SchoolYearWindow, sink: S, audit: AuditContext) -> Self {
        Self { years, sink, audit }
    }

    pub fn school_years(&self) -> &SchoolYearWindow {
        &self.years
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn create(
        &self,
        store: &mut RequestStore,
        input: &CreateRequestInput,
    ) -> Result<DocumentRequest, ValidationError> {
        let validated = match validate(input, &self.years) {
            Ok(validated) => validated,
            Err(error) => {
                debug!(
                    event_name = "request.create_rejected",
                    session_id = %self.audit.session_id,
                    error = %error,
                    "request form rejected"
                );
                self.emit(
                    AuditEvent::new(
                        None,
                        &self.audit,
                        "request.create_rejected",
                        AuditCategory::Submission,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
                return Err(error);
            }
        };

        let request = DocumentRequest::submitted(
            store.allocate_id(),
            validated.document_type,
            validated.school_year,
            validated.copies,
            validated.reason,
            Utc::now(),
        );
        store.insert_front(request.clone());

        info!(
            event_name = "request.created",
            session_id = %self.audit.session_id,
            request_id = %request.id,
            document_type = ?request.document_type,
            copies = request.copies,
            "document request submitted"
        );
        self.emit(
            AuditEvent::new(
                Some(request.id.clone()),
                &self.audit,
                "request.created",
                AuditCategory::Submission,
                AuditOutcome::Success,
            )
            .with_metadata("document_type", request.document_type.label())
            .with_metadata("school_year", request.school_year.clone())
            .with_metadata("copies", request.copies.to_string()),
        );

        Ok(request)
    }

    pub fn cancel(&self, store: &mut RequestStore, id: &RequestId) -> Result<(), CancelError> {
        let outcome = match store.find(id) {
            None => Err(CancelError::NotFound(id.clone())),
            Some(request) if !request.is_cancelable() => {
                Err(CancelError::NotCancelable { id: id.clone(), status: request.status })
            }
            Some(_) => Ok(()),
        };

        match outcome {
            Ok(()) => {
                store.remove(id);
                info!(
                    event_name = "request.cancelled",
                    session_id = %self.audit.session_id,
                    request_id = %id,
                    "pending request withdrawn"
                );
                self.emit(AuditEvent::new(
                    Some(id.clone()),
                    &self.audit,
                    "request.cancelled",
                    AuditCategory::Cancellation,
                    AuditOutcome::Success,
                ));
                Ok(())
            }
            Err(error) => {
                debug!(
                    event_name = "request.cancel_rejected",
                    session_id = %self.audit.session_id,
                    request_id = %id,
                    error = %error,
                    "cancellation refused"
                );
                self.emit(
                    AuditEvent::new(
                        Some(id.clone()),
                        &self.audit,
                        "request.cancel_rejected",
                        AuditCategory::Cancellation,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("error", error.to_string()),
                );
                Err(error)
            }
        }
    }

    /// Pure view over `requests`; see [`filter::filter`].
    pub fn filter(
        &self,
        requests: &[DocumentRequest],
        status: StatusFilter,
        query: &str,
    ) -> Vec<DocumentRequest> {
        filter::filter(requests, status, query)
    }

    pub fn decide(
        &self,
        store: &mut RequestStore,
        id: &RequestId,
        decision: Decision,
        actor_name: &str,
        reason: &str,
    ) -> Result<DocumentRequest, DecisionError> {
        let result = apply_decision(store, id, decision, actor_name, reason);

        match &result {
            Ok(request) => {
                info!(
                    event_name = "request.decided",
                    session_id = %self.audit.session_id,
                    request_id = %id,
                    actor = actor_name,
                    status = ?request.status,
                    "review decision recorded"
                );
                self.emit(
                    AuditEvent::new(
                        Some(id.clone()),
                        &self.audit,
                        "request.decided",
                        AuditCategory::Review,
                        AuditOutcome::Success,
                    )
                    .with_actor(actor_name)
                    .with_metadata("from", "Pending")
                    .with_metadata("to", format!("{:?}", request.status))
                    .with_metadata("reason", reason.trim()),
                );
            }
            Err(error) => {
                debug!(
                    event_name = "request.decision_rejected",
                    session_id = %self.audit.session_id,
                    request_id = %id,
                    actor = actor_name,
                    error = %error,
                    "review decision refused"
                );
                self.emit(
                    AuditEvent::new(
                        Some(id.clone()),
                        &self.audit,
                        "request.decision_rejected",
                        AuditCategory::Review,
                        AuditOutcome::Rejected,
                    )
                    .with_actor(actor_name)
                    .with_metadata("error", error.to_string()),
                );
            }
        }

        result
    }

    fn emit(&self, event: AuditEvent) {
        self.sink.emit(event);
    }
}

fn apply_decision(
    store: &mut RequestStore,
    id: &RequestId,
    decision: Decision,
    actor_name: &str,
    reason: &str,
) -> Result<DocumentRequest, DecisionError> {
    if !meets_min_reason(reason) {
        return Err(DecisionError::ReasonRequired);
    }

    let request = store.find_mut(id).ok_or_else(|| DecisionError::NotFound(id.clone()))?;
    request.apply_decision(StatusEvent {
        actor_name: actor_name.trim().to_string(),
        decision,
        reason: reason.trim().to_string(),
        date: Utc::now(),
    })?;

    Ok(request.clone())
}
