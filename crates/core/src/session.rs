use chrono::{Datelike, Utc};
use uuid::Uuid;

use crate::audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
};
use crate::config::PortalConfig;
use crate::domain::document::IssuedDocument;
use crate::domain::notification::Notification;
use crate::domain::request::{Decision, DocumentRequest, RequestId};
use crate::domain::school_year::SchoolYearWindow;
use crate::errors::{CancelError, DecisionError, ValidationError};
use crate::filter::StatusFilter;
use crate::library::DocumentLibrary;
use crate::lifecycle::{CreateRequestInput, RequestLifecycleManager};
use crate::notifications::NotificationFeed;
use crate::stats::DashboardStats;
use crate::store::RequestStore;

/// One user's portal session: the requests they own, the notifications and
/// issued documents those requests produced, and the rules applied to them.
pub struct Session<S> {
    id: String,
    reviewer_name: String,
    manager: RequestLifecycleManager<S>,
    store: RequestStore,
    notifications: NotificationFeed,
    library: DocumentLibrary,
}

impl Session<InMemoryAuditSink> {
    /// Opens a session with an in-memory audit trail and the school-year window
    /// anchored on the current calendar year.
    pub fn open(portal: &PortalConfig, owner: impl Into<String>) -> Self {
        let id = format!("session-{}", Uuid::new_v4());
        let years = SchoolYearWindow::recent(Utc::now().year(), portal.school_year_window);
        let audit = AuditContext::new(id.clone(), id.clone(), owner);
        let sink = InMemoryAuditSink::default();
        sink.emit(
            AuditEvent::new(
                None,
                &audit,
                "session.opened",
                AuditCategory::System,
                AuditOutcome::Success,
            )
            .with_metadata("school_years", years.labels().join(",")),
        );
        let manager = RequestLifecycleManager::new(years, sink, audit);
        Self::with_manager(id, portal.reviewer_name.clone(), manager)
    }
}

impl<S> Session<S>
where
    S: AuditSink,
{
    pub fn with_manager(
        id: impl Into<String>,
        reviewer_name: impl Into<String>,
        manager: RequestLifecycleManager<S>,
    ) -> Self {
        Self {
            id: id.into(),
            reviewer_name: reviewer_name.into(),
            manager,
            store: RequestStore::default(),
            notifications: NotificationFeed::default(),
            library: DocumentLibrary::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn manager(&self) -> &RequestLifecycleManager<S> {
        &self.manager
    }

    pub fn school_years(&self) -> &SchoolYearWindow {
        self.manager.school_years()
    }

    pub fn submit(
        &mut self,
        input: &CreateRequestInput,
    ) -> Result<DocumentRequest, ValidationError> {
        let request = self.manager.create(&mut self.store, input)?;
        self.notifications.push(Notification::submitted(&request));
        Ok(request)
    }

    pub fn cancel(&mut self, id: &RequestId) -> Result<(), CancelError> {
        self.manager.cancel(&mut self.store, id)
    }

    /// Records a reviewer decision and files the resulting document. A blank
    /// actor name falls back to the configured reviewer label.
    pub fn decide(
        &mut self,
        id: &RequestId,
        decision: Decision,
        actor_name: Option<&str>,
        reason: &str,
    ) -> Result<DocumentRequest, DecisionError> {
        let actor = actor_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.reviewer_name.as_str())
            .to_string();
        let request = self.manager.decide(&mut self.store, id, decision, &actor, reason)?;
        if let Some(event) = request.history().last() {
            self.notifications.push(Notification::decided(
                &request,
                decision,
                &event.reason,
                event.date,
            ));
        }
        if let Some(document) = IssuedDocument::from_decided(&request) {
            self.library.file(document);
        }
        Ok(request)
    }

    pub fn list(&self, status: StatusFilter, query: &str) -> Vec<DocumentRequest> {
        self.manager.filter(self.store.requests(), status, query)
    }

    pub fn requests(&self) -> &[DocumentRequest] {
        self.store.requests()
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.notifications
    }

    pub fn library(&self) -> &DocumentLibrary {
        &self.library
    }

    /// Adds a document delivered outside the request flow, such as an archived one.
    pub fn file_document(&mut self, document: IssuedDocument) {
        self.library.file(document);
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::from_requests(self.store.requests())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Utc};

    use crate::config::AppConfig;
    use crate::domain::request::{Decision, DocumentType, RequestStatus};
    use crate::filter::StatusFilter;
    use crate::library::CategoryFilter;
    use crate::lifecycle::CreateRequestInput;

    use super::Session;

    fn session() -> Session<crate::audit::InMemoryAuditSink> {
        Session::open(&AppConfig::default().portal, "student")
    }

    fn form(kind: DocumentType, reason: &str) -> CreateRequestInput {
        CreateRequestInput::new(kind, Utc::now().year().to_string(), 1, reason)
    }

    #[test]
    fn submit_and_decide_feed_the_notification_list() {
        let mut session = session();
        let request =
            session.submit(&form(DocumentType::Transcript, "Bulletin S2")).expect("valid form");
        session
            .decide(&request.id, Decision::Approved, Some("Admin"), "Vérifié OK")
            .expect("approve");

        let feed = session.notifications().items();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].title, "Demande validée");
        assert_eq!(feed[0].status, RequestStatus::Approved);
        assert_eq!(feed[0].details, "Vérifié OK");
        assert_eq!(feed[1].title, "Demande envoyée");
    }

    #[test]
    fn failed_operations_add_no_notification() {
        let mut session = session();
        let _ = session.submit(&form(DocumentType::Transcript, "ok"));
        assert!(session.notifications().is_empty());

        let request = session.submit(&form(DocumentType::Other, "Certificat")).expect("valid");
        let _ = session.decide(&request.id, Decision::Rejected, None, "");
        assert_eq!(session.notifications().len(), 1);
    }

    #[test]
    fn decided_requests_are_filed_in_the_library() {
        let mut session = session();
        let approved = session.submit(&form(DocumentType::Transcript, "Bulletin S2")).expect("ok");
        let rejected = session.submit(&form(DocumentType::Other, "Certificat")).expect("ok");
        session.submit(&form(DocumentType::InternshipAgreement, "Stage")).expect("ok");
        session.decide(&approved.id, Decision::Approved, None, "Vérifié OK").expect("approve");
        session.decide(&rejected.id, Decision::Rejected, None, "Doublon").expect("reject");
        let _ = session.decide(&approved.id, Decision::Rejected, None, "Trop tard");

        assert_eq!(session.library().len(), 2);
        let bulletins = session.library().search(
            "bulletin".parse::<CategoryFilter>().expect("chip"),
            StatusFilter::Only(RequestStatus::Approved),
            "",
        );
        assert_eq!(bulletins.len(), 1);
        assert_eq!(bulletins[0].request_id.as_ref(), Some(&approved.id));
    }

    #[test]
    fn opening_a_session_is_audited() {
        let session = session();
        let events = session.manager().sink().events();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "session.opened");
        assert_eq!(events[0].session_id, session.id());
        assert_eq!(events[0].actor, "student");
    }

    #[test]
    fn blank_actor_falls_back_to_the_configured_reviewer() {
        let mut session = session();
        let request = session.submit(&form(DocumentType::Other, "Certificat")).expect("valid");

        let decided = session
            .decide(&request.id, Decision::Rejected, Some("   "), "Info manquante")
            .expect("reject");

        assert_eq!(decided.history()[0].actor_name, "Vous");
    }

    #[test]
    fn stats_and_listing_follow_the_store() {
        let mut session = session();
        let kept = session.submit(&form(DocumentType::Transcript, "Bulletin S1")).expect("ok");
        let dropped = session.submit(&form(DocumentType::Other, "Erreur de saisie")).expect("ok");
        session.cancel(&dropped.id).expect("pending can be cancelled");
        session.decide(&kept.id, Decision::Rejected, Some("Admin"), "Doublon").expect("reject");

        let stats = session.stats();
        assert_eq!((stats.processed, stats.pending, stats.rejected, stats.approved), (1, 0, 1, 0));
        assert_eq!(session.list(StatusFilter::Only(RequestStatus::Rejected), "").len(), 1);
        assert!(session.list(StatusFilter::All, "saisie").is_empty());
    }
}
