use crate::domain::request::{DocumentRequest, RequestId};

const FIRST_SEQUENCE: u64 = 1000;

/// The requests owned by one session, most recent first.
#[derive(Clone, Debug)]
pub struct RequestStore {
    requests: Vec<DocumentRequest>,
    next_sequence: u64,
}

impl Default for RequestStore {
    fn default() -> Self {
        Self { requests: Vec::new(), next_sequence: FIRST_SEQUENCE }
    }
}

impl RequestStore {
    /// Hands out the next identifier. The counter never moves backwards, so a
    /// cancelled request's id is never handed out again.
    pub fn allocate_id(&mut self) -> RequestId {
        self.next_sequence += 1;
        RequestId(format!("r-{}", self.next_sequence))
    }

    pub fn insert_front(&mut self, request: DocumentRequest) {
        self.requests.insert(0, request);
    }

    pub fn find(&self, id: &RequestId) -> Option<&DocumentRequest> {
        self.requests.iter().find(|request| &request.id == id)
    }

    pub fn find_mut(&mut self, id: &RequestId) -> Option<&mut DocumentRequest> {
        self.requests.iter_mut().find(|request| &request.id == id)
    }

    pub fn remove(&mut self, id: &RequestId) -> Option<DocumentRequest> {
        let index = self.requests.iter().position(|request| &request.id == id)?;
        Some(self.requests.remove(index))
    }

    pub fn requests(&self) -> &[DocumentRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::request::{DocumentRequest, DocumentType};

    use super::RequestStore;

    fn request(store: &mut RequestStore) -> DocumentRequest {
        DocumentRequest::submitted(
            store.allocate_id(),
            DocumentType::Other,
            "2025",
            1,
            "Besoin personnel",
            Utc::now(),
        )
    }

    #[test]
    fn newest_request_sits_at_the_head() {
        let mut store = RequestStore::default();
        let first = request(&mut store);
        let second = request(&mut store);
        store.insert_front(first.clone());
        store.insert_front(second.clone());

        let ids: Vec<_> = store.requests().iter().map(|request| request.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[test]
    fn removed_ids_are_not_handed_out_again() {
        let mut store = RequestStore::default();
        let first = request(&mut store);
        let removed_id = first.id.clone();
        store.insert_front(first);
        assert!(store.remove(&removed_id).is_some());
        assert!(store.is_empty());

        let next = store.allocate_id();
        assert_ne!(next, removed_id);
        assert!(store.remove(&removed_id).is_none());
    }
}
