use crate::domain::request::{FieldKind, Request, RequestId};

/// Outcome of a field submission against a known request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub fully_responded: bool,
    /// True only for the submission that completed the request.
    pub newly_responded: bool,
}

/// Tracks every buyer inquiry of the session. Ids are assigned
/// monotonically starting at 1, in message order.
#[derive(Clone, Debug)]
pub struct RequestRegistry {
    requests: Vec<Request>,
    next_id: u32,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestRegistry {
    pub fn new() -> Self {
        Self { requests: Vec::new(), next_id: 1 }
    }

    pub fn create(&mut self, buyer_message: &str) -> Request {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        let request = Request::new(id, buyer_message);
        self.requests.push(request.clone());
        request
    }

    /// Mark a request as dispatched to sellers (Pending -> Waiting).
    pub fn dispatch(&mut self, request_id: RequestId) -> Option<&Request> {
        let request = self.requests.iter_mut().find(|request| request.id == request_id)?;
        request.mark_waiting();
        Some(request)
    }

    pub fn find(&self, request_id: RequestId) -> Option<&Request> {
        self.requests.iter().find(|request| request.id == request_id)
    }

    /// Set one response field and re-evaluate the status. Unknown request
    /// ids yield None; the caller decides how to surface the no-op.
    pub fn submit_field(
        &mut self,
        request_id: RequestId,
        kind: FieldKind,
        value: &str,
    ) -> Option<SubmitReceipt> {
        let request = self.requests.iter_mut().find(|request| request.id == request_id)?;
        let newly_responded = request.submit(kind, value);
        Some(SubmitReceipt { fully_responded: request.is_fully_responded(), newly_responded })
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drop every request and restart id assignment at 1.
    pub fn clear(&mut self) {
        self.requests.clear();
        self.next_id = 1;
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::request::{FieldKind, RequestId, RequestStatus};

    use super::RequestRegistry;

    #[test]
    fn ids_are_assigned_in_message_order_starting_at_one() {
        let mut registry = RequestRegistry::new();
        let first = registry.create("how much is the burger?");
        let second = registry.create("any juice left?");
        assert_eq!(first.id, RequestId(1));
        assert_eq!(second.id, RequestId(2));
        assert_eq!(first.status, RequestStatus::Pending);
    }

    #[test]
    fn dispatch_moves_a_pending_request_to_waiting() {
        let mut registry = RequestRegistry::new();
        let request = registry.create("hello");
        let dispatched = registry.dispatch(request.id).expect("request exists");
        assert_eq!(dispatched.status, RequestStatus::Waiting);
    }

    #[test]
    fn submission_order_does_not_matter_for_completion() {
        let mut registry = RequestRegistry::new();
        let id = registry.create("how much?").id;
        registry.dispatch(id);

        let third = registry.submit_field(id, FieldKind::Stock, "ready").expect("known id");
        assert!(!third.newly_responded);
        let first = registry.submit_field(id, FieldKind::Explanation, "a set meal").expect("known id");
        assert!(!first.newly_responded);
        let second = registry.submit_field(id, FieldKind::Pricing, "Rp 25.000").expect("known id");
        assert!(second.newly_responded);
        assert!(second.fully_responded);

        assert_eq!(
            registry.find(id).map(|request| request.status),
            Some(RequestStatus::Responded)
        );
    }

    #[test]
    fn unknown_request_id_is_a_noop() {
        let mut registry = RequestRegistry::new();
        registry.create("hi");
        assert!(registry.submit_field(RequestId(99), FieldKind::Pricing, "x").is_none());
        assert!(registry.dispatch(RequestId(99)).is_none());
    }

    #[test]
    fn clear_resets_the_id_counter() {
        let mut registry = RequestRegistry::new();
        registry.create("one");
        registry.create("two");
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.create("again").id, RequestId(1));
    }
}
