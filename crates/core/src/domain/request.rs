use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RequestId(pub u32);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three independent response slots a seller fills per request.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum FieldKind {
    Explanation,
    Pricing,
    Stock,
}

impl FieldKind {
    pub const ALL: [FieldKind; 3] = [FieldKind::Explanation, FieldKind::Pricing, FieldKind::Stock];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Explanation => "explanation",
            FieldKind::Pricing => "pricing",
            FieldKind::Stock => "stock",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Just received, not yet dispatched to sellers.
    Pending,
    /// Dispatched, sellers are working on it.
    Waiting,
    /// All three response fields are filled.
    Responded,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub buyer_message: String,
    pub explanation: Option<String>,
    pub pricing: Option<String>,
    pub stock: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn new(id: RequestId, buyer_message: impl Into<String>) -> Self {
        Self {
            id,
            buyer_message: buyer_message.into(),
            explanation: None,
            pricing: None,
            stock: None,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn label(&self) -> String {
        format!("REQ-{}", self.id.0)
    }

    pub fn field(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Explanation => self.explanation.as_deref(),
            FieldKind::Pricing => self.pricing.as_deref(),
            FieldKind::Stock => self.stock.as_deref(),
        }
    }

    /// Fill one response slot. Returns true when this submission completed
    /// the request (the status move to Responded is forward-only and fires
    /// exactly once).
    pub fn submit(&mut self, kind: FieldKind, value: impl Into<String>) -> bool {
        let slot = match kind {
            FieldKind::Explanation => &mut self.explanation,
            FieldKind::Pricing => &mut self.pricing,
            FieldKind::Stock => &mut self.stock,
        };
        *slot = Some(value.into());

        if self.is_fully_responded() && self.status != RequestStatus::Responded {
            self.status = RequestStatus::Responded;
            return true;
        }
        false
    }

    /// Move a freshly created request into the waiting state; requests that
    /// already progressed are left alone.
    pub fn mark_waiting(&mut self) {
        if self.status == RequestStatus::Pending {
            self.status = RequestStatus::Waiting;
        }
    }

    pub fn has_seller_response(&self) -> bool {
        self.explanation.is_some() || self.pricing.is_some() || self.stock.is_some()
    }

    pub fn is_fully_responded(&self) -> bool {
        self.explanation.is_some() && self.pricing.is_some() && self.stock.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, Request, RequestId, RequestStatus};

    #[test]
    fn becomes_responded_regardless_of_submission_order() {
        let mut request = Request::new(RequestId(1), "is the burger available?");
        request.mark_waiting();

        assert!(!request.submit(FieldKind::Stock, "in stock"));
        assert!(!request.submit(FieldKind::Explanation, "a beef burger"));
        assert_eq!(request.status, RequestStatus::Waiting);
        assert!(!request.is_fully_responded());

        assert!(request.submit(FieldKind::Pricing, "Rp 30.000"));
        assert!(request.is_fully_responded());
        assert_eq!(request.status, RequestStatus::Responded);
    }

    #[test]
    fn status_never_reverts_after_responded() {
        let mut request = Request::new(RequestId(7), "hello");
        request.mark_waiting();
        for kind in FieldKind::ALL {
            request.submit(kind, "filled");
        }
        assert_eq!(request.status, RequestStatus::Responded);

        // Re-submitting a field keeps the terminal status and does not
        // report a second completion.
        assert!(!request.submit(FieldKind::Pricing, "Rp 1.000"));
        assert_eq!(request.status, RequestStatus::Responded);

        request.mark_waiting();
        assert_eq!(request.status, RequestStatus::Responded);
    }

    #[test]
    fn label_carries_request_number() {
        let request = Request::new(RequestId(12), "x");
        assert_eq!(request.label(), "REQ-12");
    }

    #[test]
    fn has_seller_response_tracks_any_field() {
        let mut request = Request::new(RequestId(2), "x");
        assert!(!request.has_seller_response());
        request.submit(FieldKind::Explanation, "something");
        assert!(request.has_seller_response());
        assert!(!request.is_fully_responded());
    }
}
