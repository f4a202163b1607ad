use std::collections::HashMap;

use crate::domain::order::PendingOrder;
use crate::domain::request::RequestId;

/// Reservations awaiting buyer confirmation, at most one per request id.
#[derive(Clone, Debug, Default)]
pub struct PendingOrderTracker {
    orders: HashMap<RequestId, PendingOrder>,
}

impl PendingOrderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reservation for a request, replacing any earlier one
    /// (last write wins). Returns the replaced order, if any.
    pub fn put(&mut self, request_id: RequestId, order: PendingOrder) -> Option<PendingOrder> {
        self.orders.insert(request_id, order)
    }

    pub fn get(&self, request_id: RequestId) -> Option<&PendingOrder> {
        self.orders.get(&request_id)
    }

    pub fn remove(&mut self, request_id: RequestId) -> Option<PendingOrder> {
        self.orders.remove(&request_id)
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
