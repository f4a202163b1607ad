//! The chat session engine.
//!
//! One `ChatSession` value owns every piece of per-session state (catalog,
//! requests, reservations, cart) and is passed by reference into each
//! handler; there is no ambient global state. Collaborators observe the
//! session through the fire-and-forget `SessionEvents` trait and the audit
//! sink, and the engine never depends on either acknowledging anything.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

use lapak_core::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink, NullAuditSink};
use lapak_core::cart::CartAggregator;
use lapak_core::catalog::Catalog;
use lapak_core::config::{ConfigError, EngineConfig};
use lapak_core::domain::request::{FieldKind, Request, RequestId};
use lapak_core::pending::PendingOrderTracker;
use lapak_core::registry::RequestRegistry;

use crate::intent;
use crate::responder::ResponseGenerator;

/// A seller identity threaded through suggest/submit for attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Seller {
    pub index: usize,
    pub name: String,
}

impl Seller {
    pub fn numbered(index: usize) -> Self {
        Self { index, name: format!("Seller {}", index + 1) }
    }
}

/// Outbound notifications to the UI collaborator. Fire-and-forget: the
/// engine consumes no return values and never waits on the receiver.
pub trait SessionEvents: Send + Sync {
    fn request_created(&self, request: &Request);
    fn field_response_available(
        &self,
        request_id: RequestId,
        field: FieldKind,
        seller: &str,
        value: &str,
    );
    fn request_fully_responded(&self, request_id: RequestId);
    fn summary_updated(&self, summary: &str);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullEvents;

impl SessionEvents for NullEvents {
    fn request_created(&self, _request: &Request) {}
    fn field_response_available(
        &self,
        _request_id: RequestId,
        _field: FieldKind,
        _seller: &str,
        _value: &str,
    ) {
    }
    fn request_fully_responded(&self, _request_id: RequestId) {}
    fn summary_updated(&self, _summary: &str) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    RequestCreated { request_id: RequestId, label: String },
    FieldResponseAvailable {
        request_id: RequestId,
        field: FieldKind,
        seller: String,
        value: String,
    },
    RequestFullyResponded { request_id: RequestId },
    SummaryUpdated { summary: String },
}

/// Event receiver for tests and headless embedders.
#[derive(Clone, Default)]
pub struct RecordingEvents {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<SessionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: SessionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

impl SessionEvents for RecordingEvents {
    fn request_created(&self, request: &Request) {
        self.push(SessionEvent::RequestCreated {
            request_id: request.id,
            label: request.label(),
        });
    }

    fn field_response_available(
        &self,
        request_id: RequestId,
        field: FieldKind,
        seller: &str,
        value: &str,
    ) {
        self.push(SessionEvent::FieldResponseAvailable {
            request_id,
            field,
            seller: seller.to_string(),
            value: value.to_string(),
        });
    }

    fn request_fully_responded(&self, request_id: RequestId) {
        self.push(SessionEvent::RequestFullyResponded { request_id });
    }

    fn summary_updated(&self, summary: &str) {
        self.push(SessionEvent::SummaryUpdated { summary: summary.to_string() });
    }
}

pub struct ChatSession<A = NullAuditSink, E = NullEvents>
where
    A: AuditSink,
    E: SessionEvents,
{
    catalog: Catalog,
    registry: RequestRegistry,
    pending: PendingOrderTracker,
    cart: CartAggregator,
    responder: ResponseGenerator,
    shipping_address: Option<String>,
    audit: A,
    events: E,
}

impl ChatSession {
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_observers(config, NullAuditSink, NullEvents)
    }
}

impl<A, E> ChatSession<A, E>
where
    A: AuditSink,
    E: SessionEvents,
{
    pub fn with_observers(config: &EngineConfig, audit: A, events: E) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog: config.build_catalog()?,
            registry: RequestRegistry::new(),
            pending: PendingOrderTracker::new(),
            cart: CartAggregator::new(),
            responder: ResponseGenerator::new(config.pricing),
            shipping_address: None,
            audit,
            events,
        })
    }

    /// Register a buyer inquiry and dispatch it to the sellers.
    pub fn handle_buyer_message(&mut self, text: &str) -> Request {
        let created = self.registry.create(text);
        let request = self
            .registry
            .dispatch(created.id)
            .cloned()
            .unwrap_or(created);

        self.audit.emit(
            AuditEvent::new(
                Some(request.id),
                "request.created",
                AuditCategory::Ingress,
                "buyer",
                AuditOutcome::Success,
            )
            .with_metadata("label", request.label()),
        );
        self.events.request_created(&request);
        request
    }

    /// Run the response generator for one field and return the suggested
    /// text. Used for manual fill and AI-assist alike. Unknown request ids
    /// are a logged no-op and yield an empty suggestion.
    pub fn suggest_field(
        &mut self,
        request_id: RequestId,
        field: FieldKind,
        seller: &Seller,
    ) -> String {
        let Some(request) = self.registry.find(request_id) else {
            self.audit.emit(
                AuditEvent::new(
                    Some(request_id),
                    "suggest.unknown_request",
                    AuditCategory::Response,
                    seller.name.clone(),
                    AuditOutcome::NoOp,
                )
                .with_metadata("field", field.as_str()),
            );
            return String::new();
        };

        let message = request.buyer_message.clone();
        let buyer_intent = intent::analyze(&message);

        let (category, text) = match field {
            FieldKind::Explanation => {
                (AuditCategory::Response, self.responder.explanation(&buyer_intent))
            }
            FieldKind::Pricing => {
                let suggestion = self.responder.pricing(
                    &self.catalog,
                    &mut self.pending,
                    request_id,
                    &message,
                    &buyer_intent,
                );
                (AuditCategory::Response, suggestion.text)
            }
            FieldKind::Stock => {
                let reply = self.responder.stock(
                    &mut self.catalog,
                    &mut self.pending,
                    request_id,
                    &message,
                    &buyer_intent,
                );
                if let Some(confirmed) = &reply.confirmation {
                    self.audit.emit(
                        AuditEvent::new(
                            Some(request_id),
                            "order.confirmed",
                            AuditCategory::Stock,
                            seller.name.clone(),
                            AuditOutcome::Success,
                        )
                        .with_metadata("product", confirmed.product_id.to_string())
                        .with_metadata("quantity", confirmed.quantity.to_string())
                        .with_metadata("remaining", confirmed.remaining_stock.to_string()),
                    );
                }
                (AuditCategory::Stock, reply.text)
            }
        };

        self.audit.emit(
            AuditEvent::new(
                Some(request_id),
                "field.suggested",
                category,
                seller.name.clone(),
                AuditOutcome::Success,
            )
            .with_metadata("field", field.as_str()),
        );
        text
    }

    /// Generate suggestions for all three fields at once, in field order.
    pub fn suggest_all(&mut self, request_id: RequestId, seller: &Seller) -> [String; 3] {
        [
            self.suggest_field(request_id, FieldKind::Explanation, seller),
            self.suggest_field(request_id, FieldKind::Pricing, seller),
            self.suggest_field(request_id, FieldKind::Stock, seller),
        ]
    }

    /// Commit one response field for a request.
    pub fn submit_field(
        &mut self,
        request_id: RequestId,
        field: FieldKind,
        value: &str,
        seller: &Seller,
    ) {
        match self.registry.submit_field(request_id, field, value) {
            Some(receipt) => {
                self.audit.emit(
                    AuditEvent::new(
                        Some(request_id),
                        "field.submitted",
                        AuditCategory::Response,
                        seller.name.clone(),
                        AuditOutcome::Success,
                    )
                    .with_metadata("field", field.as_str()),
                );
                self.events.field_response_available(request_id, field, &seller.name, value);
                if receipt.newly_responded {
                    self.events.request_fully_responded(request_id);
                }
            }
            None => {
                self.audit.emit(
                    AuditEvent::new(
                        Some(request_id),
                        "submit.unknown_request",
                        AuditCategory::Response,
                        seller.name.clone(),
                        AuditOutcome::NoOp,
                    )
                    .with_metadata("field", field.as_str()),
                );
            }
        }
    }

    /// Buyer picks a response for the cart; returns the refreshed summary.
    pub fn choose(
        &mut self,
        request_id: RequestId,
        field: FieldKind,
        text: &str,
        quantity: u32,
        unit_price: Decimal,
    ) -> String {
        if self.registry.find(request_id).is_none() {
            self.audit.emit(
                AuditEvent::new(
                    Some(request_id),
                    "choose.unknown_request",
                    AuditCategory::Cart,
                    "buyer",
                    AuditOutcome::NoOp,
                )
                .with_metadata("field", field.as_str()),
            );
            return self.summary();
        }

        self.cart.choose(request_id, field, text, quantity, unit_price);
        self.audit.emit(
            AuditEvent::new(
                Some(request_id),
                "cart.item_chosen",
                AuditCategory::Cart,
                "buyer",
                AuditOutcome::Success,
            )
            .with_metadata("field", field.as_str())
            .with_metadata("quantity", quantity.to_string()),
        );

        let summary = self.summary();
        self.events.summary_updated(&summary);
        summary
    }

    pub fn set_shipping_address(&mut self, address: &str) {
        let trimmed = address.trim();
        self.shipping_address =
            if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    pub fn summary(&self) -> String {
        self.cart.summary(self.shipping_address.as_deref())
    }

    /// Reset requests, reservations, cart, and address. Catalog stock is
    /// deliberately left as it is: confirmed deductions survive a clear.
    pub fn clear(&mut self) {
        self.registry.clear();
        self.pending.clear();
        self.cart.clear();
        self.shipping_address = None;
        self.audit.emit(AuditEvent::new(
            None,
            "session.cleared",
            AuditCategory::System,
            "buyer",
            AuditOutcome::Success,
        ));
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn requests(&self) -> &[Request] {
        self.registry.requests()
    }
}

#[cfg(test)]
mod tests {
    use lapak_core::audit::{AuditOutcome, InMemoryAuditSink};
    use lapak_core::config::EngineConfig;
    use lapak_core::domain::request::{FieldKind, RequestId, RequestStatus};

    use super::{ChatSession, NullEvents, RecordingEvents, Seller, SessionEvent};

    fn session() -> ChatSession<InMemoryAuditSink, RecordingEvents> {
        ChatSession::with_observers(
            &EngineConfig::default(),
            InMemoryAuditSink::default(),
            RecordingEvents::default(),
        )
        .expect("default config builds")
    }

    #[test]
    fn buyer_message_creates_a_waiting_request_and_notifies() {
        let events = RecordingEvents::default();
        let mut session = ChatSession::with_observers(
            &EngineConfig::default(),
            InMemoryAuditSink::default(),
            events.clone(),
        )
        .expect("default config builds");

        let request = session.handle_buyer_message("2 Burger please");
        assert_eq!(request.id, RequestId(1));
        assert_eq!(request.status, RequestStatus::Waiting);
        assert_eq!(
            events.events(),
            vec![SessionEvent::RequestCreated { request_id: RequestId(1), label: "REQ-1".to_string() }]
        );
    }

    #[test]
    fn unknown_request_submissions_are_audited_noops() {
        let sink = InMemoryAuditSink::default();
        let mut session =
            ChatSession::with_observers(&EngineConfig::default(), sink.clone(), NullEvents)
                .expect("default config builds");

        session.submit_field(RequestId(42), FieldKind::Pricing, "Rp 1.000", &Seller::numbered(0));

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "submit.unknown_request");
        assert_eq!(events[0].outcome, AuditOutcome::NoOp);
    }

    #[test]
    fn suggesting_for_an_unknown_request_returns_an_empty_string() {
        let mut session = session();
        let text = session.suggest_field(RequestId(9), FieldKind::Explanation, &Seller::numbered(0));
        assert!(text.is_empty());
    }

    #[test]
    fn clear_resets_requests_cart_but_not_catalog_stock() {
        let mut session = session();
        let seller = Seller::numbered(0);

        let request = session.handle_buyer_message("2 Burger, yes take it");
        session.suggest_field(request.id, FieldKind::Pricing, &seller);
        session.suggest_field(request.id, FieldKind::Stock, &seller);
        assert_eq!(
            session.catalog().find_by_mention("burger").map(|p| p.stock),
            Some(13)
        );

        session.clear();
        assert!(session.requests().is_empty());
        assert!(session.summary().contains("Order Summary"));
        // stock deduction survives the clear
        assert_eq!(
            session.catalog().find_by_mention("burger").map(|p| p.stock),
            Some(13)
        );
        // and request ids restart at 1
        assert_eq!(session.handle_buyer_message("hello again").id, RequestId(1));
    }
}
