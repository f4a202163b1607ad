//! Rule-based seller assistant for the lapak negotiation chat.
//!
//! This crate is the "brain" behind the seller side of the chat:
//! - **Intent analysis** (`intent`) - keyword tables turn a free-text buyer
//!   message into structured taste/budget/urgency flags
//! - **Response generation** (`responder`) - deterministic rules produce the
//!   explanation, pricing, and stock field texts, including discounting and
//!   the confirm-and-deduct step
//! - **Session engine** (`session`) - the surface a UI collaborator drives:
//!   buyer messages in, field suggestions and order summaries out
//!
//! The rules are strictly deterministic: keyword matching and catalog
//! lookups decide everything, and the catalog is the single source of truth
//! for prices and stock.

pub mod intent;
pub mod responder;
pub mod session;

pub use intent::{analyze, extract_quantity, BuyerIntent};
pub use responder::{
    is_confirmation, AppliedDiscount, ConfirmedOrder, DiscountKind, PriceBreakdown,
    PricingSuggestion, ResponseGenerator, StockReply,
};
pub use session::{
    ChatSession, NullEvents, RecordingEvents, Seller, SessionEvent, SessionEvents,
};
