pub mod audit;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod money;
pub mod pending;
pub mod registry;

pub use audit::{
    AuditCategory, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink, NullAuditSink,
};
pub use cart::CartAggregator;
pub use catalog::Catalog;
pub use config::{ConfigError, ConfigOverrides, EngineConfig, LoadOptions, PricingConfig};
pub use domain::order::{CartItem, PendingOrder};
pub use domain::product::{Product, ProductId};
pub use domain::request::{FieldKind, Request, RequestId, RequestStatus};
pub use errors::DomainError;
pub use pending::PendingOrderTracker;
pub use registry::{RequestRegistry, SubmitReceipt};
