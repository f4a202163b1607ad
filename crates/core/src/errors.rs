use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock { product_id: ProductId, requested: u32, available: u32 },
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}
