use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// A tentative reservation of product and quantity awaiting buyer
/// confirmation. Its lifetime is bounded by the owning request: a newer
/// pricing call for the same request id replaces it, confirmation removes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub product_id: ProductId,
    pub quantity: u32,
    pub preference: String,
}

/// A buyer-chosen response line contributing to the order summary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub text: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl CartItem {
    /// The first line of the chosen response, used as the summary title.
    pub fn title(&self) -> &str {
        self.text.lines().next().unwrap_or("").trim()
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    pub fn is_priced(&self) -> bool {
        self.unit_price > Decimal::ZERO
    }
}
