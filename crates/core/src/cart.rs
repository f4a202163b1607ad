use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::domain::order::CartItem;
use crate::domain::request::{FieldKind, RequestId};
use crate::money;

/// Buyer-side aggregation of chosen responses. Items are keyed by
/// (request id, field kind), so re-choosing a field replaces its line
/// instead of duplicating it. Iteration order is request id then field,
/// which matches arrival order because ids are monotonic.
#[derive(Clone, Debug, Default)]
pub struct CartAggregator {
    items: BTreeMap<(RequestId, FieldKind), CartItem>,
}

impl CartAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the chosen item for one response slot.
    /// Returns the replaced item, if any.
    pub fn choose(
        &mut self,
        request_id: RequestId,
        field: FieldKind,
        text: &str,
        quantity: u32,
        unit_price: Decimal,
    ) -> Option<CartItem> {
        self.items.insert(
            (request_id, field),
            CartItem { text: text.to_string(), quantity, unit_price },
        )
    }

    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of priced lines only; zero-priced items are listed but free.
    pub fn grand_total(&self) -> Decimal {
        self.items.values().filter(|item| item.is_priced()).map(CartItem::line_total).sum()
    }

    fn has_priced_items(&self) -> bool {
        self.items.values().any(|item| item.is_priced())
    }

    pub fn summary(&self, address: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str("\u{1F9FE} Order Summary\n");
        out.push_str("--------------------------\n\n");

        if let Some(address) = address.map(str::trim).filter(|address| !address.is_empty()) {
            out.push_str(&format!("\u{1F4CD} Address: {address}\n\n"));
        }

        for item in self.items.values() {
            out.push_str(&format!("\u{2022} {}  x{}", item.title(), item.quantity));
            if item.is_priced() {
                out.push_str(&format!("  =  {}", money::format_rupiah(item.line_total())));
            }
            out.push_str("\n\n");
        }

        out.push_str("--------------------------\n");
        if self.has_priced_items() {
            out.push_str(&format!(
                "Grand Total: {}\n\n",
                money::format_rupiah(self.grand_total())
            ));
        }
        out.push_str("Please confirm your order \u{1F60A}");
        out
    }
}
