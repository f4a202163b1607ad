//! Rule-based seller responses.
//!
//! Each of the three response fields has its own entry point. The
//! explanation side is a priority-ordered decision table over intent flags;
//! the pricing side quotes from the catalog and reserves a pending order;
//! the stock side reports availability tiers and owns the only catalog
//! mutation in the system, the confirm-and-deduct step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lapak_core::catalog::Catalog;
use lapak_core::config::PricingConfig;
use lapak_core::domain::order::PendingOrder;
use lapak_core::domain::product::{Product, ProductId};
use lapak_core::domain::request::RequestId;
use lapak_core::errors::DomainError;
use lapak_core::money;
use lapak_core::pending::PendingOrderTracker;

use crate::intent::{self, BuyerIntent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscountKind {
    Budget,
    Bulk,
}

impl DiscountKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiscountKind::Budget => "Budget discount",
            DiscountKind::Bulk => "Bulk discount",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    pub kind: DiscountKind,
    pub pct: u8,
    pub amount: Decimal,
}

/// Structured pricing result behind the rendered price text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub discount: Option<AppliedDiscount>,
    pub total: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PricingSuggestion {
    pub text: String,
    /// Present only when a catalog product was quoted.
    pub breakdown: Option<PriceBreakdown>,
}

/// A deduction performed by the confirmation path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmedOrder {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub remaining_stock: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StockReply {
    pub text: String,
    /// Present only when this reply confirmed and deducted a pending order.
    pub confirmation: Option<ConfirmedOrder>,
}

struct ExplanationRule {
    matches: fn(&BuyerIntent) -> bool,
    text: &'static str,
}

// Priority order: first matching branch wins.
const EXPLANATION_RULES: &[ExplanationRule] = &[
    ExplanationRule {
        matches: |intent| intent.spicy && intent.heavy_meal,
        text: "Our Ayam Geprek set is the one to beat: crispy chicken smashed with fiery \
               sambal and steamed rice on the side. A full plate with serious heat!",
    },
    ExplanationRule {
        matches: |intent| intent.spicy,
        text: "If you like it hot, the sambal dishes are the stars here. Ayam Geprek and \
               Rendang both bring real chili depth.",
    },
    ExplanationRule {
        matches: |intent| intent.sweet && intent.light_refreshment,
        text: "For something sweet and light, the Es Teh Manis and Mango Juice are \
               fresh-made daily. Perfect between meals!",
    },
    ExplanationRule {
        matches: |intent| intent.sweet,
        text: "Sweet tooth? Our drinks come in many flavors: Mango, Es Campur, and the \
               classic sweet iced tea.",
    },
    ExplanationRule {
        matches: |intent| intent.mild,
        text: "Prefer it gentle? The Nasi Padang set can be served mild: rich coconut \
               gravy, no chili burn.",
    },
    ExplanationRule {
        matches: |intent| intent.hungry && intent.heavy_meal,
        text: "Sounds like you need a proper plate! The Nasi Padang with Rendang is our \
               most filling set, it does not disappoint.",
    },
    ExplanationRule {
        matches: |intent| intent.light_refreshment,
        text: "A light bite it is. The Ekonomis Box or a cold drink keeps it simple and \
               quick.",
    },
    ExplanationRule {
        matches: |intent| intent.budget_conscious,
        text: "We have budget-friendly boxes starting from just Rp 15.000. Quality food \
               at the best prices!",
    },
];

const GENERIC_EXPLANATION: &str =
    "Thank you for your inquiry! Could you tell me which dish you'd like to know more about?";

const GENERIC_PRICE_PROMPT: &str =
    "Competitive pricing with best value guarantee. Please mention the dish for an exact quote.";

const GENERIC_STOCK_PROMPT: &str =
    "Tell me what you are looking for and I will check the stock right away.";

const NOTHING_TO_CONFIRM: &str =
    "There is nothing waiting for confirmation on this request. Ask me for a price first \
     and I will hold the order for you.";

const AFFIRMATIVE_WORDS: &[&str] =
    &["yes", "yep", "ok", "okay", "sure", "confirm", "deal", "jadi", "setuju"];

const AFFIRMATIVE_PHRASES: &[&str] = &["take it", "i'll take", "go ahead"];

/// True when the message signals the buyer is confirming an offer.
/// Single keywords match whole tokens so `ok` does not fire inside `look`.
pub fn is_confirmation(text: &str) -> bool {
    let normalized = text.to_lowercase();
    if AFFIRMATIVE_PHRASES.iter().any(|phrase| normalized.contains(phrase)) {
        return true;
    }
    normalized
        .split(|ch: char| !ch.is_alphanumeric() && ch != '\'')
        .any(|token| AFFIRMATIVE_WORDS.contains(&token))
}

#[derive(Clone, Debug)]
pub struct ResponseGenerator {
    pricing: PricingConfig,
}

impl ResponseGenerator {
    pub fn new(pricing: PricingConfig) -> Self {
        Self { pricing }
    }

    /// Explanation field: exactly one branch of the decision table fires.
    pub fn explanation(&self, intent: &BuyerIntent) -> String {
        EXPLANATION_RULES
            .iter()
            .find(|rule| (rule.matches)(intent))
            .map(|rule| rule.text.to_string())
            .unwrap_or_else(|| GENERIC_EXPLANATION.to_string())
    }

    /// Pricing field: quote a detected product and reserve a pending order
    /// for it, or fall back to a curated menu. Never mutates the catalog.
    pub fn pricing(
        &self,
        catalog: &Catalog,
        pending: &mut PendingOrderTracker,
        request_id: RequestId,
        message: &str,
        intent: &BuyerIntent,
    ) -> PricingSuggestion {
        let Some(product) = catalog.find_by_mention(message) else {
            return PricingSuggestion { text: self.menu_text(catalog, intent), breakdown: None };
        };

        let quantity = intent::extract_quantity(message);
        if quantity > product.stock {
            let text = if product.stock == 0 {
                format!(
                    "{} is sold out today, so I cannot quote that order. Ask me about the \
                     rest of the menu!",
                    product.name
                )
            } else {
                format!(
                    "Only {} of {} left, short of the {} you asked for. I can quote {} at \
                     {} each, just say the word.",
                    product.stock,
                    product.name,
                    quantity,
                    product.stock,
                    money::format_rupiah(product.unit_price)
                )
            };
            return PricingSuggestion { text, breakdown: None };
        }

        let breakdown = self.price(product, quantity, intent);
        pending.put(
            request_id,
            PendingOrder {
                product_id: product.id.clone(),
                quantity,
                preference: intent.preference().to_string(),
            },
        );
        let text = render_breakdown(&breakdown);
        PricingSuggestion { text, breakdown: Some(breakdown) }
    }

    /// Stock field: confirmation handling first, then tiered availability.
    pub fn stock(
        &self,
        catalog: &mut Catalog,
        pending: &mut PendingOrderTracker,
        request_id: RequestId,
        message: &str,
        intent: &BuyerIntent,
    ) -> StockReply {
        if is_confirmation(message) {
            return match pending.get(request_id).cloned() {
                Some(order) => self.confirm(catalog, pending, request_id, &order),
                None => StockReply { text: NOTHING_TO_CONFIRM.to_string(), confirmation: None },
            };
        }

        let Some(product) = catalog.find_by_mention(message) else {
            return StockReply { text: GENERIC_STOCK_PROMPT.to_string(), confirmation: None };
        };

        let text = match product.stock {
            0 => match alternative_for(catalog, product, intent) {
                Some(alternative) => format!(
                    "{} is sold out for today. {} is a close match and ready to go, shall \
                     I tell you about it?",
                    product.name, alternative.name
                ),
                None => format!(
                    "{} is sold out for today, and the rest of the menu is gone too. Come \
                     back tomorrow!",
                    product.name
                ),
            },
            stock @ 1..=3 => format!(
                "Only {} left of {}! Say yes and I will reserve yours right away.",
                stock, product.name
            ),
            stock @ 4..=10 => format!(
                "{} is available, {} portions ready. Shall I set one aside for you?",
                product.name, stock
            ),
            stock => format!("{} is in stock and ready, {} available.", product.name, stock),
        };
        StockReply { text, confirmation: None }
    }

    fn confirm(
        &self,
        catalog: &mut Catalog,
        pending: &mut PendingOrderTracker,
        request_id: RequestId,
        order: &PendingOrder,
    ) -> StockReply {
        let name = catalog
            .find(&order.product_id)
            .map(|product| product.name.clone())
            .unwrap_or_else(|| order.product_id.0.clone());

        // Re-validate against current stock: it may have moved since pricing.
        match catalog.deduct(&order.product_id, order.quantity) {
            Ok(remaining) => {
                pending.remove(request_id);
                StockReply {
                    text: format!(
                        "Confirmed! {} x {} set aside for you, {} left in stock. Thank you!",
                        order.quantity, name, remaining
                    ),
                    confirmation: Some(ConfirmedOrder {
                        product_id: order.product_id.clone(),
                        product_name: name,
                        quantity: order.quantity,
                        remaining_stock: remaining,
                    }),
                }
            }
            Err(DomainError::InsufficientStock { available: 0, .. }) => StockReply {
                text: format!(
                    "{name} just sold out, there is nothing left to set aside right now."
                ),
                confirmation: None,
            },
            Err(DomainError::InsufficientStock { available, .. }) => StockReply {
                text: format!(
                    "Stock moved while we talked, only {available} of {name} remain. I can \
                     confirm {available} instead, just say the word."
                ),
                confirmation: None,
            },
            Err(_) => StockReply { text: NOTHING_TO_CONFIRM.to_string(), confirmation: None },
        }
    }

    fn price(&self, product: &Product, quantity: u32, intent: &BuyerIntent) -> PriceBreakdown {
        let subtotal = product.unit_price * Decimal::from(quantity);
        let discount = self.applicable_discount(quantity, intent).map(|(kind, pct)| {
            AppliedDiscount {
                kind,
                pct,
                amount: subtotal * Decimal::from(pct) / Decimal::from(100u32),
            }
        });
        let total = subtotal
            - discount.as_ref().map(|applied| applied.amount).unwrap_or(Decimal::ZERO);

        PriceBreakdown {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            subtotal,
            discount,
            total,
        }
    }

    /// At most one discount applies; the budget rule wins when both do.
    fn applicable_discount(
        &self,
        quantity: u32,
        intent: &BuyerIntent,
    ) -> Option<(DiscountKind, u8)> {
        if intent.budget_conscious && quantity >= self.pricing.budget_min_qty {
            Some((DiscountKind::Budget, self.pricing.budget_discount_pct))
        } else if quantity >= self.pricing.bulk_min_qty {
            Some((DiscountKind::Bulk, self.pricing.bulk_discount_pct))
        } else {
            None
        }
    }

    fn menu_text(&self, catalog: &Catalog, intent: &BuyerIntent) -> String {
        let (tag, opener) = if intent.spicy {
            ("spicy", "Craving heat? Today's spicy picks")
        } else if intent.sweet {
            ("sweet", "Sweet side of the menu")
        } else {
            return GENERIC_PRICE_PROMPT.to_string();
        };

        let picks: Vec<String> = catalog
            .products()
            .iter()
            .filter(|product| product.has_tag(tag) && product.in_stock())
            .map(|product| {
                format!("{} ({})", product.name, money::format_rupiah(product.unit_price))
            })
            .collect();

        if picks.is_empty() {
            GENERIC_PRICE_PROMPT.to_string()
        } else {
            format!("{}: {}.", opener, picks.join(", "))
        }
    }
}

fn render_breakdown(breakdown: &PriceBreakdown) -> String {
    let mut text = format!(
        "{} x{}: {} each.\nSubtotal: {}",
        breakdown.product_name,
        breakdown.quantity,
        money::format_rupiah(breakdown.unit_price),
        money::format_rupiah(breakdown.subtotal)
    );
    if let Some(discount) = &breakdown.discount {
        text.push_str(&format!(
            "\n{} ({}%): -{}",
            discount.kind.label(),
            discount.pct,
            money::format_rupiah(discount.amount)
        ));
    }
    text.push_str(&format!(
        "\nTotal: {}\nSay yes and I will set it aside for you.",
        money::format_rupiah(breakdown.total)
    ));
    text
}

/// Pick a substitute: in stock, sharing a tag with the sold-out product or
/// matching the buyer's taste, falling back to anything still available.
fn alternative_for<'a>(
    catalog: &'a Catalog,
    product: &Product,
    intent: &BuyerIntent,
) -> Option<&'a Product> {
    let candidates =
        catalog.products().iter().filter(|candidate| {
            candidate.id != product.id && candidate.in_stock()
        });

    candidates
        .clone()
        .find(|candidate| {
            candidate.has_tag(intent.preference())
                || product.tags.iter().any(|tag| candidate.has_tag(tag))
        })
        .or_else(|| candidates.clone().next())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use lapak_core::config::{EngineConfig, PricingConfig};
    use lapak_core::domain::request::RequestId;
    use lapak_core::pending::PendingOrderTracker;
    use lapak_core::Catalog;

    use crate::intent::{analyze, BuyerIntent};

    use super::{is_confirmation, DiscountKind, ResponseGenerator};

    fn generator() -> ResponseGenerator {
        ResponseGenerator::new(PricingConfig {
            budget_discount_pct: 15,
            budget_min_qty: 2,
            bulk_discount_pct: 10,
            bulk_min_qty: 5,
        })
    }

    fn catalog() -> Catalog {
        EngineConfig::default().build_catalog().expect("default catalog is valid")
    }

    #[test]
    fn explanation_priority_spicy_heavy_beats_spicy_only() {
        let generator = generator();
        let both = generator.explanation(&analyze("spicy rice please"));
        let spicy_only = generator.explanation(&analyze("something spicy"));
        assert!(both.contains("Ayam Geprek set"));
        assert!(spicy_only.contains("sambal dishes"));
        assert_ne!(both, spicy_only);
    }

    #[test]
    fn explanation_falls_back_to_a_clarifying_question() {
        let generator = generator();
        let text = generator.explanation(&BuyerIntent::default());
        assert!(text.contains("which dish"));
    }

    #[test]
    fn bulk_discount_applies_at_five_or_more_without_budget_intent() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();

        let suggestion = generator.pricing(
            &catalog,
            &mut pending,
            RequestId(1),
            "6 Nasi Padang for the office",
            &analyze("6 Nasi Padang for the office"),
        );
        let breakdown = suggestion.breakdown.expect("product was quoted");
        assert_eq!(breakdown.subtotal, Decimal::from(150_000));
        let discount = breakdown.discount.expect("bulk discount applies");
        assert_eq!(discount.kind, DiscountKind::Bulk);
        assert_eq!(discount.amount, Decimal::from(15_000));
        assert_eq!(breakdown.total, Decimal::from(135_000));
    }

    #[test]
    fn budget_rule_wins_when_both_discounts_would_apply() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();
        let message = "we are on a budget, 6 Nasi Padang please";

        let suggestion =
            generator.pricing(&catalog, &mut pending, RequestId(1), message, &analyze(message));
        let discount = suggestion
            .breakdown
            .and_then(|breakdown| breakdown.discount)
            .expect("a discount applies");
        assert_eq!(discount.kind, DiscountKind::Budget);
        assert_eq!(discount.pct, 15);
    }

    #[test]
    fn budget_discount_applies_from_two_units() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();
        let message = "cheap price for 3 Nasi Padang?";

        let suggestion =
            generator.pricing(&catalog, &mut pending, RequestId(1), message, &analyze(message));
        let breakdown = suggestion.breakdown.expect("product was quoted");
        assert_eq!(breakdown.subtotal, Decimal::from(75_000));
        let discount = breakdown.discount.expect("budget discount applies");
        assert_eq!(discount.kind, DiscountKind::Budget);
        assert_eq!(discount.amount, Decimal::new(11_250, 0));
        assert_eq!(breakdown.total, Decimal::from(63_750));
    }

    #[test]
    fn no_discount_below_both_thresholds() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();
        let message = "2 Burger please";

        let suggestion =
            generator.pricing(&catalog, &mut pending, RequestId(1), message, &analyze(message));
        let breakdown = suggestion.breakdown.expect("product was quoted");
        assert!(breakdown.discount.is_none());
        assert_eq!(breakdown.total, Decimal::from(60_000));
    }

    #[test]
    fn pricing_registers_and_replaces_the_pending_order() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();

        generator.pricing(&catalog, &mut pending, RequestId(1), "2 Burger", &analyze("2 Burger"));
        assert_eq!(pending.get(RequestId(1)).map(|order| order.quantity), Some(2));

        generator.pricing(
            &catalog,
            &mut pending,
            RequestId(1),
            "actually 4 Rendang",
            &analyze("actually 4 Rendang"),
        );
        let order = pending.get(RequestId(1)).expect("replaced order");
        assert_eq!(order.product_id.0, "rendang");
        assert_eq!(order.quantity, 4);
    }

    #[test]
    fn over_stock_pricing_offers_the_limit_without_reserving() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();
        let message = "5 Ayam Geprek for tonight";

        let suggestion =
            generator.pricing(&catalog, &mut pending, RequestId(1), message, &analyze(message));
        assert!(suggestion.breakdown.is_none());
        assert!(suggestion.text.contains("Only 3 of Ayam Geprek left"));
        assert!(pending.is_empty());
    }

    #[test]
    fn menu_fallback_is_curated_by_taste() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let catalog = catalog();

        let spicy = generator.pricing(
            &catalog,
            &mut pending,
            RequestId(1),
            "how much for something spicy?",
            &analyze("how much for something spicy?"),
        );
        assert!(spicy.text.contains("spicy picks"));
        assert!(spicy.text.contains("Rendang"));
        assert!(pending.is_empty());

        let generic = generator.pricing(
            &catalog,
            &mut pending,
            RequestId(1),
            "how much?",
            &analyze("how much?"),
        );
        assert!(generic.text.contains("best value guarantee"));
    }

    #[test]
    fn stock_tiers_cover_all_bands() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let mut catalog = catalog();
        let intent = BuyerIntent::default();

        let sold_out = generator.stock(
            &mut catalog,
            &mut pending,
            RequestId(1),
            "is Es Campur available?",
            &intent,
        );
        assert!(sold_out.text.contains("sold out"));

        let urgent = generator.stock(
            &mut catalog,
            &mut pending,
            RequestId(1),
            "Ayam Geprek still there?",
            &intent,
        );
        assert!(urgent.text.contains("Only 3 left"));

        let set_aside = generator.stock(
            &mut catalog,
            &mut pending,
            RequestId(1),
            "Rendang stock?",
            &intent,
        );
        assert!(set_aside.text.contains("Shall I set one aside"));

        let plenty = generator.stock(
            &mut catalog,
            &mut pending,
            RequestId(1),
            "Burger stock?",
            &intent,
        );
        assert!(plenty.text.contains("15 available"));

        let generic = generator.stock(
            &mut catalog,
            &mut pending,
            RequestId(1),
            "anything good?",
            &intent,
        );
        assert!(generic.text.contains("check the stock"));
    }

    #[test]
    fn sold_out_reply_suggests_an_in_stock_alternative() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let mut catalog = catalog();

        let reply = generator.stock(
            &mut catalog,
            &mut pending,
            RequestId(1),
            "one Es Campur please",
            &BuyerIntent::default(),
        );
        // Es Campur is tagged sweet/drink; the substitute shares a tag.
        assert!(
            reply.text.contains("Es Teh Manis") || reply.text.contains("Mango Juice"),
            "unexpected alternative: {}",
            reply.text
        );
    }

    #[test]
    fn confirmation_deducts_once_and_clears_the_reservation() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let mut catalog = catalog();
        let message = "2 Burger please, yes go ahead";
        let intent = analyze(message);

        generator.pricing(&catalog, &mut pending, RequestId(1), message, &intent);
        let first = generator.stock(&mut catalog, &mut pending, RequestId(1), message, &intent);
        let confirmed = first.confirmation.expect("first confirmation deducts");
        assert_eq!(confirmed.quantity, 2);
        assert_eq!(confirmed.remaining_stock, 13);
        assert!(pending.is_empty());

        let second = generator.stock(&mut catalog, &mut pending, RequestId(1), message, &intent);
        assert!(second.confirmation.is_none());
        assert!(second.text.contains("nothing waiting for confirmation"));
        assert_eq!(
            catalog.find_by_mention("burger").map(|product| product.stock),
            Some(13)
        );
    }

    #[test]
    fn confirmation_with_shrunken_stock_keeps_the_reservation() {
        let generator = generator();
        let mut pending = PendingOrderTracker::new();
        let mut catalog = catalog();
        let message = "yes, 3 Ayam Geprek";
        let intent = analyze(message);

        generator.pricing(&catalog, &mut pending, RequestId(1), message, &intent);
        // Another request drains the stock before the buyer confirms.
        catalog
            .deduct(&lapak_core::ProductId("ayam-geprek".to_string()), 2)
            .expect("stock available");

        let reply = generator.stock(&mut catalog, &mut pending, RequestId(1), message, &intent);
        assert!(reply.confirmation.is_none());
        assert!(reply.text.contains("only 1 of Ayam Geprek remain"));
        assert!(pending.get(RequestId(1)).is_some());
        assert_eq!(
            catalog.find_by_mention("ayam geprek").map(|product| product.stock),
            Some(1)
        );
    }

    #[test]
    fn confirmation_keywords_match_tokens_not_substrings() {
        assert!(is_confirmation("Yes please"));
        assert!(is_confirmation("ok, deal"));
        assert!(is_confirmation("I'll take it"));
        assert!(!is_confirmation("have a look around"));
        assert!(!is_confirmation("booking for tomorrow"));
    }
}
