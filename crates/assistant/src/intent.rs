//! Buyer intent detection.
//!
//! One declarative table maps keyword sets to intent flags; detection is a
//! case-insensitive substring scan, nothing smarter. Flags are independent
//! and any number of them may be set by a single message.

use serde::{Deserialize, Serialize};

use lapak_core::money;

/// Taste, budget, and urgency signals derived from one buyer message.
/// Recomputed per message, never persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerIntent {
    pub spicy: bool,
    pub sweet: bool,
    pub mild: bool,
    pub heavy_meal: bool,
    pub light_refreshment: bool,
    pub hungry: bool,
    pub refreshing: bool,
    pub budget_conscious: bool,
    pub premium: bool,
}

impl BuyerIntent {
    pub fn is_neutral(&self) -> bool {
        *self == Self::default()
    }

    /// Taste tag carried into a pending order.
    pub fn preference(&self) -> &'static str {
        if self.spicy {
            "spicy"
        } else if self.sweet {
            "sweet"
        } else if self.mild {
            "mild"
        } else {
            "regular"
        }
    }
}

struct KeywordRule {
    keywords: &'static [&'static str],
    apply: fn(&mut BuyerIntent),
}

const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["spicy", "hot", "pedas", "sambal", "chili"],
        apply: |intent| intent.spicy = true,
    },
    KeywordRule {
        keywords: &["sweet", "manis", "dessert", "sugar", "chocolate"],
        apply: |intent| intent.sweet = true,
    },
    KeywordRule {
        keywords: &["mild", "plain", "original", "biasa"],
        apply: |intent| intent.mild = true,
    },
    KeywordRule {
        keywords: &["rice", "nasi", "meal", "heavy", "filling", "main course"],
        apply: |intent| intent.heavy_meal = true,
    },
    KeywordRule {
        keywords: &["drink", "juice", "beverage", "snack", "light"],
        apply: |intent| intent.light_refreshment = true,
    },
    KeywordRule {
        keywords: &["hungry", "starving", "lapar"],
        apply: |intent| intent.hungry = true,
    },
    KeywordRule {
        keywords: &["fresh", "refreshing", "cold", "dingin", "segar"],
        apply: |intent| intent.refreshing = true,
    },
    KeywordRule {
        keywords: &["cheap", "budget", "affordable", "murah", "hemat", "promo", "discount"],
        apply: |intent| intent.budget_conscious = true,
    },
    KeywordRule {
        keywords: &["premium", "best", "special", "signature"],
        apply: |intent| intent.premium = true,
    },
];

/// Derive intent flags from a raw buyer message. Blank input yields a
/// neutral intent.
pub fn analyze(text: &str) -> BuyerIntent {
    let mut intent = BuyerIntent::default();
    let normalized = text.to_lowercase();
    for rule in KEYWORD_RULES {
        if rule.keywords.iter().any(|keyword| normalized.contains(keyword)) {
            (rule.apply)(&mut intent);
        }
    }
    intent
}

/// First integer literal in the message, defaulting to 1 when absent or
/// unparsable. Never below 1.
pub fn extract_quantity(text: &str) -> u32 {
    money::first_integer(text)
        .and_then(|value| u32::try_from(value).ok())
        .map(|value| value.max(1))
        .unwrap_or(1)
}
