use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Where a rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSource {
    Live,
    Cached,
    Fallback,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteSource::Live => "live",
            QuoteSource::Cached => "cached",
            QuoteSource::Fallback => "fallback",
        }
    }
}

// Rate > 0 always; identity rate 1 only with source = Fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub timestamp: u64,
    pub source: QuoteSource,
}

// Output of PriceOracle::calculate_swap; minimum_amount <= expected_amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    pub expected_amount: Decimal,      // Truncated to destination decimals
    pub minimum_amount: Decimal,       // After slippage tolerance
    pub price_impact: Decimal,         // Percent, within [0, 5]
    pub quote: Option<PriceQuote>,     // None for the zeroed result
}

impl SwapResult {
    pub fn zeroed() -> Self {
        Self {
            expected_amount: Decimal::ZERO,
            minimum_amount: Decimal::ZERO,
            price_impact: Decimal::ZERO,
            quote: None,
        }
    }
}
