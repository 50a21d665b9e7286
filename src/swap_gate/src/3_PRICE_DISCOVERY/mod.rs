//! # Price Discovery
//!
//! Exchange-rate quoting for swap previews and settlement.
//!
//! ## Architecture
//!
//! ### oracle/
//! `PriceOracle`: cache → live feed → fallback table → identity rate.
//! Also turns a rate into expected/minimum output via `calculate_swap`.
//!
//! ### fallback/
//! Static cross-rate table consulted when the live feed cannot answer.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let oracle = PriceOracle::new(feed, FallbackRates::default(), clock, &config.oracle);
//! let result = oracle.calculate_swap(&eth, &usdc, dec!(1.0), dec!(0.5)).await?;
//! // expected 2500.000000, minimum 2487.500000
//! ```

pub mod fallback;
pub mod oracle;

pub use fallback::FallbackRates;
pub use oracle::{CacheStats, PriceFeed, PriceOracle, StaticPriceFeed, UnavailablePriceFeed};
