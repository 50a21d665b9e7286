pub mod quotes;
pub mod tokens;
pub mod transactions;
pub mod wallet;

pub use quotes::{PriceQuote, QuoteSource, SwapResult};
pub use tokens::{Token, TokenAddress, TokenRegistry};
pub use transactions::{TransactionKind, TransactionRecord, TransactionStatus};
pub use wallet::WalletSession;
