//! Function tools used by the patterns

pub mod exchange;
pub mod fees;
pub mod search;

pub use exchange::{EXCHANGE_RATE_TOOL, exchange_rate, exchange_rate_tool};
pub use fees::{FEE_TOOL, fee_for_payment_method, fee_tool};
pub use search::{SEARCH_TOOL, SearchBackend, SearchResult, StaticSearchBackend, WebSearchTool};
