pub mod client;
pub mod error;
pub mod history;
pub mod types;
pub mod utils;

pub use error::{HistoryError, Result};
pub use history::{Config, HistoryManager, Network};
pub use types::{NormalizedTransaction, RawTransactionSummary};
