//! tally-core
//!
//! Ledger engine and session services for Tally.
//! Depends on tally-domain. No CLI, no terminal I/O; persistence goes through
//! the [`store::PersistedStore`] trait.

pub mod error;
pub mod export;
pub mod input;
pub mod ledger_service;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod summary_service;
pub mod time;
pub mod transaction_service;

pub use error::CoreError;
pub use export::{ExportError, ExportFormatter};
pub use ledger_service::*;
pub use session::{Applied, LedgerSession};
pub use store::{MemoryStore, PersistedStore, StoreError};
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use transaction_service::*;

#[cfg(test)]
mod tests;
