//! tally-domain
//!
//! Pure ledger models (Transaction, LedgerState, filters and totals).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod filter;
pub mod ledger;
pub mod totals;
pub mod transaction;

pub use common::*;
pub use filter::*;
pub use ledger::*;
pub use totals::*;
pub use transaction::*;
