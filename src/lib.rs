//! Tally keeps a single running balance plus the credits and debits that
//! move it, behind an interactive (or scripted) command shell.

pub mod cli;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("tally tracing initialized");
    });
}
