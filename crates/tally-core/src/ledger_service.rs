//! Balance-level operations: initialization and explicit recalibration.

use tally_domain::LedgerState;

use crate::{input::ensure_finite, CoreError};

/// Provides the operations that set the balance directly.
pub struct LedgerService;

impl LedgerService {
    /// Sets the opening balance. Rejects non-finite and non-positive amounts.
    ///
    /// Overwriting an already initialized balance is allowed; the transaction
    /// list is never touched.
    pub fn initialize(state: &mut LedgerState, amount: f64) -> Result<(), CoreError> {
        let amount = ensure_finite(amount)?;
        if amount <= 0.0 {
            return Err(CoreError::validation(format!(
                "initial balance must be greater than zero (got {amount})"
            )));
        }
        match state.balance.replace(amount) {
            Some(previous) => tracing::info!(previous, balance = amount, "balance re-initialized"),
            None => tracing::info!(balance = amount, "balance initialized"),
        }
        Ok(())
    }

    /// Overrides the balance to match an outside source of truth.
    ///
    /// The transaction history is left as is, so the value becomes the new
    /// baseline that later credits and debits accumulate from. This is the
    /// only operation that moves the baseline.
    pub fn reset_balance(state: &mut LedgerState, amount: f64) -> Result<(), CoreError> {
        let amount = ensure_finite(amount)?;
        let previous = state.balance.ok_or(CoreError::BalanceNotInitialized)?;
        let previous_baseline = state.baseline().unwrap_or(previous);
        state.balance = Some(amount);
        let baseline = state.baseline().unwrap_or(amount);
        tracing::warn!(
            previous,
            balance = amount,
            drift = amount - previous,
            previous_baseline,
            baseline,
            transactions = state.transaction_count(),
            "balance reset; baseline moved away from transaction history"
        );
        Ok(())
    }
}
