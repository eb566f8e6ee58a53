//! Business logic for recording, replacing and removing transactions.

use chrono::NaiveDate;
use uuid::Uuid;

use tally_domain::{
    normalize_text, Displayable, LedgerState, Totals, Transaction, TransactionDraft,
};

use crate::{input::require_positive, CoreError};

/// Validated create/edit/delete over a [`LedgerState`].
///
/// Every operation validates first and mutates last, so an `Err` always
/// leaves the state exactly as it was.
pub struct TransactionService;

impl TransactionService {
    /// Records a new transaction and returns its identifier.
    ///
    /// `today` fills in the date when the draft has none.
    pub fn apply(
        state: &mut LedgerState,
        draft: TransactionDraft,
        today: NaiveDate,
    ) -> Result<Uuid, CoreError> {
        let balance = state.balance.ok_or(CoreError::BalanceNotInitialized)?;
        let amount = require_positive(draft.amount)?;
        let transaction = Transaction {
            id: Uuid::new_v4(),
            kind: draft.kind,
            amount,
            person: normalize_text(draft.person),
            category: normalize_text(draft.category),
            date: draft.date.unwrap_or(today),
        };
        let id = transaction.id;
        state.balance = Some(balance + transaction.signed_amount());
        tracing::debug!(%id, kind = %transaction.kind, amount, "transaction applied");
        state.transactions.push(transaction);
        Ok(id)
    }

    /// Replaces every field of the transaction identified by `id`.
    ///
    /// The balance is re-derived from the baseline and the full transaction
    /// list rather than adjusted, so a credit/debit flip is counted once.
    pub fn edit(
        state: &mut LedgerState,
        id: Uuid,
        draft: TransactionDraft,
    ) -> Result<(), CoreError> {
        let baseline = state.baseline().ok_or(CoreError::BalanceNotInitialized)?;
        let index = state
            .position(id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        let amount = require_positive(draft.amount)?;
        let date = draft
            .date
            .ok_or_else(|| CoreError::validation("date is required when editing"))?;

        let txn = &mut state.transactions[index];
        txn.kind = draft.kind;
        txn.amount = amount;
        txn.person = normalize_text(draft.person);
        txn.category = normalize_text(draft.category);
        txn.date = date;

        let net = Totals::from_transactions(&state.transactions).net();
        state.balance = Some(baseline + net);
        tracing::debug!(%id, amount, "transaction edited");
        Ok(())
    }

    /// Removes the transaction identified by `id` and reverses its effect.
    pub fn delete(state: &mut LedgerState, id: Uuid) -> Result<Transaction, CoreError> {
        let balance = state.balance.ok_or(CoreError::BalanceNotInitialized)?;
        let index = state
            .position(id)
            .ok_or(CoreError::TransactionNotFound(id))?;
        let removed = state.transactions.remove(index);
        state.balance = Some(balance - removed.signed_amount());
        tracing::debug!(%id, label = %removed.display_label(), "transaction deleted");
        Ok(removed)
    }

    /// Returns the transactions in storage (insertion) order.
    pub fn list(state: &LedgerState) -> Vec<&Transaction> {
        state.transactions.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_domain::TransactionKind;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn initialized(balance: f64) -> LedgerState {
        LedgerState {
            balance: Some(balance),
            transactions: Vec::new(),
        }
    }

    #[test]
    fn apply_requires_initialized_balance() {
        let mut state = LedgerState::new();
        let err = TransactionService::apply(&mut state, TransactionDraft::credit(5.0), day(1))
            .expect_err("unset balance");
        assert!(matches!(err, CoreError::BalanceNotInitialized));
        assert!(state.transactions.is_empty());
    }

    #[test]
    fn apply_defaults_date_and_appends() {
        let mut state = initialized(10.0);
        let first = TransactionService::apply(&mut state, TransactionDraft::debit(4.0), day(9))
            .unwrap();
        let second = TransactionService::apply(
            &mut state,
            TransactionDraft::credit(1.0).date(day(1)),
            day(9),
        )
        .unwrap();
        assert_eq!(state.transactions[0].id, first);
        assert_eq!(state.transactions[0].date, day(9));
        assert_eq!(state.transactions[1].id, second);
        assert_eq!(state.balance, Some(7.0));
    }

    #[test]
    fn apply_rejects_missing_amount() {
        let mut state = initialized(10.0);
        let draft = TransactionDraft::new(TransactionKind::Credit);
        let err = TransactionService::apply(&mut state, draft, day(1)).expect_err("no amount");
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(state, initialized(10.0));
    }

    #[test]
    fn edit_flipping_kind_recomputes_balance() {
        let mut state = initialized(100.0);
        let id = TransactionService::apply(&mut state, TransactionDraft::credit(30.0), day(1))
            .unwrap();
        assert_eq!(state.balance, Some(130.0));

        TransactionService::edit(&mut state, id, TransactionDraft::debit(30.0).date(day(1)))
            .unwrap();
        assert_eq!(state.balance, Some(70.0));
    }

    #[test]
    fn edit_without_date_is_rejected_untouched() {
        let mut state = initialized(100.0);
        let id = TransactionService::apply(&mut state, TransactionDraft::credit(30.0), day(1))
            .unwrap();
        let before = state.clone();
        let err = TransactionService::edit(&mut state, id, TransactionDraft::credit(40.0))
            .expect_err("missing date");
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_unknown_id_is_not_found() {
        let mut state = initialized(100.0);
        let missing = Uuid::new_v4();
        let err = TransactionService::delete(&mut state, missing).expect_err("unknown id");
        assert!(matches!(err, CoreError::TransactionNotFound(id) if id == missing));
        assert_eq!(state.balance, Some(100.0));
    }

    #[test]
    fn delete_debit_adds_amount_back() {
        let mut state = initialized(100.0);
        let id = TransactionService::apply(&mut state, TransactionDraft::debit(25.0), day(2))
            .unwrap();
        let removed = TransactionService::delete(&mut state, id).unwrap();
        assert_eq!(removed.amount, 25.0);
        assert_eq!(state.balance, Some(100.0));
        assert!(TransactionService::list(&state).is_empty());
    }
}
