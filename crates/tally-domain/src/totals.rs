use serde::{Deserialize, Serialize};

use crate::transaction::{Transaction, TransactionKind};

/// Per-kind sums over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub total_credit: f64,
    pub total_debit: f64,
}

impl Totals {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(Totals::default(), |mut totals, txn| {
                match txn.kind {
                    TransactionKind::Credit => totals.total_credit += txn.amount,
                    TransactionKind::Debit => totals.total_debit += txn.amount,
                }
                totals
            })
    }

    /// Credits minus debits.
    pub fn net(&self) -> f64 {
        self.total_credit - self.total_debit
    }
}
