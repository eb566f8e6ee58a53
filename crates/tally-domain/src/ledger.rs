use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{totals::Totals, transaction::Transaction};

/// In-memory ledger: the running balance plus transactions in entry order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerState {
    /// `None` until an initial balance has been set.
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Decomposition of the balance into its baseline and transaction history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub baseline: f64,
    pub net: f64,
    pub balance: f64,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.balance.is_some()
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.transactions.iter().position(|txn| txn.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.position(id).is_some()
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn totals(&self) -> Totals {
        Totals::from_transactions(&self.transactions)
    }

    /// Balance minus the net effect of every recorded transaction.
    ///
    /// Equals the opening balance until the balance is reset.
    pub fn baseline(&self) -> Option<f64> {
        self.balance.map(|balance| balance - self.totals().net())
    }

    pub fn reconciliation(&self) -> Option<Reconciliation> {
        let balance = self.balance?;
        let net = self.totals().net();
        Some(Reconciliation {
            baseline: balance - net,
            net,
            balance,
        })
    }
}
