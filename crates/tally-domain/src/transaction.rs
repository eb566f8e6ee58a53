//! Domain models for ledger transactions.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Direction of a transaction relative to the running balance.
pub enum TransactionKind {
    /// Inbound money; increases the balance.
    Credit,
    /// Outbound money; decreases the balance.
    Debit,
}

impl TransactionKind {
    /// Signed contribution of `amount` to the running balance.
    ///
    /// This is the one place the balance rule lives: every ledger operation
    /// derives its delta from here, either directly or by negation.
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            TransactionKind::Credit => amount,
            TransactionKind::Debit => -amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseKindError(pub String);

impl fmt::Display for ParseKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown transaction type `{}` (expected credit or debit)",
            self.0
        )
    }
}

impl std::error::Error for ParseKindError {}

impl FromStr for TransactionKind {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            _ => Err(ParseKindError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub date: NaiveDate,
}

impl Transaction {
    pub fn new(kind: TransactionKind, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            person: None,
            category: None,
            date,
        }
    }

    pub fn with_person(mut self, person: impl Into<String>) -> Self {
        self.person = normalize_text(Some(person.into()));
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = normalize_text(Some(category.into()));
        self
    }

    /// Amount with the sign implied by [`TransactionKind`].
    pub fn signed_amount(&self) -> f64 {
        self.kind.signed(self.amount)
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        let counterparty = self.person.as_deref().unwrap_or(match self.kind {
            TransactionKind::Credit => "Credit",
            TransactionKind::Debit => "Debit",
        });
        format!("{} {} {} [{}]", self.date, counterparty, self.amount, short_id(self.id))
    }
}

/// Caller-supplied fields for creating or replacing a transaction.
///
/// Nothing here is validated; the ledger services decide what is required.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: Option<f64>,
    pub person: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            amount: None,
            person: None,
            category: None,
            date: None,
        }
    }

    pub fn credit(amount: f64) -> Self {
        Self::new(TransactionKind::Credit).amount(amount)
    }

    pub fn debit(amount: f64) -> Self {
        Self::new(TransactionKind::Debit).amount(amount)
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn person(mut self, person: impl Into<String>) -> Self {
        self.person = Some(person.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}
