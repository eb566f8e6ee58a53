use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::transaction::{ParseKindError, Transaction, TransactionKind};

/// Kind restriction applied by a [`TransactionFilter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindFilter {
    #[default]
    All,
    Credit,
    Debit,
}

impl KindFilter {
    pub fn matches(self, kind: TransactionKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Credit => kind == TransactionKind::Credit,
            KindFilter::Debit => kind == TransactionKind::Debit,
        }
    }
}

impl From<TransactionKind> for KindFilter {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Credit => KindFilter::Credit,
            TransactionKind::Debit => KindFilter::Debit,
        }
    }
}

impl FromStr for KindFilter {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(KindFilter::All);
        }
        value.parse::<TransactionKind>().map(KindFilter::from)
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KindFilter::All => "all",
            KindFilter::Credit => "credit",
            KindFilter::Debit => "debit",
        };
        f.write_str(label)
    }
}

/// Conjunctive view filter: kind AND exact date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub kind: KindFilter,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: KindFilter) -> Self {
        self.kind = kind;
        self
    }

    pub fn on_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.kind == KindFilter::All && self.date.is_none()
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.kind.matches(transaction.kind)
            && self.date.map_or(true, |date| transaction.date == date)
    }
}

impl fmt::Display for TransactionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => write!(f, "type={} date={}", self.kind, date),
            None => write!(f, "type={} date=any", self.kind),
        }
    }
}
