//! Mapping between [`LedgerState`] and the persisted `balance` / `transactions` keys.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use tally_domain::{normalize_text, short_id, LedgerState, Transaction, TransactionKind};

use crate::{
    input::DATE_FORMAT,
    store::{PersistedStore, BALANCE_KEY, TRANSACTIONS_KEY},
    CoreError,
};

/// Date layout written by older snapshots (`M/D/YYYY`). Day-first input
/// cannot be told apart when both parts are 12 or less; those get a warning.
const LEGACY_DATE_FORMAT: &str = "%m/%d/%Y";

/// Outcome of reading a snapshot, including any repairs made on the way in.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub state: LedgerState,
    pub warnings: Vec<String>,
    /// Set when ids or dates were rewritten and the store should be updated.
    pub repaired: bool,
}

/// Serialized form accepted on load; more lenient than [`Transaction`].
#[derive(Debug, Deserialize)]
struct StoredTransaction {
    #[serde(default)]
    id: Option<Uuid>,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: StoredAmount,
    #[serde(default)]
    person: Option<String>,
    #[serde(default, alias = "description")]
    category: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredAmount {
    Number(f64),
    Text(String),
}

/// Reads the ledger snapshot. Absent keys yield an uninitialized, empty state.
///
/// `today` stands in for transactions stored without a usable date.
pub fn load(store: &dyn PersistedStore, today: NaiveDate) -> Result<LoadReport, CoreError> {
    let balance = match store.get(BALANCE_KEY)? {
        Some(raw) => serde_json::from_str::<Option<f64>>(&raw)?,
        None => None,
    };
    let stored: Vec<StoredTransaction> = match store.get(TRANSACTIONS_KEY)? {
        Some(raw) => serde_json::from_str::<Option<Vec<StoredTransaction>>>(&raw)?
            .unwrap_or_default(),
        None => Vec::new(),
    };

    let mut warnings = Vec::new();
    let mut repaired = false;
    let mut seen = HashSet::new();
    let mut transactions = Vec::with_capacity(stored.len());
    for (index, record) in stored.into_iter().enumerate() {
        let txn = repair(index, record, today, &mut seen, &mut warnings, &mut repaired)?;
        transactions.push(txn);
    }

    if balance.is_none() && !transactions.is_empty() {
        warnings.push(format!(
            "{} transaction(s) stored without a balance; set an initial balance to continue",
            transactions.len()
        ));
    }
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(LoadReport {
        state: LedgerState {
            balance,
            transactions,
        },
        warnings,
        repaired,
    })
}

/// Writes both snapshot keys. The balance key is skipped while unset.
pub fn save(store: &dyn PersistedStore, state: &LedgerState) -> Result<(), CoreError> {
    let transactions = serde_json::to_string(&state.transactions)?;
    store.set(TRANSACTIONS_KEY, &transactions)?;
    if let Some(balance) = state.balance {
        store.set(BALANCE_KEY, &serde_json::to_string(&balance)?)?;
    }
    Ok(())
}

fn repair(
    index: usize,
    record: StoredTransaction,
    today: NaiveDate,
    seen: &mut HashSet<Uuid>,
    warnings: &mut Vec<String>,
    repaired: &mut bool,
) -> Result<Transaction, CoreError> {
    let position = index + 1;
    let id = match record.id {
        Some(id) if seen.contains(&id) => {
            let fresh = Uuid::new_v4();
            warnings.push(format!(
                "transaction #{position} duplicates id {}; assigned {}",
                short_id(id),
                short_id(fresh)
            ));
            fresh
        }
        Some(id) => id,
        None => {
            let fresh = Uuid::new_v4();
            warnings.push(format!(
                "transaction #{position} had no id; assigned {}",
                short_id(fresh)
            ));
            fresh
        }
    };
    if record.id != Some(id) {
        *repaired = true;
    }
    seen.insert(id);

    let amount = match record.amount {
        StoredAmount::Number(value) => value,
        StoredAmount::Text(text) => {
            *repaired = true;
            text.trim().parse::<f64>().map_err(|_| {
                CoreError::Serde(format!(
                    "transaction #{position} has non-numeric amount `{text}`"
                ))
            })?
        }
    };
    if !amount.is_finite() {
        return Err(CoreError::Serde(format!(
            "transaction #{position} has non-finite amount {amount}"
        )));
    }
    if amount <= 0.0 {
        warnings.push(format!(
            "transaction {} has non-positive amount {amount}",
            short_id(id)
        ));
    }

    let date = match record.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                date
            } else if let Ok(date) = NaiveDate::parse_from_str(raw, LEGACY_DATE_FORMAT) {
                *repaired = true;
                if day_month_ambiguous(raw) {
                    warnings.push(format!(
                        "transaction {} date `{raw}` converted to {date}; ambiguous, read as month/day",
                        short_id(id)
                    ));
                } else {
                    warnings.push(format!(
                        "transaction {} date `{raw}` converted to {date}",
                        short_id(id)
                    ));
                }
                date
            } else {
                *repaired = true;
                warnings.push(format!(
                    "transaction {} has unreadable date `{raw}`; using {today}",
                    short_id(id)
                ));
                today
            }
        }
        _ => {
            *repaired = true;
            warnings.push(format!(
                "transaction {} had no date; using {today}",
                short_id(id)
            ));
            today
        }
    };

    Ok(Transaction {
        id,
        kind: record.kind,
        amount,
        person: normalize_text(record.person),
        category: normalize_text(record.category),
        date,
    })
}

/// True for `a/b/YYYY` where either order yields a different valid day and month.
fn day_month_ambiguous(raw: &str) -> bool {
    let mut parts = raw.split('/').map(|part| part.trim().parse::<u32>());
    match (parts.next(), parts.next()) {
        (Some(Ok(first)), Some(Ok(second))) => {
            first != second && (1..=12).contains(&first) && (1..=12).contains(&second)
        }
        _ => false,
    }
}
