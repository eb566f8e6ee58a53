//! The single owner of ledger state for a running program.

use chrono::NaiveDate;
use uuid::Uuid;

use tally_domain::{
    LedgerState, Reconciliation, Totals, Transaction, TransactionDraft, TransactionFilter,
};

use crate::{
    ledger_service::LedgerService,
    snapshot,
    store::{MemoryStore, PersistedStore},
    summary_service::SummaryService,
    time::Clock,
    transaction_service::TransactionService,
    CoreError,
};

/// Result of a mutation that succeeded in memory.
///
/// `persist_error` is set when the write-through save failed afterwards; the
/// in-memory state still reflects the mutation.
#[derive(Debug)]
#[must_use]
pub struct Applied<T> {
    pub value: T,
    pub persist_error: Option<CoreError>,
}

impl<T> Applied<T> {
    pub fn is_persisted(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Collapses the outcome, turning a failed save into an error.
    pub fn into_result(self) -> Result<T, CoreError> {
        match self.persist_error {
            Some(err) => Err(err),
            None => Ok(self.value),
        }
    }
}

/// Owns the authoritative [`LedgerState`] and writes it through to a store.
pub struct LedgerSession {
    state: LedgerState,
    store: Box<dyn PersistedStore>,
    clock: Box<dyn Clock>,
    dirty: bool,
    load_warnings: Vec<String>,
}

impl std::fmt::Debug for LedgerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerSession")
            .field("state", &self.state)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl LedgerSession {
    /// Reads the snapshot from `store` once. Later reads are served from memory.
    ///
    /// A snapshot that needed repairs (minted ids, converted dates) is written
    /// back immediately so identifiers stay stable across restarts. If that
    /// write fails the session opens dirty and the failure joins the load
    /// warnings.
    pub fn open(store: Box<dyn PersistedStore>, clock: Box<dyn Clock>) -> Result<Self, CoreError> {
        let report = snapshot::load(store.as_ref(), clock.today())?;
        tracing::info!(
            initialized = report.state.is_initialized(),
            transactions = report.state.transaction_count(),
            warnings = report.warnings.len(),
            repaired = report.repaired,
            "ledger session opened"
        );
        let mut session = Self {
            state: report.state,
            store,
            clock,
            dirty: false,
            load_warnings: report.warnings,
        };
        if report.repaired {
            if let Some(err) = session.persisted(()).persist_error {
                session
                    .load_warnings
                    .push(format!("repaired ledger could not be saved: {err}"));
            }
        }
        Ok(session)
    }

    /// Session backed by a fresh [`MemoryStore`].
    pub fn in_memory(clock: Box<dyn Clock>) -> Self {
        Self {
            state: LedgerState::new(),
            store: Box::new(MemoryStore::new()),
            clock,
            dirty: false,
            load_warnings: Vec::new(),
        }
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn balance(&self) -> Option<f64> {
        self.state.balance
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Repairs and anomalies reported while loading the snapshot.
    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    /// True when the last save failed and memory is ahead of the store.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn initialize(&mut self, amount: f64) -> Result<Applied<()>, CoreError> {
        LedgerService::initialize(&mut self.state, amount)?;
        Ok(self.persisted(()))
    }

    pub fn reset_balance(&mut self, amount: f64) -> Result<Applied<()>, CoreError> {
        LedgerService::reset_balance(&mut self.state, amount)?;
        Ok(self.persisted(()))
    }

    pub fn apply(&mut self, draft: TransactionDraft) -> Result<Applied<Uuid>, CoreError> {
        let today = self.clock.today();
        let id = TransactionService::apply(&mut self.state, draft, today)?;
        Ok(self.persisted(id))
    }

    pub fn edit(&mut self, id: Uuid, draft: TransactionDraft) -> Result<Applied<()>, CoreError> {
        TransactionService::edit(&mut self.state, id, draft)?;
        Ok(self.persisted(()))
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Applied<Transaction>, CoreError> {
        let removed = TransactionService::delete(&mut self.state, id)?;
        Ok(self.persisted(removed))
    }

    pub fn filtered_view(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        SummaryService::filtered_view(&self.state.transactions, filter)
    }

    pub fn totals(&self) -> Totals {
        SummaryService::totals(&self.state.transactions)
    }

    pub fn reconciliation(&self) -> Option<Reconciliation> {
        SummaryService::reconcile(&self.state)
    }

    /// Resolves a full id or a unique prefix of its hex form.
    ///
    /// Hyphens are ignored and matching is case-insensitive.
    pub fn resolve_id(&self, needle: &str) -> Result<Uuid, CoreError> {
        let needle: String = needle
            .trim()
            .chars()
            .filter(|c| *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        if needle.is_empty() {
            return Err(CoreError::validation("transaction id is required"));
        }
        let mut matches = self
            .state
            .transactions
            .iter()
            .map(|txn| txn.id)
            .filter(|id| id.simple().to_string().starts_with(&needle));
        match (matches.next(), matches.next()) {
            (Some(id), None) => Ok(id),
            (None, _) => match Uuid::try_parse(&needle) {
                Ok(id) => Err(CoreError::TransactionNotFound(id)),
                Err(_) => Err(CoreError::validation(format!(
                    "no transaction matches id `{needle}`"
                ))),
            },
            (Some(_), Some(_)) => Err(CoreError::validation(format!(
                "id `{needle}` is ambiguous; type more characters"
            ))),
        }
    }

    /// Retries persistence of a dirty session. A clean session is a no-op.
    pub fn flush(&mut self) -> Result<(), CoreError> {
        if !self.dirty {
            return Ok(());
        }
        snapshot::save(self.store.as_ref(), &self.state)?;
        self.dirty = false;
        tracing::info!("pending ledger changes saved");
        Ok(())
    }

    fn persisted<T>(&mut self, value: T) -> Applied<T> {
        match snapshot::save(self.store.as_ref(), &self.state) {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!("ledger snapshot saved");
                Applied {
                    value,
                    persist_error: None,
                }
            }
            Err(err) => {
                self.dirty = true;
                tracing::warn!(error = %err, "failed to persist ledger; keeping changes in memory");
                Applied {
                    value,
                    persist_error: Some(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };

    use super::*;
    use crate::{
        store::{StoreError, BALANCE_KEY},
        time::FixedClock,
    };

    fn clock() -> Box<dyn Clock> {
        Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()))
    }

    /// Delegates to an inner store, failing writes while `broken` is set.
    struct FlakyStore {
        inner: Arc<MemoryStore>,
        broken: Arc<AtomicBool>,
    }

    impl PersistedStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk full".into()));
            }
            self.inner.set(key, value)
        }
    }

    #[test]
    fn mutations_write_through() {
        let inner = Arc::new(MemoryStore::new());
        let store = FlakyStore {
            inner: Arc::clone(&inner),
            broken: Arc::new(AtomicBool::new(false)),
        };
        let mut session = LedgerSession::open(Box::new(store), clock()).unwrap();
        assert!(session.initialize(250.0).unwrap().is_persisted());
        assert_eq!(inner.get(BALANCE_KEY).unwrap().as_deref(), Some("250.0"));

        let id = session
            .apply(TransactionDraft::debit(50.0))
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(session.state().transaction(id).unwrap().date, session.today());
        assert_eq!(inner.get(BALANCE_KEY).unwrap().as_deref(), Some("200.0"));
    }

    #[test]
    fn failed_save_keeps_mutation_and_marks_dirty() {
        let inner = Arc::new(MemoryStore::new());
        let broken = Arc::new(AtomicBool::new(false));
        let store = FlakyStore {
            inner: Arc::clone(&inner),
            broken: Arc::clone(&broken),
        };
        let mut session = LedgerSession::open(Box::new(store), clock()).unwrap();
        session.initialize(100.0).unwrap().into_result().unwrap();

        broken.store(true, Ordering::SeqCst);
        let outcome = session.apply(TransactionDraft::credit(40.0)).unwrap();
        assert!(matches!(outcome.persist_error, Some(CoreError::Persistence(_))));
        assert_eq!(session.balance(), Some(140.0));
        assert!(session.is_dirty());
        assert!(session.flush().is_err());

        broken.store(false, Ordering::SeqCst);
        session.flush().unwrap();
        assert!(!session.is_dirty());
        assert_eq!(inner.get(BALANCE_KEY).unwrap().as_deref(), Some("140.0"));
    }

    #[test]
    fn rejected_mutation_does_not_touch_store() {
        let mut session = LedgerSession::in_memory(clock());
        let err = session
            .apply(TransactionDraft::credit(10.0))
            .expect_err("uninitialized");
        assert!(err.is_rejection());
        assert!(!session.is_dirty());
    }

    #[test]
    fn resolve_id_accepts_unique_prefix() {
        let mut session = LedgerSession::in_memory(clock());
        session.initialize(10.0).unwrap().into_result().unwrap();
        let id = session
            .apply(TransactionDraft::credit(1.0))
            .unwrap()
            .into_result()
            .unwrap();
        let hex = id.simple().to_string();

        assert_eq!(session.resolve_id(&hex[..8]).unwrap(), id);
        assert_eq!(session.resolve_id(&id.to_string().to_uppercase()).unwrap(), id);
        assert!(session.resolve_id("").is_err());
        assert!(matches!(
            session.resolve_id("zzzz"),
            Err(CoreError::Validation(_))
        ));

        let absent = Uuid::new_v4();
        assert!(matches!(
            session.resolve_id(&absent.to_string()),
            Err(CoreError::TransactionNotFound(missing)) if missing == absent
        ));
    }

    #[test]
    fn repaired_ids_survive_reopen() {
        let inner = Arc::new(MemoryStore::with_entries([
            (BALANCE_KEY, "100"),
            (
                crate::store::TRANSACTIONS_KEY,
                r#"[{"type":"credit","amount":5,"date":"2/3/2024"}]"#,
            ),
        ]));
        let reopen = || {
            let store = FlakyStore {
                inner: Arc::clone(&inner),
                broken: Arc::new(AtomicBool::new(false)),
            };
            LedgerSession::open(Box::new(store), clock()).unwrap()
        };

        let first = reopen();
        assert!(!first.is_dirty());
        let id = first.state().transactions[0].id;
        let prefix = id.simple().to_string()[..8].to_string();

        let second = reopen();
        assert!(second.load_warnings().is_empty());
        assert_eq!(second.resolve_id(&prefix).unwrap(), id);
        assert_eq!(
            second.state().transactions[0].date,
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
    }

    #[test]
    fn failed_repair_save_opens_dirty() {
        let inner = Arc::new(MemoryStore::with_entries([(
            crate::store::TRANSACTIONS_KEY,
            r#"[{"type":"debit","amount":5,"date":"2024-01-01"}]"#,
        )]));
        let broken = Arc::new(AtomicBool::new(true));
        let store = FlakyStore {
            inner: Arc::clone(&inner),
            broken: Arc::clone(&broken),
        };
        let mut session = LedgerSession::open(Box::new(store), clock()).unwrap();
        assert!(session.is_dirty());
        assert!(session
            .load_warnings()
            .iter()
            .any(|w| w.contains("could not be saved")));

        broken.store(false, Ordering::SeqCst);
        session.flush().unwrap();
        let stored = inner.get(crate::store::TRANSACTIONS_KEY).unwrap().unwrap();
        assert!(stored.contains(&session.state().transactions[0].id.to_string()));
    }

    #[test]
    fn open_surfaces_load_warnings() {
        let store = MemoryStore::with_entries([(
            crate::store::TRANSACTIONS_KEY,
            r#"[{"type":"credit","amount":5,"date":"2/3/2024"}]"#,
        )]);
        let session = LedgerSession::open(Box::new(store), clock()).unwrap();
        assert!(!session.load_warnings().is_empty());
        assert!(!session.state().is_initialized());
    }
}
