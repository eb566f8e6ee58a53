use tally_domain::{LedgerState, Reconciliation, Totals, Transaction, TransactionFilter};

/// Read-only derived views over ledger transactions.
pub struct SummaryService;

impl SummaryService {
    /// Transactions matching `filter`, in storage order.
    pub fn filtered_view<'a>(
        transactions: &'a [Transaction],
        filter: &TransactionFilter,
    ) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect()
    }

    /// Presentation order for a materialized view: most recent entry first.
    pub fn newest_first(mut view: Vec<&Transaction>) -> Vec<&Transaction> {
        view.reverse();
        view
    }

    pub fn totals(transactions: &[Transaction]) -> Totals {
        Totals::from_transactions(transactions)
    }

    pub fn reconcile(state: &LedgerState) -> Option<Reconciliation> {
        state.reconciliation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tally_domain::{KindFilter, TransactionKind};

    fn sample() -> Vec<Transaction> {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        vec![
            Transaction::new(TransactionKind::Credit, 200.0, jan1).with_person("Alice"),
            Transaction::new(TransactionKind::Debit, 150.0, jan2).with_person("Bob"),
            Transaction::new(TransactionKind::Debit, 20.0, jan1).with_person("Carol"),
        ]
    }

    #[test]
    fn unrestricted_filter_returns_everything_in_order() {
        let txns = sample();
        let view = SummaryService::filtered_view(&txns, &TransactionFilter::all());
        let ids: Vec<_> = view.iter().map(|txn| txn.id).collect();
        let expected: Vec<_> = txns.iter().map(|txn| txn.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn kind_and_date_filters_compose() {
        let txns = sample();
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let filter = TransactionFilter::all()
            .with_kind(KindFilter::Debit)
            .on_date(jan1);
        let view = SummaryService::filtered_view(&txns, &filter);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].person.as_deref(), Some("Carol"));
    }

    #[test]
    fn newest_first_reverses_view_only() {
        let txns = sample();
        let view = SummaryService::filtered_view(&txns, &TransactionFilter::all());
        let ordered = SummaryService::newest_first(view);
        assert_eq!(ordered[0].person.as_deref(), Some("Carol"));
        assert_eq!(txns[0].person.as_deref(), Some("Alice"));
    }
}
