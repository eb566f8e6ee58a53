use chrono::NaiveDate;

use crate::{
    ledger_service::LedgerService, summary_service::SummaryService,
    transaction_service::TransactionService, CoreError,
};
use tally_domain::{
    KindFilter, LedgerState, Totals, TransactionDraft, TransactionFilter, TransactionKind,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn opened(balance: f64) -> LedgerState {
    let mut state = LedgerState::new();
    LedgerService::initialize(&mut state, balance).expect("initialize");
    state
}

#[test]
fn credit_and_debit_scenario_reaches_expected_balance() {
    let mut state = opened(1000.0);
    TransactionService::apply(
        &mut state,
        TransactionDraft::credit(200.0).person("Alice").date(day(1)),
        day(5),
    )
    .expect("credit");
    TransactionService::apply(
        &mut state,
        TransactionDraft::debit(150.0).person("Bob").date(day(2)),
        day(5),
    )
    .expect("debit");

    assert_eq!(state.balance, Some(1050.0));

    let debits = SummaryService::filtered_view(
        &state.transactions,
        &TransactionFilter::all().with_kind(KindFilter::Debit),
    );
    let people: Vec<_> = debits.iter().filter_map(|txn| txn.person.as_deref()).collect();
    assert_eq!(people, ["Bob"]);

    assert_eq!(
        SummaryService::totals(&state.transactions),
        Totals {
            total_credit: 200.0,
            total_debit: 150.0,
        }
    );
}

#[test]
fn unrestricted_view_equals_full_list() {
    let mut state = opened(10.0);
    for amount in [1.0, 2.0, 3.0] {
        TransactionService::apply(&mut state, TransactionDraft::debit(amount), day(1))
            .expect("apply");
    }
    let view = SummaryService::filtered_view(&state.transactions, &TransactionFilter::all());
    let listed = TransactionService::list(&state);
    assert_eq!(view, listed);
}

#[test]
fn filtering_twice_is_idempotent() {
    let mut state = opened(10.0);
    TransactionService::apply(&mut state, TransactionDraft::credit(4.0).date(day(3)), day(1))
        .expect("apply");
    TransactionService::apply(&mut state, TransactionDraft::debit(2.0).date(day(4)), day(1))
        .expect("apply");
    let filter = TransactionFilter::all().with_kind(KindFilter::Credit);

    let once: Vec<_> = SummaryService::filtered_view(&state.transactions, &filter)
        .into_iter()
        .cloned()
        .collect();
    let twice = SummaryService::filtered_view(&once, &filter);
    assert_eq!(twice.len(), once.len());
}

#[test]
fn full_edit_is_visible_on_lookup() {
    let mut state = opened(500.0);
    let id = TransactionService::apply(&mut state, TransactionDraft::credit(20.0), day(1))
        .expect("apply");

    TransactionService::edit(
        &mut state,
        id,
        TransactionDraft::debit(35.0)
            .person("Dana")
            .category("Groceries")
            .date(day(7)),
    )
    .expect("edit");

    let txn = state.transaction(id).expect("still present");
    assert_eq!(txn.kind, TransactionKind::Debit);
    assert_eq!(txn.amount, 35.0);
    assert_eq!(txn.person.as_deref(), Some("Dana"));
    assert_eq!(txn.category.as_deref(), Some("Groceries"));
    assert_eq!(txn.date, day(7));
    assert_eq!(state.balance, Some(465.0));
}

#[test]
fn delete_restores_pre_apply_balance() {
    let mut state = opened(120.25);
    let id = TransactionService::apply(&mut state, TransactionDraft::credit(500.0), day(1))
        .expect("apply");
    TransactionService::delete(&mut state, id).expect("delete");
    assert_eq!(state.balance, Some(120.25));
}

#[test]
fn zero_and_negative_amounts_are_rejected() {
    let mut state = opened(50.0);
    let before = state.clone();
    for amount in [0.0, -5.0] {
        let err = TransactionService::apply(&mut state, TransactionDraft::debit(amount), day(1))
            .expect_err("must reject");
        assert!(matches!(err, CoreError::Validation(_)));
    }
    assert_eq!(state, before);
}

#[test]
fn identical_looking_transactions_are_independent() {
    let mut state = opened(100.0);
    let first = TransactionService::apply(&mut state, TransactionDraft::debit(10.0), day(2))
        .expect("first");
    let second = TransactionService::apply(&mut state, TransactionDraft::debit(10.0), day(2))
        .expect("second");
    assert_ne!(first, second);

    TransactionService::edit(&mut state, second, TransactionDraft::debit(15.0).date(day(2)))
        .expect("edit second");
    assert_eq!(state.transaction(first).map(|txn| txn.amount), Some(10.0));

    TransactionService::delete(&mut state, first).expect("delete first");
    assert!(!state.contains(first));
    assert_eq!(state.transaction(second).map(|txn| txn.amount), Some(15.0));
    assert_eq!(state.balance, Some(85.0));
}

#[test]
fn reset_then_edit_keeps_new_baseline() {
    let mut state = opened(1000.0);
    let id = TransactionService::apply(&mut state, TransactionDraft::credit(100.0), day(1))
        .expect("apply");
    LedgerService::reset_balance(&mut state, 2000.0).expect("reset");
    assert_eq!(state.baseline(), Some(1900.0));

    TransactionService::edit(&mut state, id, TransactionDraft::credit(50.0).date(day(1)))
        .expect("edit");
    assert_eq!(state.balance, Some(1950.0));
}
