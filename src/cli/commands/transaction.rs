use tally_core::{input::parse_amount, SummaryService};
use tally_domain::{short_id, Totals, Transaction, TransactionDraft, TransactionKind};

use crate::cli::commands::{CommandDefinition, TransactionArgs};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, format_date, format_signed};
use crate::cli::output;
use crate::cli::table::{Table, TableColumn};

const CREDIT_USAGE: &str = "credit <amount> [--person P] [--category C] [--date YYYY-MM-DD]";
const DEBIT_USAGE: &str = "debit <amount> [--person P] [--category C] [--date YYYY-MM-DD]";
const EDIT_USAGE: &str =
    "edit <id> <credit|debit> <amount> --date YYYY-MM-DD [--person P] [--category C]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("credit", "Record money coming in", CREDIT_USAGE, cmd_credit),
        CommandDefinition::new("debit", "Record money going out", DEBIT_USAGE, cmd_debit),
        CommandDefinition::new(
            "edit",
            "Replace every field of a transaction",
            EDIT_USAGE,
            cmd_edit,
        ),
        CommandDefinition::new("delete", "Remove a transaction", "delete <id>", cmd_delete),
        CommandDefinition::new(
            "list",
            "List transactions matching the active filter",
            "list",
            cmd_list,
        ),
        CommandDefinition::new("show", "Show one transaction", "show <id>", cmd_show),
    ]
}

fn cmd_credit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record(context, TransactionKind::Credit, args, CREDIT_USAGE)
}

fn cmd_debit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record(context, TransactionKind::Debit, args, DEBIT_USAGE)
}

fn record(
    context: &mut ShellContext,
    kind: TransactionKind,
    args: &[&str],
    usage: &str,
) -> CommandResult {
    let parsed = TransactionArgs::parse(args)?;
    let [raw_amount] = parsed.positionals.as_slice() else {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    };
    let amount = parse_amount(raw_amount)?;
    let applied = context.session.apply(build_draft(kind, amount, &parsed))?;
    let id = context.settle(applied);
    let balance = context.session.balance().unwrap_or_default();
    output::success(format!(
        "{} of {} recorded ({}). Balance: {}",
        kind,
        format_amount(context.currency(), amount),
        short_id(id),
        format_amount(context.currency(), balance)
    ));
    Ok(())
}

fn build_draft(kind: TransactionKind, amount: f64, parsed: &TransactionArgs<'_>) -> TransactionDraft {
    let mut draft = TransactionDraft::new(kind).amount(amount);
    if let Some(person) = &parsed.person {
        draft = draft.person(person.clone());
    }
    if let Some(category) = &parsed.category {
        draft = draft.category(category.clone());
    }
    if let Some(date) = parsed.date {
        draft = draft.date(date);
    }
    draft
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = TransactionArgs::parse(args)?;
    let [needle, raw_kind, raw_amount] = parsed.positionals.as_slice() else {
        return Err(CommandError::InvalidArguments(format!("usage: {EDIT_USAGE}")));
    };
    let kind: TransactionKind = raw_kind
        .parse()
        .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
    let amount = parse_amount(raw_amount)?;
    let id = context.resolve_transaction(needle)?;

    let applied = context
        .session
        .edit(id, build_draft(kind, amount, &parsed))?;
    context.settle(applied);
    output::success(format!(
        "Transaction {} updated. Balance: {}",
        short_id(id),
        format_amount(
            context.currency(),
            context.session.balance().unwrap_or_default()
        )
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(CommandError::InvalidArguments("usage: delete <id>".into()));
    };
    let id = context.resolve_transaction(needle)?;
    let summary = describe(context, context.transaction(id)?);
    if !context.confirm(&format!("Delete {summary}?"), false)? {
        output::info("Nothing deleted.");
        return Ok(());
    }
    let applied = context.session.delete(id)?;
    let removed = context.settle(applied);
    output::success(format!(
        "Deleted {}. Balance: {}",
        short_id(removed.id),
        format_amount(
            context.currency(),
            context.session.balance().unwrap_or_default()
        )
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let total = context.session.state().transaction_count();
    let mut view = context.session.filtered_view(&context.filter);
    if context.config.newest_first {
        view = SummaryService::newest_first(view);
    }
    let symbol = context.currency();

    if view.is_empty() {
        if total == 0 {
            output::info("No transactions recorded yet.");
        } else {
            output::info(format!("No transactions match {}.", context.filter));
        }
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::right("Amount"),
        TableColumn::left("Person").max_width(20),
        TableColumn::left("Category").max_width(20),
    ]);
    for txn in &view {
        table.push_row(vec![
            short_id(txn.id),
            format_date(txn.date),
            txn.kind.to_string(),
            format_signed(symbol, txn.kind, txn.amount),
            txn.person.clone().unwrap_or_default(),
            txn.category.clone().unwrap_or_default(),
        ]);
    }
    output::info(table.render());

    let totals = Totals::from_transactions(view.iter().copied());
    output::info(format!(
        "Showing {} of {} | credits {} | debits {}",
        view.len(),
        total,
        format_amount(symbol, totals.total_credit),
        format_amount(symbol, totals.total_debit)
    ));
    if !context.filter.is_unrestricted() {
        output::hint(format!("Active filter: {}", context.filter));
    }
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [needle] = args else {
        return Err(CommandError::InvalidArguments("usage: show <id>".into()));
    };
    let id = context.resolve_transaction(needle)?;
    let txn = context.transaction(id)?;
    let symbol = context.currency();
    output::section(format!("Transaction {}", short_id(txn.id)));
    output::info(format!("  ID       : {}", txn.id));
    output::info(format!("  Date     : {}", format_date(txn.date)));
    output::info(format!("  Type     : {}", txn.kind));
    output::info(format!("  Amount   : {}", format_amount(symbol, txn.amount)));
    output::info(format!(
        "  Person   : {}",
        txn.person.as_deref().unwrap_or("-")
    ));
    output::info(format!(
        "  Category : {}",
        txn.category.as_deref().unwrap_or("-")
    ));
    Ok(())
}

fn describe(context: &ShellContext, txn: &Transaction) -> String {
    let mut text = format!(
        "{} {} on {}",
        txn.kind,
        format_amount(context.currency(), txn.amount),
        format_date(txn.date)
    );
    if let Some(person) = &txn.person {
        text.push_str(&format!(" ({person})"));
    }
    text
}
