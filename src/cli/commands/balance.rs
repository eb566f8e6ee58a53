use tally_core::input::parse_amount;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::format_amount;
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "init",
            "Set the opening balance",
            "init <amount>",
            cmd_init,
        ),
        CommandDefinition::new(
            "reset-balance",
            "Override the balance to match an outside statement",
            "reset-balance <amount>",
            cmd_reset_balance,
        ),
        CommandDefinition::new(
            "balance",
            "Show the balance and how it is derived",
            "balance",
            cmd_balance,
        ),
    ]
}

fn single_amount(args: &[&str], usage: &str) -> Result<f64, CommandError> {
    match args {
        [raw] => Ok(parse_amount(raw)?),
        _ => Err(CommandError::InvalidArguments(format!("usage: {usage}"))),
    }
}

fn cmd_init(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = single_amount(args, "init <amount>")?;
    if context.session.state().is_initialized()
        && !context.confirm("A balance is already set. Overwrite it?", false)?
    {
        output::info("Balance unchanged.");
        return Ok(());
    }
    let applied = context.session.initialize(amount)?;
    context.settle(applied);
    output::success(format!(
        "Balance set to {}.",
        format_amount(context.currency(), amount)
    ));
    Ok(())
}

fn cmd_reset_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = single_amount(args, "reset-balance <amount>")?;
    let Some(current) = context.session.balance() else {
        return Err(tally_core::CoreError::BalanceNotInitialized.into());
    };
    let prompt = format!(
        "Replace balance {} with {}? Transaction history is kept.",
        format_amount(context.currency(), current),
        format_amount(context.currency(), amount)
    );
    if !context.confirm(&prompt, false)? {
        output::info("Balance unchanged.");
        return Ok(());
    }
    let applied = context.session.reset_balance(amount)?;
    context.settle(applied);
    output::success(format!(
        "Balance reset to {}.",
        format_amount(context.currency(), amount)
    ));
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let Some(rec) = context.session.reconciliation() else {
        output::warning("No balance set yet.");
        output::hint("Set one with `init <amount>`.");
        return Ok(());
    };
    let totals = context.session.totals();
    let symbol = context.currency();
    output::section("Balance");
    output::info(format!("  Balance      : {}", format_amount(symbol, rec.balance)));
    output::info(format!("  Baseline     : {}", format_amount(symbol, rec.baseline)));
    output::info(format!(
        "  Credits      : {}",
        format_amount(symbol, totals.total_credit)
    ));
    output::info(format!(
        "  Debits       : {}",
        format_amount(symbol, totals.total_debit)
    ));
    output::info(format!("  Net          : {}", format_amount(symbol, rec.net)));
    output::info(format!(
        "  Transactions : {}",
        context.session.state().transaction_count()
    ));
    if context.session.is_dirty() {
        output::warning("Unsaved changes pending. Run `save` to retry.");
    }
    Ok(())
}
