use tally_core::input::parse_date;
use tally_domain::{KindFilter, TransactionFilter};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

const USAGE: &str = "filter [type <all|credit|debit> | date <YYYY-MM-DD|clear> | clear]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "filter",
        "Show or change the list filter",
        USAGE,
        cmd_filter,
    )]
}

fn cmd_filter(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::info(format!("Active filter: {}", context.filter));
            return Ok(());
        }
        [action] if action.eq_ignore_ascii_case("clear") => {
            context.filter = TransactionFilter::all();
        }
        [action, value] if action.eq_ignore_ascii_case("type") => {
            let kind: KindFilter = value
                .parse()
                .map_err(|err| CommandError::InvalidArguments(format!("{err}")))?;
            context.filter = context.filter.with_kind(kind);
        }
        [action, value] if action.eq_ignore_ascii_case("date") => {
            if value.eq_ignore_ascii_case("clear") {
                context.filter.date = None;
            } else {
                context.filter = context.filter.on_date(parse_date(value)?);
            }
        }
        _ => return Err(CommandError::InvalidArguments(format!("usage: {USAGE}"))),
    }
    tracing::debug!(filter = %context.filter, "filter changed");
    output::success(format!("Filter set to {}.", context.filter));
    Ok(())
}
