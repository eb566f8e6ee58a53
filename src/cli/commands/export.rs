use std::path::PathBuf;

use tally_core::{CoreError, ExportError, ExportFormatter};

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "export",
        "Write all transactions to a dated CSV file",
        "export [dir]",
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => context.config.resolve_export_dir(),
        [dir] => PathBuf::from(dir),
        _ => return Err(CommandError::InvalidArguments("usage: export [dir]".into())),
    };
    let state = context.session.state();
    // Without a balance there is no previous-balance reference to write.
    let balance = match state.balance {
        Some(balance) => balance,
        None if state.transactions.is_empty() => return Err(ExportError::Empty.into()),
        None => return Err(CoreError::BalanceNotInitialized.into()),
    };
    let path = ExportFormatter::write_csv(&dir, context.session.today(), &state.transactions, balance)?;
    output::success(format!(
        "Exported {} transaction(s) to {}.",
        state.transaction_count(),
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tally_config::{Config, ConfigManager};
    use tally_core::{store::TRANSACTIONS_KEY, FixedClock, LedgerSession, MemoryStore};
    use tempfile::tempdir;

    use super::*;
    use crate::cli::core::CliMode;

    fn context_over(store: MemoryStore, dir: &std::path::Path) -> ShellContext {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap());
        let session = LedgerSession::open(Box::new(store), Box::new(clock)).expect("open");
        ShellContext::with_session(
            CliMode::Script,
            session,
            Config::default(),
            ConfigManager::new(dir.join("config.json")),
        )
    }

    #[test]
    fn export_requires_a_balance_when_transactions_exist() {
        let dir = tempdir().expect("tempdir");
        let store = MemoryStore::with_entries([(
            TRANSACTIONS_KEY,
            r#"[{"type":"debit","amount":40,"date":"2024-04-01"}]"#,
        )]);
        let mut ctx = context_over(store, dir.path());
        let out = dir.path().join("out");

        let err = cmd_export(&mut ctx, &[out.to_str().expect("utf-8 path")])
            .expect_err("no balance");
        assert!(matches!(
            err,
            CommandError::Core(CoreError::BalanceNotInitialized)
        ));
        assert!(!out.exists());
    }

    #[test]
    fn empty_ledger_reports_nothing_to_export() {
        let dir = tempdir().expect("tempdir");
        let mut ctx = context_over(MemoryStore::new(), dir.path());
        let out = dir.path().to_str().expect("utf-8 path").to_string();
        let err = cmd_export(&mut ctx, &[out.as_str()]).expect_err("empty");
        assert!(matches!(err, CommandError::Export(ExportError::Empty)));
    }

    #[test]
    fn export_writes_previous_balance_reference() {
        let dir = tempdir().expect("tempdir");
        let mut ctx = context_over(MemoryStore::new(), dir.path());
        ctx.session.initialize(100.0).expect("init").into_result().expect("persist");
        ctx.session
            .apply(tally_domain::TransactionDraft::debit(40.0))
            .expect("debit")
            .into_result()
            .expect("persist");

        let out = dir.path().to_str().expect("utf-8 path").to_string();
        cmd_export(&mut ctx, &[out.as_str()]).expect("export");
        let csv = std::fs::read_to_string(dir.path().join("transactions_2024-04-02.csv"))
            .expect("csv written");
        assert!(csv.contains("2024-04-02,debit,40,N/A,N/A,100"));
    }
}
