//! Shell context, dispatch and error reporting.

use std::{io, path::PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use uuid::Uuid;

use tally_config::{Config, ConfigError, ConfigManager};
use tally_core::{Applied, CoreError, ExportError, LedgerSession, StoreError, SystemClock};
use tally_domain::{Transaction, TransactionFilter};
use tally_storage_json::JsonFileStore;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output::{self, OutputPreferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failures that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("ledger store: {0}")]
    Store(#[from] StoreError),
    #[error("line editor: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: LedgerSession,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub filter: TransactionFilter,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    /// Opens the shell against `$TALLY_HOME` (or `~/.tally`).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_home(mode, ConfigManager::default_home())
    }

    pub fn with_home(mode: CliMode, home: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        let store = JsonFileStore::new(config.resolve_data_dir(&home))?;
        tracing::debug!(home = %home.display(), store = %store.root().display(), "opening ledger");
        let session = LedgerSession::open(Box::new(store), Box::new(SystemClock))?;
        let context = Self::with_session(mode, session, config, config_manager);
        for warning in context.session.load_warnings() {
            output::warning(warning);
        }
        Ok(context)
    }

    pub fn with_session(
        mode: CliMode,
        session: LedgerSession,
        config: Config,
        config_manager: ConfigManager,
    ) -> Self {
        let context = ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            session,
            config,
            config_manager,
            filter: TransactionFilter::all(),
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.apply_output_preferences();
        context
    }

    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
    }

    pub(crate) fn prompt(&self) -> String {
        let balance = match self.session.balance() {
            Some(balance) => super::format::format_amount(&self.config.currency_symbol, balance),
            None => "unset".to_string(),
        };
        let dirty = if self.session.is_dirty() { "*" } else { "" };
        format!("tally [{balance}]{dirty}> ")
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn currency(&self) -> &str {
        &self.config.currency_symbol
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let handler = self.registry.get(command).map(|definition| definition.handler);
        if let Some(handler) = handler {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match super::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::BalanceNotInitialized) => {
                output::error(CoreError::BalanceNotInitialized);
                output::hint("Set one with `init <amount>`.");
            }
            CommandError::Core(CoreError::Validation(message)) => {
                output::error(message);
            }
            other => output::error(other),
        }
    }

    /// Asks for confirmation in interactive mode; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    /// Unwraps a mutation outcome, warning when the change could not be saved.
    pub(crate) fn settle<T>(&self, applied: Applied<T>) -> T {
        if let Some(err) = &applied.persist_error {
            output::warning(format!("Change kept in memory but not saved: {err}"));
            output::hint("Run `save` to retry.");
        }
        applied.value
    }

    /// Looks up a transaction by full id or unique prefix.
    pub(crate) fn resolve_transaction(&self, needle: &str) -> Result<Uuid, CommandError> {
        self.session.resolve_id(needle).map_err(|err| match err {
            CoreError::Validation(message) => CommandError::InvalidArguments(message),
            other => CommandError::Core(other),
        })
    }

    pub(crate) fn transaction(&self, id: Uuid) -> Result<&Transaction, CommandError> {
        self.session
            .state()
            .transaction(id)
            .ok_or(CommandError::Core(CoreError::TransactionNotFound(id)))
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Saves pending changes before leaving. Returns false to stay in the shell.
    pub(crate) fn prepare_exit(&mut self) -> Result<bool, CommandError> {
        if !self.session.is_dirty() {
            return Ok(true);
        }
        match self.session.flush() {
            Ok(()) => {
                output::success("Pending changes saved.");
                Ok(true)
            }
            Err(err) => {
                output::error(format!("Could not save pending changes: {err}"));
                self.confirm("Exit anyway and lose unsaved changes?", false)
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(context: &mut ShellContext, lines: &[&str]) {
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
}
