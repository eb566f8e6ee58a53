use std::collections::HashMap;

use chrono::NaiveDate;
use tally_core::input::parse_date;

pub mod balance;
pub mod export;
pub mod filter;
pub mod system;
pub mod transaction;

use crate::cli::core::{CommandError, CommandResult, ShellContext};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(balance::definitions());
    commands.extend(transaction::definitions());
    commands.extend(filter::definitions());
    commands.extend(export::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

/// Positional arguments plus the optional transaction flags.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct TransactionArgs<'a> {
    pub positionals: Vec<&'a str>,
    pub person: Option<String>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl<'a> TransactionArgs<'a> {
    /// Splits `args` into positionals and `--person/--category/--date` values.
    ///
    /// Both `--flag value` and `--flag=value` are accepted.
    pub fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        let mut parsed = TransactionArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            if !arg.starts_with('-') || arg.parse::<f64>().is_ok() {
                parsed.positionals.push(arg);
                continue;
            }
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) => (flag, Some(value)),
                None => (arg, None),
            };
            let value = match inline {
                Some(value) => value,
                None => iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments(format!("`{flag}` expects a value"))
                })?,
            };
            match flag {
                "--person" | "-p" => parsed.person = Some(value.to_string()),
                "--category" | "-c" => parsed.category = Some(value.to_string()),
                "--date" | "-d" => parsed.date = Some(parse_date(value)?),
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown option `{other}`"
                    )))
                }
            }
        }
        Ok(parsed)
    }
}
