use tally_config::Config;

use crate::cli::commands::CommandDefinition;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "save",
            "Retry saving changes that failed to persist",
            "save",
            cmd_save,
        ),
        CommandDefinition::new(
            "config",
            "Show or change preferences",
            "config [set <key> <value>]",
            cmd_config,
        ),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.session.is_dirty() {
        output::info("Nothing to save; all changes are stored.");
        return Ok(());
    }
    context.session.flush()?;
    output::success("Pending changes saved.");
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            for key in Config::KEYS {
                output::info(format!("  {:<17}: {}", key, context.config.get(key)?));
            }
            output::info(format!(
                "  {:<17}: {}",
                "file",
                context.config_manager.config_path().display()
            ));
            Ok(())
        }
        [action, key, value @ ..] if action.eq_ignore_ascii_case("set") && !value.is_empty() => {
            context.config.set(key, &value.join(" "))?;
            context.persist_config()?;
            context.apply_output_preferences();
            output::success(format!("{} = {}", key, context.config.get(key)?));
            if *key == "data_dir" {
                output::hint("The new ledger location is used from the next start.");
            }
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <key> <value>]".into(),
        )),
    }
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&name) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.prepare_exit()? {
        Err(CommandError::ExitRequested)
    } else {
        Ok(())
    }
}
