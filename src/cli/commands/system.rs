use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::i18n::Locale;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "lang",
            "Show or switch the display language",
            "lang [en|ru]",
            cmd_lang,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Finance Tracker {}", meta.version));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_lang(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(tag) = args.first() else {
        io::print_info(format!("Language: {}", context.localizer.locale().tag()));
        return Ok(());
    };
    let locale = match tag.to_ascii_lowercase().as_str() {
        "en" | "english" => Locale::English,
        "ru" | "russian" => Locale::Russian,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "Unsupported language `{other}`. Use `en` or `ru`."
            )))
        }
    };
    context.localizer.set_locale(locale);
    context.config.locale = locale.tag().to_string();
    context.persist_config()?;
    io::print_success(context.tr("Finance management app"));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
