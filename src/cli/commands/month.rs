use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "month",
            "Show or switch the current month",
            "month [1-12]",
            cmd_month,
        ),
        CommandEntry::new("grid", "Show the category grid of the month", "grid", cmd_grid),
    ]
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        let month = raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("Invalid month `{raw}`. Use 1-12."))
        })?;
        context.book.set_current(month)?;
        io::print_success(format!("Switched to {}.", context.month_label(month)));
    }
    cmd_grid(context, &[])
}

fn cmd_grid(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let registry = context.book.current_registry();
    output::section(format!(
        "{} ({}/{})",
        context.month_label(context.book.current()),
        registry.len(),
        registry.shape().capacity()
    ));
    output::block(context.render_grid());
    Ok(())
}
