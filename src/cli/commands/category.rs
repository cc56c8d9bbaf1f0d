use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::errors::LedgerError;
use crate::ledger::RegistryState;

use super::parse_position;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "create",
            "Create a category in the next free cell",
            "create <name>",
            cmd_create,
        ),
        CommandEntry::new(
            "select",
            "Select the category at a grid position",
            "select <row> <col>",
            cmd_select,
        ),
        CommandEntry::new(
            "delete",
            "Delete a category (the selected one by default)",
            "delete [row col]",
            cmd_delete,
        ),
    ]
}

fn cmd_create(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    let registry = context.book.current_registry_mut();
    let position = registry.create(&name)?;
    let full = registry.state() == RegistryState::Full;
    let created = registry
        .get(position)
        .map(|record| record.name.clone())
        .unwrap_or(name);
    io::print_success(format!("Created `{created}` at {position}."));
    if full {
        io::print_info(context.tr("Grid is full"));
    }
    Ok(())
}

fn cmd_select(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let position = parse_position(args)?;
    let record = context.book.current_registry_mut().select(position)?;
    io::print_info(format!(
        "Selected `{}` ({} entries).",
        record.name,
        record.len()
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let position = if args.is_empty() {
        context.selected_position()?
    } else {
        parse_position(args)?
    };
    let name = context
        .book
        .current_registry()
        .get(position)
        .map(|record| record.name.clone())
        .ok_or(LedgerError::NotFound(position))?;
    if !context.confirm(&format!("Delete category `{name}`?"))? {
        io::print_info("Deletion cancelled.");
        return Ok(());
    }
    context.book.current_registry_mut().delete(position)?;
    io::print_success(format!("Deleted `{name}`."));
    Ok(())
}
