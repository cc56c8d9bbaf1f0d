use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::ledger::input::{parse_patch, EntryForm};
use crate::stats::UNKNOWN_DATE;

use super::parse_index;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List the entries of the selected category",
            "list",
            cmd_list,
        ),
        CommandEntry::new(
            "add",
            "Add an entry to the selected category",
            "add <amount> [date] [description] [subcategory]",
            cmd_add,
        ),
        CommandEntry::new(
            "remove",
            "Remove an entry from the selected category",
            "remove <index>",
            cmd_remove,
        ),
        CommandEntry::new(
            "change",
            "Change fields of an entry",
            "change <index> [amount=..] [date=..] [description=..] [subcategory=..]",
            cmd_change,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let record = context.selected()?;
    output::section(format!("{} ({})", record.name, record.position));
    if record.is_empty() {
        io::print_info("No entries.");
        return Ok(());
    }
    let mut lines = Vec::with_capacity(record.len() + 1);
    for (index, entry) in record.fields.iter().enumerate() {
        let date = if entry.date.is_empty() {
            UNKNOWN_DATE
        } else {
            entry.date.as_str()
        };
        lines.push(format!(
            "{index:>3}  {:>10.2}  {:<10}  {:<20}  {}",
            entry.amount, date, entry.description, entry.subcategory
        ));
    }
    lines.push(format!("     {:>10.2}  total", record.total()));
    output::block(lines.join("\n"));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(amount) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "Usage: add <amount> [date] [description] [subcategory]".into(),
        ));
    };
    if args.len() > 4 {
        return Err(CommandError::InvalidArguments(
            "Too many fields; quote descriptions that contain spaces.".into(),
        ));
    }
    let mut form = EntryForm::new(*amount);
    if let Some(date) = args.get(1) {
        form = form.date(*date);
    }
    if let Some(description) = args.get(2) {
        form = form.description(*description);
    }
    if let Some(subcategory) = args.get(3) {
        form = form.subcategory(*subcategory);
    }
    let entry = form.to_entry()?;
    let position = context.selected_position()?;
    let index = context
        .book
        .current_registry_mut()
        .add_entry(position, entry)?;
    io::print_success(format!("Added entry #{index}."));
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_index(args.first())?;
    let position = context.selected_position()?;
    let removed = context
        .book
        .current_registry_mut()
        .remove_entry(position, index)?;
    io::print_success(format!("Removed entry #{index} ({:.2}).", removed.amount));
    Ok(())
}

fn cmd_change(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let index = parse_index(args.first())?;
    let patch = parse_patch(args.iter().skip(1).copied())?;
    if patch.is_empty() {
        return Err(CommandError::InvalidArguments(
            "Nothing to change; pass field=value pairs.".into(),
        ));
    }
    let position = context.selected_position()?;
    context
        .book
        .current_registry_mut()
        .modify_entry(position, index, patch)?;
    io::print_success(format!("Updated entry #{index}."));
    Ok(())
}
