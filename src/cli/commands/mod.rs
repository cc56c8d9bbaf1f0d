pub mod category;
pub mod entry;
pub mod month;
pub mod stats;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::ledger::Position;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(month::definitions());
    commands.extend(category::definitions());
    commands.extend(entry::definitions());
    commands.extend(stats::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Reads a grid cell from `row col`, `row,col` or `(row, col)`.
pub(crate) fn parse_position(args: &[&str]) -> Result<Position, CommandError> {
    let position = match args {
        [single] => single.parse::<Position>()?,
        [row, col] => format!("{row},{col}").parse::<Position>()?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "Expected a grid position such as `0 1` or `0,1`.".into(),
            ))
        }
    };
    Ok(position)
}

pub(crate) fn parse_index(arg: Option<&&str>) -> Result<usize, CommandError> {
    let raw = arg.ok_or_else(|| CommandError::InvalidArguments("Missing entry index.".into()))?;
    raw.parse::<usize>()
        .map_err(|_| CommandError::InvalidArguments(format!("Invalid entry index `{raw}`.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_parse_from_one_or_two_arguments() {
        assert_eq!(parse_position(&["1", "2"]).unwrap(), Position::new(1, 2));
        assert_eq!(parse_position(&["(0, 3)"]).unwrap(), Position::new(0, 3));
        assert!(parse_position(&[]).is_err());
        assert!(parse_position(&["a", "b"]).is_err());
    }

    #[test]
    fn every_command_has_a_unique_name() {
        let mut names: Vec<_> = all_definitions().iter().map(|entry| entry.name).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
