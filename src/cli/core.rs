//! Shell context, dispatch, and error reporting.

use std::{cell::Cell, rc::Rc};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{
    config::{Config, ConfigManager},
    errors::{ConfigError, LedgerError, StatsError},
    i18n::Localizer,
    ledger::{CategoryRecord, GridShape, Position, RegistryEvent, YearBook},
    stats::{ChartSize, StatisticsView, TextBarChart},
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
use super::shell::parse_command_line;

/// Errors raised while running a single command; none of them end the shell
/// except `ExitRequested`.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Exit requested")]
    ExitRequested,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Dialog error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

/// Errors that abort the shell loop.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

const MIN_CHART_HEIGHT: usize = 6;
const MAX_CHART_HEIGHT: usize = 40;
const GRID_CELL_WIDTH: usize = 12;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub book: YearBook,
    pub localizer: Localizer,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub renderer: TextBarChart,
    pub stats: Option<StatisticsView>,
    pub last_command: Option<String>,
    pub running: bool,
    config_manager: Option<ConfigManager>,
    stats_stale: Rc<Cell<bool>>,
}

impl ShellContext {
    /// Loads the user config (falling back to defaults) and builds the shell.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(err) => {
                warn!(error = %err, "config directory unavailable");
                cli_io::print_warning(format!("Configuration unavailable: {err}"));
                None
            }
        };
        let config = match manager.as_ref().map(ConfigManager::load) {
            Some(Ok(config)) => config,
            Some(Err(err)) => {
                warn!(error = %err, "config unreadable, using defaults");
                cli_io::print_warning(format!("Ignoring unreadable configuration: {err}"));
                Config::default()
            }
            None => Config::default(),
        };
        Self::with_config(mode, config, manager)
    }

    pub fn with_config(
        mode: CliMode,
        config: Config,
        config_manager: Option<ConfigManager>,
    ) -> Result<Self, CliError> {
        let shape = config.grid_shape()?;
        output::set_preferences(OutputPreferences {
            high_contrast_mode: config.high_contrast,
            plain_mode: mode == CliMode::Script,
        });

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let renderer = if config.high_contrast {
            TextBarChart::ascii()
        } else {
            TextBarChart::default()
        };

        let mut context = ShellContext {
            mode,
            registry,
            book: YearBook::new(shape),
            localizer: Localizer::new(config.locale()),
            config,
            theme: ColorfulTheme::default(),
            renderer,
            stats: None,
            last_command: None,
            running: true,
            config_manager,
            stats_stale: Rc::new(Cell::new(false)),
        };
        context.watch_months();
        Ok(context)
    }

    /// Any change to a month invalidates the aggregated statistics view.
    fn watch_months(&mut self) {
        for month in 1..=crate::ledger::MONTHS_IN_YEAR {
            let stale = Rc::clone(&self.stats_stale);
            if let Ok(registry) = self.book.month_mut(month) {
                registry.subscribe(move |event: &RegistryEvent| {
                    trace!(month, ?event, "registry changed");
                    stale.set(true);
                });
            }
        }
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn tr<'a>(&self, key: &'a str) -> &'a str {
        self.localizer.tr(key)
    }

    pub fn month_label(&self, month: u32) -> String {
        self.localizer
            .month_name(month)
            .map(str::to_string)
            .unwrap_or_else(|_| month.to_string())
    }

    pub fn prompt(&self) -> String {
        let registry = self.book.current_registry();
        let selected = registry
            .selected_record()
            .map(|record| record.name.as_str())
            .unwrap_or("-");
        format!("{} [{}]> ", self.month_label(self.book.current()), selected)
    }

    /// The selected category of the current month.
    pub fn selected(&self) -> Result<&CategoryRecord, CommandError> {
        self.book
            .current_registry()
            .selected_record()
            .ok_or(CommandError::Ledger(LedgerError::NoSelection))
    }

    pub fn selected_position(&self) -> Result<Position, CommandError> {
        Ok(self.selected()?.position)
    }

    pub fn take_stats_stale(&self) -> bool {
        self.stats_stale.replace(false)
    }

    pub fn mark_stats_fresh(&self) {
        self.stats_stale.set(false);
    }

    pub fn persist_config(&self) -> CommandResult {
        if let Some(manager) = &self.config_manager {
            manager.save(&self.config)?;
        }
        Ok(())
    }

    /// Chart width follows the terminal in interactive mode, the config otherwise.
    pub fn chart_size(&self, width: Option<usize>, rows: usize) -> ChartSize {
        let width = width.unwrap_or_else(|| match self.mode {
            CliMode::Interactive => crossterm::terminal::size()
                .map(|(columns, _)| usize::from(columns).saturating_sub(2))
                .unwrap_or_else(|_| self.config.chart_width()),
            CliMode::Script => self.config.chart_width(),
        });
        let height = (rows + 3).clamp(MIN_CHART_HEIGHT, MAX_CHART_HEIGHT);
        ChartSize::new(width, height)
    }

    /// Text picture of the current month's grid.
    pub fn render_grid(&self) -> String {
        let registry = self.book.current_registry();
        let shape: GridShape = registry.shape();
        let affordance = registry.create_affordance();
        let selected = registry.selected();
        let mut lines = Vec::with_capacity(shape.rows);
        for row in 0..shape.rows {
            let cells: Vec<String> = (0..shape.cols)
                .map(|col| {
                    let position = Position::new(row, col);
                    let label = match registry.get(position) {
                        Some(record) if selected == Some(position) => format!("*{}", record.name),
                        Some(record) => record.name.clone(),
                        None if affordance == Some(position) => "+".to_string(),
                        None => ".".to_string(),
                    };
                    let clipped: String = label.chars().take(GRID_CELL_WIDTH).collect();
                    format!("{:<GRID_CELL_WIDTH$}", clipped)
                })
                .collect();
            lines.push(cells.join(" ").trim_end().to_string());
        }
        lines.join("\n")
    }

    /// Tokenises and runs one input line.
    pub fn execute(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                cli_io::print_warning(err);
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        self.last_command = Some(line.trim().to_string());

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
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

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
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
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        self.confirm("Exit shell?")
    }

    /// Input problems print as warnings, a full grid as a notice, everything
    /// else as an error.
    pub fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Ledger(LedgerError::InvalidName(name)) => {
                cli_io::print_warning(format!("{}: `{}`", self.tr("Invalid category name"), name));
            }
            CommandError::Ledger(
                err @ (LedgerError::InvalidAmount(_) | LedgerError::InvalidField { .. }),
            ) => cli_io::print_warning(err),
            CommandError::Ledger(LedgerError::GridFull { .. }) => {
                cli_io::print_info(self.tr("Grid is full"));
            }
            CommandError::Stats(StatsError::EmptyDataset) => {
                cli_io::print_warning(self.tr("No data to plot"));
            }
            other => cli_io::print_error(other),
        }
    }
}
