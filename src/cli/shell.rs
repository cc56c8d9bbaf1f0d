use std::{
    fmt,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::core::{CliError, CliMode, LoopControl, ShellContext};
use crate::cli::output;

/// Environment variable that switches the shell to non-interactive stdin mode.
pub const SCRIPT_ENV: &str = "FINANCE_TRACKER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    let helper = CommandHelper::new(context.command_names());
    editor.set_helper(Some(helper));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::section(context.tr("Finance management app"));
    output::block(context.render_grid());

    loop {
        if !context.running {
            break;
        }
        let prompt = context.prompt();
        let line = editor.readline(&prompt);

        match line {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                editor.add_history_entry(trimmed).ok();

                match context.execute(trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) => match context.confirm_exit() {
                Ok(true) => break,
                Ok(false) => {}
                Err(err) => context.report_error(err),
            },
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match context.execute(&line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names
            .into_iter()
            .map(|name| name.to_ascii_lowercase())
            .collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }

    fn candidates(&self, prefix: &str) -> Vec<Pair> {
        let prefix = prefix.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}
impl Hinter for CommandHelper {
    type Hint = String;
}
impl Highlighter for CommandHelper {}
impl Validator for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    /// Completes the command word only; arguments are left alone.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head.len() - head.trim_start().len();
        let word = &head[start..];
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.candidates(word)))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
