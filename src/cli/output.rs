use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    pub high_contrast_mode: bool,
    pub plain_mode: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

pub fn current_preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[+]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Hint => ("HINT", ""),
        MessageKind::Section => ("", ""),
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();

    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => {
            let (label, icon) = build_label(kind);
            if icon.is_empty() {
                format!("{label}: {text}")
            } else {
                format!("{label}: {icon} {text}")
            }
        }
    };

    if prefs.plain_mode {
        return formatted;
    }

    if prefs.high_contrast_mode {
        return match kind {
            MessageKind::Success
            | MessageKind::Warning
            | MessageKind::Error
            | MessageKind::Section => formatted.bold().to_string(),
            _ => formatted,
        };
    }

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Hint => formatted.dimmed().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let prefs = current_preferences();
    let formatted = apply_style(kind, message, &prefs);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Unstyled multi-line block such as a chart or a table.
pub fn block(text: impl fmt::Display) {
    println!("{}", text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_mode_skips_colors() {
        let prefs = OutputPreferences {
            plain_mode: true,
            ..OutputPreferences::default()
        };
        assert_eq!(
            apply_style(MessageKind::Warning, "grid full", &prefs),
            "WARNING: [!] grid full"
        );
        assert_eq!(
            apply_style(MessageKind::Section, " March ", &prefs),
            "=== March ==="
        );
    }
}
