#![allow(dead_code)]

use std::sync::Mutex;

use assert_cmd::Command;
use finance_tracker::{
    config::ConfigManager,
    ledger::{CategoryRegistry, Entry, GridShape, Position},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh application directory that outlives the test.
pub fn temp_home() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn config_manager() -> ConfigManager {
    ConfigManager::with_base_dir(temp_home()).expect("create config manager for temp dir")
}

/// Registry on a `rows x cols` grid holding `names` in creation order.
pub fn registry_with(rows: usize, cols: usize, names: &[&str]) -> CategoryRegistry {
    let shape = GridShape::new(rows, cols).expect("valid shape");
    let mut registry = CategoryRegistry::new(shape);
    for name in names {
        registry.create(name).expect("grid has room");
    }
    registry
}

pub fn add(registry: &mut CategoryRegistry, position: Position, amount: f64, date: &str) {
    let entry = Entry::new(amount).expect("valid amount").with_date(date);
    registry.add_entry(position, entry).expect("category exists");
}

/// The CLI binary in script mode, isolated in `home`.
pub fn script_cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("finance_tracker_cli").expect("binary built");
    cmd.env("FINANCE_TRACKER_CLI_SCRIPT", "1")
        .env("FINANCE_TRACKER_HOME", home)
        .env_remove("RUST_LOG");
    cmd
}
