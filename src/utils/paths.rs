use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".finance_tracker";
const CONFIG_FILE: &str = "config.json";

/// Environment variable that relocates the application directory.
pub const HOME_ENV: &str = "FINANCE_TRACKER_HOME";

/// Returns the application-specific data directory, defaulting to `~/.finance_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
