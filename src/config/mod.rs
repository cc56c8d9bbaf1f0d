use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    errors::ConfigError,
    i18n::Locale,
    ledger::GridShape,
    utils::paths::{app_data_dir, config_file_in},
};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_CHART_WIDTH: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub grid_rows: usize,
    pub grid_cols: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_width: Option<usize>,
    pub high_contrast: bool,
}

impl Default for Config {
    fn default() -> Self {
        let shape = GridShape::default();
        Self {
            locale: Locale::English.tag().into(),
            grid_rows: shape.rows,
            grid_cols: shape.cols,
            chart_width: None,
            high_contrast: false,
        }
    }
}

impl Config {
    pub fn grid_shape(&self) -> Result<GridShape, ConfigError> {
        GridShape::new(self.grid_rows, self.grid_cols)
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    pub fn locale(&self) -> Locale {
        Locale::from_tag(&self.locale)
    }

    pub fn chart_width(&self) -> usize {
        self.chart_width.unwrap_or(DEFAULT_CHART_WIDTH)
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.grid_shape()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.grid_shape()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
