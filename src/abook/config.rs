use crate::error::{BookError, Result};
use crate::store::Format;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "addressbook.csv";
const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration for abook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookConfig {
    /// Data file name, relative to the data dir unless absolute
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Format of the data file; inferred from its extension when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    /// Records per page for `show all`
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            format: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl BookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: BookConfig = serde_json::from_str(&content).map_err(|e| {
            BookError::Config(format!("{}: {}", config_path.display(), e))
        })?;
        if config.page_size == 0 {
            return Err(BookError::Config(format!(
                "{}: page_size must be greater than 0",
                config_path.display()
            )));
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// Current value of a config key, formatted for display
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data_file" => Some(self.data_file.clone()),
            "format" => Some(
                self.format
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "auto".to_string()),
            ),
            "page_size" => Some(self.page_size.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data_file" => {
                if value.trim().is_empty() {
                    return Err(BookError::Config("data_file cannot be empty".to_string()));
                }
                self.data_file = value.to_string();
            }
            "format" => {
                self.format = match value {
                    "auto" => None,
                    other => Some(other.parse()?),
                };
            }
            "page_size" => match value.parse::<usize>() {
                Ok(size) if size > 0 => self.page_size = size,
                _ => return Err(BookError::InvalidPageSize(value.to_string())),
            },
            other => return Err(BookError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    /// Keys accepted by [`BookConfig::get`] and [`BookConfig::set`]
    pub fn keys() -> &'static [&'static str] {
        &["data_file", "format", "page_size"]
    }

    /// Absolute location of the data file for the given data dir
    pub fn data_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.data_file)
    }

    /// Configured format, else the one implied by the extension, else CSV
    pub fn data_format(&self, data_path: &Path) -> Format {
        self.format
            .or_else(|| Format::from_path(data_path))
            .unwrap_or(Format::Csv)
    }
}
