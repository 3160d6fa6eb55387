use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging::{FileSink, LogLevel, Logger};

use super::socket::{ShellError, ShellResult};

/// Serving parameters for the delivery shell. Missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub bind_addr: String,
    pub log_path: Option<PathBuf>,
    pub log_max_bytes: u64,
    pub verbose: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:7878".to_string(),
            log_path: None,
            log_max_bytes: 1024 * 1024,
            verbose: false,
        }
    }
}

impl ShellConfig {
    pub fn from_json_str(json: &str) -> ShellResult<Self> {
        serde_json::from_str(json).map_err(|err| ShellError::Config(err.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ShellResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| ShellError::Config(format!("{}: {err}", path.display())))?;
        Self::from_json_str(&contents)
    }

    pub fn with_bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// File logger when `log_path` is set. Debug events pass only when verbose.
    pub fn logger(&self) -> ShellResult<Option<Logger>> {
        let Some(path) = &self.log_path else {
            return Ok(None);
        };
        let level = if self.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };
        let sink = FileSink::new(path, self.log_max_bytes)?;
        Ok(Some(Logger::new(sink).with_min_level(level)))
    }
}
