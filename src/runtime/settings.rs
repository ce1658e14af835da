use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{NavError, Result};
use crate::logging::{FileSink, LogLevel, Logger};

use super::NavConfig;
use super::keymap::NavCommand;

/// Serialized engine settings, typically shipped alongside the front-end
/// bundle:
///
/// ```json
/// { "compact_threshold": 600, "log_level": "info", "keymap": { "m": "menu" },
///   "log_file": { "path": "/tmp/couch_nav.log", "max_bytes": 1048576 } }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavSettings {
    #[serde(default)]
    pub compact_threshold: Option<u32>,
    /// Floor for the configured logger. Needs either a logger already on the
    /// config or `log_file`.
    #[serde(default)]
    pub log_level: Option<String>,
    /// Replaces the configured logger with a JSON-lines file sink.
    #[serde(default)]
    pub log_file: Option<LogFileSettings>,
    /// Extra bindings layered over the defaults.
    #[serde(default)]
    pub keymap: BTreeMap<String, String>,
    /// Default bindings to remove before `keymap` is applied.
    #[serde(default)]
    pub unbind: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogFileSettings {
    pub path: PathBuf,
    /// Truncate the file once it would grow past this size; zero keeps
    /// appending forever.
    #[serde(default)]
    pub max_bytes: u64,
}

impl NavSettings {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Applies every setting or none: on error `config` is left untouched.
    pub fn apply(&self, config: &mut NavConfig) -> Result<()> {
        let mut next = config.clone();

        if let Some(threshold) = self.compact_threshold {
            if threshold == 0 {
                return Err(NavError::Settings(
                    "compact_threshold must be positive".to_string(),
                ));
            }
            next.compact_threshold = threshold;
        }

        let level = match self.log_level.as_deref() {
            Some(raw) => Some(
                raw.parse::<LogLevel>()
                    .map_err(|err| NavError::Settings(format!("{err}")))?,
            ),
            None => None,
        };
        if level.is_some() && next.logger.is_none() && self.log_file.is_none() {
            return Err(NavError::Settings(
                "log_level needs a configured logger or log_file".to_string(),
            ));
        }

        for key in &self.unbind {
            next.keymap.unbind(key);
        }
        for (key, command) in &self.keymap {
            let command: NavCommand = command.parse()?;
            next.keymap.bind(key, command)?;
        }

        // Opened last so a rejected document never creates the file.
        if let Some(file) = &self.log_file {
            let floor = next.logger.as_ref().map(Logger::min_level);
            let mut logger = Logger::new(FileSink::new(&file.path, file.max_bytes)?);
            if let Some(floor) = floor {
                logger = logger.with_min_level(floor);
            }
            next.logger = Some(logger);
        }
        if let Some(level) = level {
            next.logger = next.logger.map(|logger| logger.with_min_level(level));
        }

        *config = next;
        Ok(())
    }
}
