//! Startup configuration
//!
//! Read once, at or before first use. Invalid values are a configuration
//! error at read time, never deferred to the first log call.
//!
//! Environment variables:
//! - `SCOPELOG_JSON` — boolean, selects the JSON pipeline over text
//! - `SCOPELOG_JSON_LEVEL` — minimum level name for JSON mode (default `info`)
//! - `SCOPELOG_TEXT_LEVEL` — minimum level name for text mode (default
//!   `trace`, i.e. no filtering)
//! - `SCOPELOG_COLORS` — boolean, text-mode colorization (default on)

use std::env;

use super::error::{LogError, Result};
use super::level::Level;

const TRUTHY: [&str; 6] = ["1", "true", "yes", "y", "ok", "on"];
const FALSY: [&str; 6] = ["0", "false", "no", "n", "nok", "off"];

/// Output mode of the rendering pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable columns, optionally colorized
    #[default]
    Text,
    /// One compact JSON record per line
    Json,
}

/// Immutable pipeline configuration, frozen once the first event is processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub mode: OutputMode,
    /// Minimum level when the JSON pipeline is selected
    pub json_level: Level,
    /// Minimum level when the text pipeline is selected
    pub text_level: Level,
    /// Colorize the text-mode level label
    pub colors: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::Text,
            json_level: Level::Info,
            text_level: Level::Trace,
            colors: true,
        }
    }
}

impl PipelineConfig {
    /// Read and validate the configuration from the environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(json) = env_bool("SCOPELOG_JSON")? {
            config.mode = if json { OutputMode::Json } else { OutputMode::Text };
        }
        if let Some(level) = env_level("SCOPELOG_JSON_LEVEL")? {
            config.json_level = level;
        }
        if let Some(level) = env_level("SCOPELOG_TEXT_LEVEL")? {
            config.text_level = level;
        }
        if let Some(colors) = env_bool("SCOPELOG_COLORS")? {
            config.colors = colors;
        }

        Ok(config)
    }

    /// The minimum level of the selected output mode
    pub fn min_level(&self) -> Level {
        match self.mode {
            OutputMode::Json => self.json_level,
            OutputMode::Text => self.text_level,
        }
    }
}

fn env_bool(key: &str) -> Result<Option<bool>> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => {
            let lowered = raw.to_lowercase();
            if TRUTHY.contains(&lowered.as_str()) {
                Ok(Some(true))
            } else if FALSY.contains(&lowered.as_str()) {
                Ok(Some(false))
            } else {
                Err(LogError::config(
                    key,
                    format!("expected a boolean, got '{raw}'"),
                ))
            }
        }
    }
}

fn env_level(key: &str) -> Result<Option<Level>> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => raw
            .parse::<Level>()
            .map(Some)
            .map_err(|_| LogError::config(key, format!("'{raw}' is not a valid level name"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable tests mutate process state; each test uses its
    // own variable names elsewhere, so only defaults and parsing helpers are
    // covered here.

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.mode, OutputMode::Text);
        assert_eq!(config.json_level, Level::Info);
        assert_eq!(config.text_level, Level::Trace);
        assert!(config.colors);
        assert_eq!(config.min_level(), Level::Trace);
    }

    #[test]
    fn test_min_level_tracks_mode() {
        let config = PipelineConfig {
            mode: OutputMode::Json,
            ..PipelineConfig::default()
        };
        assert_eq!(config.min_level(), Level::Info);
    }

    #[test]
    fn test_env_bool_accepted_spellings() {
        env::set_var("SCOPELOG_TEST_BOOL_OK", "YES");
        assert_eq!(env_bool("SCOPELOG_TEST_BOOL_OK").unwrap(), Some(true));
        env::set_var("SCOPELOG_TEST_BOOL_OK", "off");
        assert_eq!(env_bool("SCOPELOG_TEST_BOOL_OK").unwrap(), Some(false));
        env::remove_var("SCOPELOG_TEST_BOOL_OK");
        assert_eq!(env_bool("SCOPELOG_TEST_BOOL_OK").unwrap(), None);
    }

    #[test]
    fn test_env_bool_rejects_garbage() {
        env::set_var("SCOPELOG_TEST_BOOL_BAD", "maybe");
        let err = env_bool("SCOPELOG_TEST_BOOL_BAD").unwrap_err();
        assert!(err.is_configuration());
        env::remove_var("SCOPELOG_TEST_BOOL_BAD");
    }

    #[test]
    fn test_env_level_case_insensitive() {
        env::set_var("SCOPELOG_TEST_LEVEL_OK", "Warning");
        assert_eq!(
            env_level("SCOPELOG_TEST_LEVEL_OK").unwrap(),
            Some(Level::Warning)
        );
        env::remove_var("SCOPELOG_TEST_LEVEL_OK");
    }

    #[test]
    fn test_env_level_rejects_unknown_name() {
        env::set_var("SCOPELOG_TEST_LEVEL_BAD", "loud");
        let err = env_level("SCOPELOG_TEST_LEVEL_BAD").unwrap_err();
        assert!(matches!(err, LogError::InvalidConfiguration { .. }));
        env::remove_var("SCOPELOG_TEST_LEVEL_BAD");
    }
}
