// RUNTIME PREFERENCES (User Experience)

use crate::config::constants::compile_time::parse::DEFAULT_MAX_SEARCH_STEPS;
use serde::{Deserialize, Serialize};
use std::env;

/// Log level as expressed in user configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn to_events_log_level(self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }

    fn from_env_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warning" | "warn" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserPreferences {
    /// Budget for the backtracking search, in steps per parse call
    pub max_search_steps: usize,

    /// Whether to log per-parse candidate and backtrack counts
    pub log_parse_metrics: bool,

    /// Whether rejected split candidates are logged at debug level
    pub log_rejected_candidates: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            max_search_steps: env::var("SEQFLOW_MAX_SEARCH_STEPS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SEARCH_STEPS),
            log_parse_metrics: env::var("SEQFLOW_LOG_PARSE_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            log_rejected_candidates: env::var("SEQFLOW_LOG_REJECTED_CANDIDATES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Minimum level of events to emit
    pub min_log_level: LogLevel,

    /// Whether events are emitted as JSON lines
    pub use_structured_logging: bool,

    /// Whether console output is enabled at all
    pub enable_console_logging: bool,

    /// Whether per-parse metric events are emitted
    pub log_parse_metrics: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: env::var("SEQFLOW_LOG_LEVEL")
                .ok()
                .and_then(|v| LogLevel::from_env_str(&v))
                .unwrap_or(LogLevel::Warning),
            use_structured_logging: env::var("SEQFLOW_STRUCTURED_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var("SEQFLOW_CONSOLE_LOGGING")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_parse_metrics: env::var("SEQFLOW_LOG_PARSE_METRICS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_preferences_default_budget() {
        let preferences = ParserPreferences::default();
        assert!(preferences.max_search_steps > 0);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_env_str("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_env_str("WARN"), Some(LogLevel::Warning));
        assert_eq!(LogLevel::from_env_str("bogus"), None);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            LogLevel::Info.to_events_log_level(),
            crate::logging::events::LogLevel::Info
        );
    }
}
