// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Whether to reject sources without the .antro extension
    pub require_antro_extension: bool,

    /// Whether to log read timings
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_antro_extension: env::var(env_vars::REQUIRE_ANTRO_EXTENSION)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_performance_logging: env::var(env_vars::ENABLE_PERFORMANCE_LOGGING)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether tokenization appends an explicit EOF token
    pub emit_eof_token: bool,

    /// Whether to collect per-category token counts
    pub track_category_counts: bool,

    /// Whether error messages include the column as well as the line
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            emit_eof_token: env::var(env_vars::LEXICAL_EMIT_EOF)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            track_category_counts: env::var(env_vars::LEXICAL_TRACK_CATEGORIES)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            include_position_in_errors: env::var(env_vars::LEXICAL_INCLUDE_POSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Whether tokens left over after the program are an error
    pub require_end_of_input: bool,

    /// Whether to emit a debug event for every production entered
    pub log_productions: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            require_end_of_input: env::var(env_vars::SYNTAX_REQUIRE_END_OF_INPUT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            log_productions: env::var(env_vars::SYNTAX_LOG_PRODUCTIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Preferred minimum log level (the build profile may raise it)
    pub min_log_level: LogLevel,

    /// Whether to include phase timings in logs
    pub log_performance_events: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env::var(env_vars::LOGGING_LOG_PERFORMANCE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Load preferences from a TOML document; missing keys fall back to the env defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_ANTRO_EXTENSION: &str = "ANTRO_REQUIRE_ANTRO_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "ANTRO_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_EMIT_EOF: &str = "ANTRO_LEXICAL_EMIT_EOF";
    pub const LEXICAL_TRACK_CATEGORIES: &str = "ANTRO_LEXICAL_TRACK_CATEGORIES";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "ANTRO_LEXICAL_INCLUDE_POSITIONS";

    // Syntax
    pub const SYNTAX_REQUIRE_END_OF_INPUT: &str = "ANTRO_SYNTAX_REQUIRE_END_OF_INPUT";
    pub const SYNTAX_LOG_PRODUCTIONS: &str = "ANTRO_SYNTAX_LOG_PRODUCTIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ANTRO_LOGGING_USE_STRUCTURED";
    pub const LOGGING_MIN_LEVEL: &str = "ANTRO_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "ANTRO_LOGGING_LOG_PERFORMANCE";
}
