//! Runtime configuration read from the environment.
//!
//! - `WEFT_REPARSE_CHUNK`: bytes parsed per reparse step (default 8000).
//! - `WEFT_EAGER_REPARSE`: run pending reparses after every edit
//!   (default on). Accepts `1/0`, `true/false`, `yes/no`, `on/off`.

pub const REPARSE_CHUNK_VAR: &str = "WEFT_REPARSE_CHUNK";
pub const EAGER_REPARSE_VAR: &str = "WEFT_EAGER_REPARSE";

/// Bytes a single [`Document::step`](crate::Document::step) may parse.
pub const DEFAULT_REPARSE_CHUNK: usize = 8000;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a positive byte count, got `{value}`")]
    InvalidChunk { var: &'static str, value: String },
    #[error("{var} must be a boolean (1, 0, true, false, yes, no, on, off), got `{value}`")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeftConfig {
    pub reparse_chunk: usize,
    /// Flush after each edit instead of waiting for
    /// [`Document::step`](crate::Document::step) or a query.
    pub eager_reparse: bool,
}

impl Default for WeftConfig {
    fn default() -> Self {
        WeftConfig {
            reparse_chunk: DEFAULT_REPARSE_CHUNK,
            eager_reparse: true,
        }
    }
}

impl WeftConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = WeftConfig::default();
        if let Some(value) = lookup(REPARSE_CHUNK_VAR) {
            config.reparse_chunk = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidChunk {
                        var: REPARSE_CHUNK_VAR,
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup(EAGER_REPARSE_VAR) {
            config.eager_reparse = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidFlag {
                        var: EAGER_REPARSE_VAR,
                        value,
                    })
                }
            };
        }
        Ok(config)
    }
}
