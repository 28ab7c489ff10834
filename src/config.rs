/// Server configuration.
///
/// Settings are read from the first source that exists:
///   1. `initializationOptions` sent by the client (JSON)
///   2. An explicit path given with `--config`
///   3. `.setlang.toml` in the workspace root
///   4. `setlang/config.toml` in the user's config directory
///
/// When none exists the defaults apply.  Client options that fail to decode
/// are skipped in favour of the files.  A file that exists but fails to
/// load is reported as a [`ConfigError`]; the server logs it and keeps the
/// defaults rather than refusing to start.
///
/// ```toml
/// [diagnostics]
/// enabled = true
/// unresolved_variables = true
/// syntax_errors = true
/// ```
use std::path::{Path, PathBuf};

use etcetera::BaseStrategy;
use serde::Deserialize;
use thiserror::Error;

/// File name looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = ".setlang.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Master switch.  When `false` nothing is published.
    pub enabled: bool,
    /// Warn on `get("name")` when no `set`/`setr` binds `name`.
    pub unresolved_variables: bool,
    /// Report unexpected tokens and unclosed argument lists.
    pub syntax_errors: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            unresolved_variables: true,
            syntax_errors: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists (or was named explicitly) but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The content is not a valid configuration.  `path` is `None` when
    /// the settings did not come from a file.
    #[error("invalid configuration{}: {message}", origin(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|path| format!(" in {}", path.display()))
        .unwrap_or_default()
}

impl Config {
    /// Parse TOML configuration text.
    pub fn from_toml_str(content: &str) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Decode the client's `initializationOptions`.
    pub fn from_json(value: serde_json::Value) -> Result<Config, ConfigError> {
        serde_json::from_value(value).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })
    }

    /// Find and load the configuration for a workspace.
    ///
    /// An `explicit` path must exist.  Otherwise the workspace file and then
    /// the user file are tried, and missing files simply fall through to
    /// the defaults.
    pub fn discover(
        explicit: Option<&Path>,
        workspace_root: Option<&Path>,
    ) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = workspace_root
            .map(|root| root.join(CONFIG_FILE_NAME))
            .into_iter()
            .chain(user_config_path());

        for path in candidates {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }
}

/// `<config dir>/setlang/config.toml`, following the platform's base
/// directory conventions.  `None` when no home directory can be found.
pub fn user_config_path() -> Option<PathBuf> {
    let strategy = etcetera::choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("setlang").join("config.toml"))
}
