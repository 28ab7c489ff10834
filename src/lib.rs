use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use tower_lsp::Client;

// ─── Module declarations ────────────────────────────────────────────────────

pub mod config;
pub mod definition;
pub mod diagnostics;
pub mod parser;
mod server;
pub mod types;
pub mod util;

// ─── Re-exports ─────────────────────────────────────────────────────────────

pub use config::{Config, ConfigError, DiagnosticsConfig};
pub use definition::find_definition;
pub use parser::{SyntaxNode, SyntaxTree};
pub use types::{Definition, NodeKind, Point};

// ─── Backend ────────────────────────────────────────────────────────────────

/// The language server state.
///
/// The backend owns one [`SyntaxTree`] per open document.  Requests take a
/// cheap `Arc` snapshot of the tree they need and release the lock before
/// doing any work, so an edit never changes a tree a query is reading.
pub struct Backend {
    pub(crate) name: String,
    pub(crate) version: String,
    /// Maps a document URI to the tree parsed from its latest content.
    pub(crate) ast_map: Arc<RwLock<HashMap<String, Arc<SyntaxTree>>>>,
    pub(crate) workspace_root: Arc<RwLock<Option<PathBuf>>>,
    pub(crate) config: Arc<RwLock<Config>>,
    /// Configuration file named on the command line, if any.
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) client: Option<Client>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        Self {
            client: Some(client),
            ..Self::new_test()
        }
    }

    /// A backend with no client attached, for driving the server directly
    /// from tests.  Logging and diagnostic publishing become no-ops.
    pub fn new_test() -> Self {
        Self {
            name: "SetLang".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            ast_map: Arc::new(RwLock::new(HashMap::new())),
            workspace_root: Arc::new(RwLock::new(None)),
            config: Arc::new(RwLock::new(Config::default())),
            config_path: None,
            client: None,
        }
    }

    /// Load configuration from `path` instead of discovering it in the
    /// workspace.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// The configuration currently in effect.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }
}
