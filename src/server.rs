/// LSP server trait implementation.
///
/// This module contains the `impl LanguageServer for Backend` block,
/// which handles all LSP protocol messages (initialize, didOpen, didChange,
/// didClose, definition, etc.).
use tower_lsp::LanguageServer;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::config::{Config, ConfigError};

impl Backend {
    /// Pick the configuration for this session: the client's
    /// `initializationOptions` when present and valid, otherwise file
    /// discovery.  Failures are logged; a file that fails to load leaves
    /// the defaults in place.
    async fn load_config(&self, initialization_options: Option<serde_json::Value>) {
        let from_client = initialization_options
            .filter(|value| !value.is_null())
            .map(Config::from_json);

        let loaded = match from_client {
            Some(Ok(config)) => Ok(config),
            Some(Err(err)) => {
                tracing::warn!(error = %err, "ignoring initializationOptions");
                self.log(
                    MessageType::WARNING,
                    format!("SetLang: {}; ignoring initializationOptions", err),
                )
                .await;
                self.discover_config()
            }
            None => self.discover_config(),
        };

        match loaded {
            Ok(config) => {
                tracing::info!(?config, "configuration loaded");
                *self.config.write() = config;
            }
            Err(err) => {
                tracing::warn!(error = %err, "using default configuration");
                self.log(
                    MessageType::WARNING,
                    format!("SetLang: {}; using defaults", err),
                )
                .await;
            }
        }
    }

    fn discover_config(&self) -> std::result::Result<Config, ConfigError> {
        let root = self.workspace_root.read().clone();
        Config::discover(self.config_path.as_deref(), root.as_deref())
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        // Extract and store the workspace root path
        #[allow(deprecated)]
        let workspace_root = params
            .workspace_folders
            .as_ref()
            .and_then(|folders| folders.first())
            .map(|folder| &folder.uri)
            .or(params.root_uri.as_ref())
            .and_then(|uri| uri.to_file_path().ok());

        *self.workspace_root.write() = workspace_root;

        self.load_config(params.initialization_options).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                definition_provider: Some(OneOf::Left(true)),
                ..ServerCapabilities::default()
            },
            server_info: Some(ServerInfo {
                name: self.name.clone(),
                version: Some(self.version.clone()),
            }),
            offset_encoding: None,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.log(MessageType::INFO, format!("{} initialized!", self.name))
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("shutdown requested");
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        let tree = self.update_ast(doc.uri.as_str(), &doc.text);

        self.publish_diagnostics(doc.uri.clone(), &tree).await;

        self.log(MessageType::INFO, format!("Opened file: {}", doc.uri))
            .await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;

        // FULL sync: the last change carries the whole document.
        if let Some(change) = params.content_changes.into_iter().last() {
            let tree = self.update_ast(uri.as_str(), &change.text);
            self.publish_diagnostics(uri, &tree).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        self.evict_ast(uri.as_str());
        self.clear_diagnostics(uri.clone()).await;

        self.log(MessageType::INFO, format!("Closed file: {}", uri))
            .await;
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let definition = self.resolve_definition(&uri, position);
        if definition.is_none() {
            tracing::debug!(
                uri = %uri,
                line = position.line,
                character = position.character,
                "no definition found"
            );
        }

        Ok(definition.map(GotoDefinitionResponse::from))
    }
}
