/// DSL parsing and the per-document tree cache.
///
/// This module turns document text into an immutable [`SyntaxTree`] and
/// keeps the latest tree for every open document in the backend's
/// `ast_map`.
///
/// Sub-modules:
/// - [`lexer`]: Tokenizer (comments and whitespace are dropped here)
/// - [`grammar`]: Error-tolerant recursive-descent parser
/// - [`tree`]: The arena-backed tree and its node view API
mod grammar;
mod lexer;
pub mod tree;

use std::sync::Arc;

use crate::Backend;

pub use tree::{SyntaxNode, SyntaxTree};

impl Backend {
    /// Parse `content` and make the result the current tree for `uri`,
    /// replacing any previous snapshot.  Returns the new tree.
    pub(crate) fn update_ast(&self, uri: &str, content: &str) -> Arc<SyntaxTree> {
        let tree = Arc::new(SyntaxTree::parse(content));
        tracing::debug!(uri, errors = tree.errors().len(), "parsed document");
        self.ast_map
            .write()
            .insert(uri.to_string(), Arc::clone(&tree));
        tree
    }

    /// Drop the cached tree for `uri`.
    pub(crate) fn evict_ast(&self, uri: &str) {
        self.ast_map.write().remove(uri);
    }

    /// The current tree snapshot for `uri`, if the document is open.
    ///
    /// The returned `Arc` keeps the snapshot alive even if the document is
    /// edited or closed while the caller is still using it.
    pub fn tree_for_uri(&self, uri: &str) -> Option<Arc<SyntaxTree>> {
        self.ast_map.read().get(uri).cloned()
    }
}
