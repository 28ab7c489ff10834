/// Document diagnostics.
///
/// Two passes run over a freshly parsed tree:
///   - **Unresolved variables**: `get("name")` where no `set`/`setr` call
///     binds `name`.  Uses the same binding rules as goto definition, so a
///     warning here means goto definition on that literal finds nothing.
///   - **Syntax errors**: tokens the grammar could not place and argument
///     lists that never see their closing `)`.
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::config::DiagnosticsConfig;
use crate::definition::binding::{bound_names, callee_name, first_argument_of};
use crate::parser::{SyntaxNode, SyntaxTree};
use crate::types::NodeKind;
use crate::util::{caret_range, position_for_point};

/// Value of the `source` field on every published diagnostic.
pub const DIAGNOSTIC_SOURCE: &str = "setlang";

/// The call that reads a variable.
const USE_SITE_CALLEE: &str = "get";

/// Compute all enabled diagnostics for `tree`, ordered by position.
pub fn collect_diagnostics(tree: &SyntaxTree, config: &DiagnosticsConfig) -> Vec<Diagnostic> {
    if !config.enabled {
        return Vec::new();
    }

    let mut diagnostics = Vec::new();
    if config.unresolved_variables {
        diagnostics.extend(unresolved_variables(tree));
    }
    if config.syntax_errors {
        diagnostics.extend(syntax_errors(tree));
    }

    diagnostics.sort_by_key(|d| (d.range.start.line, d.range.start.character));
    diagnostics
}

fn unresolved_variables(tree: &SyntaxTree) -> Vec<Diagnostic> {
    let root = tree.root_node();
    let bound = bound_names(root);

    root.descendants_of_kind(NodeKind::Call)
        .into_iter()
        .filter(|&call| callee_name(call) == Some(USE_SITE_CALLEE))
        .filter_map(first_argument_of)
        .filter(|arg| arg.kind() == NodeKind::String && !bound.contains(arg.text()))
        .map(|arg| Diagnostic {
            range: node_range(tree, arg),
            severity: Some(DiagnosticSeverity::WARNING),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: format!(
                "No `set` or `setr` binding found for variable {}",
                arg.text()
            ),
            ..Diagnostic::default()
        })
        .collect()
}

fn syntax_errors(tree: &SyntaxTree) -> Vec<Diagnostic> {
    let root = tree.root_node();

    let unexpected = tree.errors().into_iter().map(|node| Diagnostic {
        range: node_range(tree, node),
        severity: Some(DiagnosticSeverity::ERROR),
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: format!("Unexpected {}", node.text()),
        ..Diagnostic::default()
    });

    let unclosed = root
        .descendants_of_kind(NodeKind::Arguments)
        .into_iter()
        .chain(root.descendants_of_kind(NodeKind::Parenthesized))
        .filter(|&list| !is_closed(list))
        .map(|list| Diagnostic {
            range: caret_range(position_for_point(tree.source(), list.end_position())),
            severity: Some(DiagnosticSeverity::ERROR),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message: "Missing closing parenthesis".to_string(),
            ..Diagnostic::default()
        });

    unexpected.chain(unclosed).collect()
}

/// Whether a parenthesised list ends with its own `)`.
fn is_closed(list: SyntaxNode<'_>) -> bool {
    let count = list.child_count();
    count > 1
        && list
            .child(count - 1)
            .is_some_and(|last| !last.is_named() && last.text() == ")")
}

fn node_range(tree: &SyntaxTree, node: SyntaxNode<'_>) -> Range {
    Range {
        start: position_for_point(tree.source(), node.start_position()),
        end: position_for_point(tree.source(), node.end_position()),
    }
}

impl Backend {
    /// Diagnostics for the cached tree of `uri` under the current
    /// configuration.  Empty for documents that are not open.
    pub fn diagnostics_for_uri(&self, uri: &str) -> Vec<Diagnostic> {
        let Some(tree) = self.tree_for_uri(uri) else {
            return Vec::new();
        };
        let config = self.config.read().diagnostics.clone();
        collect_diagnostics(&tree, &config)
    }

    /// Compute and send diagnostics for `uri` to the client.
    pub(crate) async fn publish_diagnostics(&self, uri: Url, tree: &SyntaxTree) {
        let config = self.config.read().diagnostics.clone();
        let diagnostics = collect_diagnostics(tree, &config);
        tracing::debug!(uri = %uri, count = diagnostics.len(), "publishing diagnostics");

        if let Some(client) = &self.client {
            client.publish_diagnostics(uri, diagnostics, None).await;
        }
    }

    /// Clear any diagnostics previously published for `uri`.
    pub(crate) async fn clear_diagnostics(&self, uri: Url) {
        if let Some(client) = &self.client {
            client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(source: &str) -> Vec<String> {
        let tree = SyntaxTree::parse(source);
        collect_diagnostics(&tree, &DiagnosticsConfig::default())
            .into_iter()
            .map(|d| d.message)
            .collect()
    }

    #[test]
    fn test_bound_get_is_clean() {
        assert!(messages("set(\"x\", 1)\nget(\"x\")\nsetr(\"y\", 1)\nget(\"y\")").is_empty());
    }

    #[test]
    fn test_unresolved_get_is_warned() {
        let tree = SyntaxTree::parse("set(\"x\", 1)\nget(\"z\")");
        let diags = collect_diagnostics(&tree, &DiagnosticsConfig::default());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diags[0].source.as_deref(), Some(DIAGNOSTIC_SOURCE));
        assert_eq!(
            diags[0].message,
            "No `set` or `setr` binding found for variable \"z\""
        );
        assert_eq!(
            diags[0].range,
            Range::new(Position::new(1, 4), Position::new(1, 7))
        );
    }

    #[test]
    fn test_get_without_string_argument_is_ignored() {
        assert!(messages("get(name)\nget()").is_empty());
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(
            messages("set(\"x\", 1) )\nget(\"x\""),
            vec![
                "Unexpected )".to_string(),
                "Missing closing parenthesis".to_string(),
            ]
        );
    }

    #[test]
    fn test_unclosed_parenthesized_expression() {
        assert_eq!(messages("(1"), vec!["Missing closing parenthesis".to_string()]);
    }

    #[test]
    fn test_config_switches() {
        let source = "get(\"z\") @";
        let tree = SyntaxTree::parse(source);

        let off = DiagnosticsConfig {
            enabled: false,
            ..DiagnosticsConfig::default()
        };
        assert!(collect_diagnostics(&tree, &off).is_empty());

        let no_unresolved = DiagnosticsConfig {
            unresolved_variables: false,
            ..DiagnosticsConfig::default()
        };
        let diags = collect_diagnostics(&tree, &no_unresolved);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "Unexpected @");

        let no_syntax = DiagnosticsConfig {
            syntax_errors: false,
            ..DiagnosticsConfig::default()
        };
        let diags = collect_diagnostics(&tree, &no_syntax);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Some(DiagnosticSeverity::WARNING));
    }
}
