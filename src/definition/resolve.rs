/// Goto-definition resolution.
///
/// Given a cursor position in a document this module:
///   1. Locates the smallest syntax node under the cursor.
///   2. Bails out unless that node is a string literal (a variable name).
///   3. Collects the binding calls for that name (see [`super::binding`]).
///   4. Turns them into zero-width LSP locations at each call's start.
///
/// Every outcome is a value: `None` means "no definition", whether because
/// the cursor is not on a string or because nothing binds the name.
use tower_lsp::lsp_types::*;

use super::binding::find_binding_calls;
use crate::Backend;
use crate::parser::{SyntaxNode, SyntaxTree};
use crate::types::{Definition, NodeKind};
use crate::util::{caret_range, point_for_position, position_for_point};

/// Resolve the binding site(s) of the variable named at `position`.
///
/// This is a pure function of the tree snapshot and the query.
pub fn find_definition(tree: &SyntaxTree, uri: &Url, position: Position) -> Option<Definition> {
    let point = point_for_position(tree.source(), position);
    let node = tree.node_for_point(point);

    if node.kind() != NodeKind::String {
        tracing::debug!(kind = ?node.kind(), "definition requested on a non-string node");
        return None;
    }

    let varname = node.text();
    let matches = find_binding_calls(tree.root_node(), varname);
    tracing::debug!(varname, matches = matches.len(), "resolved binding calls");

    build_definition(tree, uri, &matches)
}

/// Zero matches → `None`, one → [`Definition::Single`], more →
/// [`Definition::Multiple`] in the order given.
fn build_definition(tree: &SyntaxTree, uri: &Url, nodes: &[SyntaxNode<'_>]) -> Option<Definition> {
    let mut locations = nodes.iter().map(|&node| caret_location(tree, uri, node));

    match nodes.len() {
        0 => None,
        1 => locations.next().map(Definition::Single),
        _ => Some(Definition::Multiple(locations.collect())),
    }
}

/// A zero-width location at the start of `node`.
fn caret_location(tree: &SyntaxTree, uri: &Url, node: SyntaxNode<'_>) -> Location {
    let start = position_for_point(tree.source(), node.start_position());
    Location {
        uri: uri.clone(),
        range: caret_range(start),
    }
}

impl Backend {
    /// Handle a "go to definition" request against the cached tree for
    /// `uri`.  Returns `None` for documents that are not open.
    pub(crate) fn resolve_definition(&self, uri: &Url, position: Position) -> Option<Definition> {
        let Some(tree) = self.tree_for_uri(uri.as_str()) else {
            tracing::debug!(uri = %uri, "definition requested for unknown document");
            return None;
        };
        find_definition(&tree, uri, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> Url {
        Url::parse("file:///test.setl").unwrap()
    }

    fn at(line: u32, character: u32) -> Location {
        Location {
            uri: uri(),
            range: Range::new(Position::new(line, character), Position::new(line, character)),
        }
    }

    #[test]
    fn test_single_set_on_one_line() {
        let tree = SyntaxTree::parse("set(\"x\", 1); get(\"x\")");
        let result = find_definition(&tree, &uri(), Position::new(0, 18));
        assert_eq!(result, Some(Definition::Single(at(0, 0))));
    }

    #[test]
    fn test_build_definition_shapes() {
        let tree = SyntaxTree::parse("a()\nb()");
        let calls = tree.root_node().descendants_of_kind(NodeKind::Call);

        assert_eq!(build_definition(&tree, &uri(), &[]), None);
        assert_eq!(
            build_definition(&tree, &uri(), &calls[..1]),
            Some(Definition::Single(at(0, 0)))
        );
        assert_eq!(
            build_definition(&tree, &uri(), &calls),
            Some(Definition::Multiple(vec![at(0, 0), at(1, 0)]))
        );
    }

    #[test]
    fn test_on_the_binding_literal_itself() {
        let tree = SyntaxTree::parse("set(\"x\", 1)");
        let result = find_definition(&tree, &uri(), Position::new(0, 5));
        assert_eq!(result, Some(Definition::Single(at(0, 0))));
    }

    #[test]
    fn test_non_string_node_is_not_applicable() {
        let tree = SyntaxTree::parse("set(\"x\", 1); get(\"x\")");
        // On the number literal.
        assert_eq!(find_definition(&tree, &uri(), Position::new(0, 9)), None);
        // On the `get` identifier.
        assert_eq!(find_definition(&tree, &uri(), Position::new(0, 14)), None);
    }

    #[test]
    fn test_repeated_queries_are_equal() {
        let tree = SyntaxTree::parse("setr(\"y\", 2); setr(\"y\", 3)");
        let first = find_definition(&tree, &uri(), Position::new(0, 6));
        let second = find_definition(&tree, &uri(), Position::new(0, 6));
        assert_eq!(first, second);
        assert_eq!(first, Some(Definition::Multiple(vec![at(0, 0), at(0, 14)])));
    }
}
