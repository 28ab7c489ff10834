/// Immutable syntax tree for one document snapshot.
///
/// Nodes live in a flat arena owned by [`SyntaxTree`]; [`SyntaxNode`] is a
/// cheap `Copy` view into it, modelled on tree-sitter's node API (kind,
/// text, positions, named and unnamed child access).
use std::fmt;

use crate::types::{NodeKind, Point};

/// Byte and row/column extent of a token or node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The parsed form of one document version.
///
/// The tree owns a copy of the source so node text can be borrowed
/// straight out of it.  It is never mutated after construction; an edit
/// produces a brand new tree.
pub struct SyntaxTree {
    source: String,
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Parse `source` into a tree.  Never fails: unparseable input ends up
    /// in [`NodeKind::Error`] nodes.
    pub fn parse(source: &str) -> SyntaxTree {
        super::grammar::parse(source)
    }

    /// The text this tree was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root_node(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            id: NodeId(0),
        }
    }

    /// Return the smallest node whose extent contains `point`.
    ///
    /// A node contains a point when `start <= point < end`.  A caret sitting
    /// exactly at the end of a node (e.g. just after the closing quote of a
    /// string) also counts as touching it.  At every level named children
    /// win over punctuation, so `"x"|)` resolves to the string rather than
    /// the `)` that starts at the same spot.
    ///
    /// Points outside all content resolve to the root.
    pub fn node_for_point(&self, point: Point) -> SyntaxNode<'_> {
        let mut node = self.root_node();
        while let Some(child) = Self::child_for_point(node, point) {
            node = child;
        }
        node
    }

    fn child_for_point(node: SyntaxNode<'_>, point: Point) -> Option<SyntaxNode<'_>> {
        let mut containing_punct = None;
        let mut touching_named = None;
        let mut touching_punct = None;

        for child in node.children() {
            let start = child.start_position();
            let end = child.end_position();
            if start <= point && point < end {
                if child.is_named() {
                    return Some(child);
                }
                containing_punct.get_or_insert(child);
            } else if end == point {
                if child.is_named() {
                    touching_named = Some(child);
                } else {
                    touching_punct = Some(child);
                }
            }
        }

        touching_named.or(containing_punct).or(touching_punct)
    }

    /// Every [`NodeKind::Error`] node in document order.
    pub fn errors(&self) -> Vec<SyntaxNode<'_>> {
        self.root_node().descendants_of_kind(NodeKind::Error)
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.root_node())
            .finish()
    }
}

/// A view of one node inside a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> SyntaxNode<'t> {
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    pub fn is_named(&self) -> bool {
        self.kind().is_named()
    }

    /// The verbatim source text covered by this node.
    pub fn text(&self) -> &'t str {
        let span = self.data().span;
        &self.tree.source[span.start_byte..span.end_byte]
    }

    pub fn start_position(&self) -> Point {
        self.data().span.start
    }

    pub fn end_position(&self) -> Point {
        self.data().span.end
    }

    pub fn parent(&self) -> Option<SyntaxNode<'t>> {
        self.data().parent.map(|id| self.with_id(id))
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }

    /// The `index`-th child, counting punctuation.
    pub fn child(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.data()
            .children
            .get(index)
            .map(|&id| self.with_id(id))
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    /// The `index`-th child, skipping punctuation.
    pub fn named_child(&self, index: usize) -> Option<SyntaxNode<'t>> {
        self.named_children().nth(index)
    }

    pub fn children(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| SyntaxNode { tree, id })
    }

    pub fn named_children(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        self.children().filter(|child| child.is_named())
    }

    /// All descendants of this node (not the node itself) with the given
    /// kind, depth-first in document order.
    pub fn descendants_of_kind(&self, kind: NodeKind) -> Vec<SyntaxNode<'t>> {
        let mut found = Vec::new();
        let mut stack: Vec<SyntaxNode<'t>> = self.children().collect();
        stack.reverse();

        while let Some(node) = stack.pop() {
            if node.kind() == kind {
                found.push(node);
            }
            let first = stack.len();
            stack.extend(node.children());
            stack[first..].reverse();
        }

        found
    }

    fn data(&self) -> &'t NodeData {
        self.tree.data(self.id)
    }

    fn with_id(&self, id: NodeId) -> SyntaxNode<'t> {
        SyntaxNode {
            tree: self.tree,
            id,
        }
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start_position();
        let end = self.end_position();
        write!(
            f,
            "{:?} [{}:{} - {}:{}] {:?}",
            self.kind(),
            start.row,
            start.column,
            end.row,
            end.column,
            self.text()
        )
    }
}

/// Incremental construction of a [`SyntaxTree`], driven by the grammar.
///
/// Interior nodes are opened, filled with children and closed; a closed
/// node ends where its last child ends, which keeps unterminated nodes
/// (a missing `)`) well formed.
pub(crate) struct TreeBuilder {
    source: String,
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub(crate) fn new(source: &str) -> Self {
        let root = NodeData {
            kind: NodeKind::Program,
            span: Span {
                start_byte: 0,
                end_byte: 0,
                start: Point::default(),
                end: Point::default(),
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            source: source.to_string(),
            nodes: vec![root],
            stack: vec![NodeId(0)],
        }
    }

    /// Open an interior node starting at `start` and make it the target of
    /// subsequent children.
    pub(crate) fn open(&mut self, kind: NodeKind, start: Span) {
        let id = self.push(kind, start);
        self.stack.push(id);
    }

    /// Close the innermost open node.
    pub(crate) fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(id) = self.stack.pop()
            && let Some(&last) = self.nodes[id.0].children.last()
        {
            let last_span = self.nodes[last.0].span;
            let span = &mut self.nodes[id.0].span;
            span.end_byte = last_span.end_byte;
            span.end = last_span.end;
        }
    }

    /// Append a leaf node covering `span` to the innermost open node.
    pub(crate) fn leaf(&mut self, kind: NodeKind, span: Span) {
        self.push(kind, span);
    }

    /// Close anything still open and seal the root so it covers the whole
    /// document up to `eof`.
    pub(crate) fn finish(mut self, eof: Point) -> SyntaxTree {
        while self.stack.len() > 1 {
            self.close();
        }
        let root = &mut self.nodes[0].span;
        root.end_byte = self.source.len();
        root.end = eof;

        SyntaxTree {
            source: self.source,
            nodes: self.nodes,
        }
    }

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        self.nodes.push(NodeData {
            kind,
            span,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(nodes: &[SyntaxNode<'_>]) -> Vec<NodeKind> {
        nodes.iter().map(|n| n.kind()).collect()
    }

    #[test]
    fn test_root_spans_whole_document() {
        let tree = SyntaxTree::parse("set(\"x\", 1)\n\n");
        let root = tree.root_node();
        assert_eq!(root.kind(), NodeKind::Program);
        assert_eq!(root.start_position(), Point::new(0, 0));
        assert_eq!(root.end_position(), Point::new(2, 0));
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_named_and_unnamed_children() {
        let tree = SyntaxTree::parse("set(\"x\", 1)");
        let call = tree.root_node().child(0).unwrap();
        assert_eq!(call.kind(), NodeKind::Call);
        assert_eq!(call.named_child(0).unwrap().text(), "set");

        let args = call.named_child(1).unwrap();
        assert_eq!(args.kind(), NodeKind::Arguments);
        assert_eq!(args.child_count(), 5);
        assert_eq!(args.named_child_count(), 2);
        assert_eq!(args.child(0).unwrap().text(), "(");
        assert_eq!(args.named_child(0).unwrap().text(), "\"x\"");
        assert_eq!(args.named_child(1).unwrap().text(), "1");
        assert_eq!(args.parent(), Some(call));
    }

    #[test]
    fn test_descendants_of_kind_in_document_order() {
        let tree = SyntaxTree::parse("a(b(\"1\"), c(\"2\"))\nd()");
        let calls = tree.root_node().descendants_of_kind(NodeKind::Call);
        let names: Vec<&str> = calls
            .iter()
            .map(|c| c.named_child(0).unwrap().text())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_node_for_point_finds_smallest_node() {
        let tree = SyntaxTree::parse("get(\"name\")");
        let node = tree.node_for_point(Point::new(0, 6));
        assert_eq!(node.kind(), NodeKind::String);
        assert_eq!(node.text(), "\"name\"");

        let callee = tree.node_for_point(Point::new(0, 1));
        assert_eq!(callee.kind(), NodeKind::Identifier);
    }

    #[test]
    fn test_node_for_point_prefers_string_at_its_end() {
        // Caret between the closing quote and `)`.
        let tree = SyntaxTree::parse("get(\"x\")");
        let node = tree.node_for_point(Point::new(0, 7));
        assert_eq!(node.kind(), NodeKind::String);
    }

    #[test]
    fn test_node_for_point_outside_content_falls_back_to_root() {
        let tree = SyntaxTree::parse("set(\"x\", 1)\n");
        assert_eq!(tree.node_for_point(Point::new(40, 3)), tree.root_node());
        assert_eq!(tree.node_for_point(Point::new(0, 40)), tree.root_node());
    }

    #[test]
    fn test_errors_collects_error_nodes() {
        let tree = SyntaxTree::parse("set(\"x\" @ 1) ) ok");
        assert_eq!(kinds(&tree.errors()), vec![NodeKind::Error, NodeKind::Error]);
        let texts: Vec<&str> = tree.errors().iter().map(|n| n.text()).collect();
        assert_eq!(texts, vec!["@", ")"]);
    }
}
