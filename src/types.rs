//! Data types used throughout the SetLang language server.
//!
//! This module contains the "model" types shared by the parser, the
//! definition engine and the diagnostics pass: tree coordinates
//! ([`Point`]), the closed set of syntax node kinds ([`NodeKind`]) and the
//! shape of a goto-definition answer ([`Definition`]).
use tower_lsp::lsp_types::{GotoDefinitionResponse, Location};

/// A zero-based `(row, column)` coordinate inside a document.
///
/// The column is measured in bytes from the start of the row, the same
/// convention tree-sitter uses.  Conversion to and from LSP positions
/// (UTF-16 code units) lives in [`crate::util`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Every kind of node the DSL parser produces.
///
/// The set is closed on purpose: the definition engine matches on these
/// variants instead of comparing type-name strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The document root.
    Program,
    /// `callee(arguments)`.  Named child 0 is the callee [`NodeKind::Identifier`],
    /// named child 1 is the [`NodeKind::Arguments`] list.
    Call,
    /// `( arg, arg, ... )`, including the delimiters as punctuation children.
    Arguments,
    /// A bare name such as `set` or `true`.
    Identifier,
    /// A quoted string literal.  Its text keeps the quotes.
    String,
    /// An integer or decimal literal.
    Number,
    /// `( expression )` outside of a call.
    Parenthesized,
    /// `(`, `)`, `,` or `;`.  The only unnamed kind.
    Punctuation,
    /// A token the grammar could not place.
    Error,
}

impl NodeKind {
    /// Whether nodes of this kind are semantically meaningful (tree-sitter's
    /// "named" nodes) as opposed to punctuation.
    pub fn is_named(self) -> bool {
        !matches!(self, NodeKind::Punctuation)
    }
}

/// The answer to a goto-definition query that found something.
///
/// "No definition" is expressed as `Option::None` by the callers, so this
/// enum only carries the two non-empty shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// The variable is bound by exactly one call.
    Single(Location),
    /// The variable is bound by several calls, in document order.
    Multiple(Vec<Location>),
}

impl Definition {
    /// All locations carried by this definition, in document order.
    pub fn locations(&self) -> &[Location] {
        match self {
            Definition::Single(location) => std::slice::from_ref(location),
            Definition::Multiple(locations) => locations,
        }
    }
}

impl From<Definition> for GotoDefinitionResponse {
    fn from(definition: Definition) -> Self {
        match definition {
            Definition::Single(location) => GotoDefinitionResponse::Scalar(location),
            Definition::Multiple(locations) => GotoDefinitionResponse::Array(locations),
        }
    }
}
