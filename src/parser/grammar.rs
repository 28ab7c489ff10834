/// Recursive-descent parser turning tokens into a [`SyntaxTree`].
///
/// ```text
/// program    := (expression | ';' | ERROR)*
/// expression := call | string | number | identifier | '(' expression ')'
/// call       := identifier arguments
/// arguments  := '(' [expression (',' expression)* [',']] ')'
/// ```
///
/// The parser never fails.  Tokens that fit nowhere become error leaves,
/// and a list missing its `)` is closed at the next `;` or at end of input.
/// Lists nest at most [`MAX_DEPTH`] deep; an opening `(` past that limit
/// becomes an error leaf and its contents stay in the enclosing list.
use crate::parser::lexer::{Token, TokenKind, tokenize};
use crate::parser::tree::{SyntaxTree, TreeBuilder};
use crate::types::NodeKind;

/// Deepest allowed nesting of argument lists and parenthesised
/// expressions.  Keeps the recursion well inside a worker thread's stack.
pub(crate) const MAX_DEPTH: usize = 256;

pub(crate) fn parse(source: &str) -> SyntaxTree {
    let (tokens, eof) = tokenize(source);
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        builder: TreeBuilder::new(source),
    };
    parser.program();
    parser.builder.finish(eof)
}

fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier | TokenKind::String | TokenKind::Number | TokenKind::LParen
    )
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Number of lists currently open.
    depth: usize,
    builder: TreeBuilder,
}

impl Parser {
    fn peek(&self) -> Option<TokenKind> {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + n).map(|t| t.kind)
    }

    /// Consume the current token as a leaf of the given kind.
    fn bump_as(&mut self, kind: NodeKind) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.leaf(kind, token.span);
            self.pos += 1;
        }
    }

    fn open_at_current(&mut self, kind: NodeKind) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.open(kind, token.span);
        }
    }

    fn program(&mut self) {
        while let Some(kind) = self.peek() {
            match kind {
                TokenKind::Semicolon => self.bump_as(NodeKind::Punctuation),
                k if starts_expression(k) => self.expression(),
                _ => self.bump_as(NodeKind::Error),
            }
        }
    }

    fn expression(&mut self) {
        if self.depth >= MAX_DEPTH {
            self.flat_expression();
            return;
        }
        match self.peek() {
            Some(TokenKind::Identifier) if self.peek_nth(1) == Some(TokenKind::LParen) => {
                self.call()
            }
            Some(TokenKind::Identifier) => self.bump_as(NodeKind::Identifier),
            Some(TokenKind::String) => self.bump_as(NodeKind::String),
            Some(TokenKind::Number) => self.bump_as(NodeKind::Number),
            Some(TokenKind::LParen) => {
                self.open_at_current(NodeKind::Parenthesized);
                self.delimited(false);
                self.builder.close();
            }
            _ => {}
        }
    }

    /// An expression at the nesting limit.  Nothing new is opened: a
    /// callee stays a bare identifier and its `(` is an error.
    fn flat_expression(&mut self) {
        match self.peek() {
            Some(TokenKind::Identifier) => self.bump_as(NodeKind::Identifier),
            Some(TokenKind::String) => self.bump_as(NodeKind::String),
            Some(TokenKind::Number) => self.bump_as(NodeKind::Number),
            Some(_) => self.bump_as(NodeKind::Error),
            None => {}
        }
    }

    fn call(&mut self) {
        self.open_at_current(NodeKind::Call);
        self.bump_as(NodeKind::Identifier);
        self.open_at_current(NodeKind::Arguments);
        self.delimited(true);
        self.builder.close();
        self.builder.close();
    }

    /// Body of a parenthesised list, starting at its `(`.  The caller has
    /// already opened the node the children belong to.
    fn delimited(&mut self, allow_commas: bool) {
        self.bump_as(NodeKind::Punctuation);
        self.depth += 1;
        loop {
            match self.peek() {
                Some(TokenKind::RParen) => {
                    self.bump_as(NodeKind::Punctuation);
                    break;
                }
                Some(TokenKind::Comma) if allow_commas => self.bump_as(NodeKind::Punctuation),
                Some(TokenKind::Semicolon) | None => break,
                Some(k) if starts_expression(k) => self.expression(),
                Some(_) => self.bump_as(NodeKind::Error),
            }
        }
        self.depth -= 1;
    }
}
