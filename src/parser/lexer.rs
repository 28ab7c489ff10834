/// Tokenizer for the DSL.
///
/// Comments (`// ...` and `# ...`) and whitespace are dropped here and
/// never reach the tree.  Anything the grammar has no token for becomes a
/// [`TokenKind::Unknown`] run so the parser can wrap it in an error node.
use crate::parser::tree::Span;
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    LParen,
    RParen,
    Comma,
    Semicolon,
    String,
    Number,
    Identifier,
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Split `source` into tokens.  Also returns the position just past the
/// last character, which the root node ends at.
pub(crate) fn tokenize(source: &str) -> (Vec<Token>, Point) {
    let mut cursor = Cursor {
        source,
        pos: 0,
        row: 0,
        line_start: 0,
    };
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        if ch.is_whitespace() {
            cursor.bump();
            continue;
        }
        if ch == '#' || (ch == '/' && cursor.peek_second() == Some('/')) {
            cursor.skip_line();
            continue;
        }

        let start_byte = cursor.pos;
        let start = cursor.point();
        let kind = match ch {
            '(' => cursor.single(TokenKind::LParen),
            ')' => cursor.single(TokenKind::RParen),
            ',' => cursor.single(TokenKind::Comma),
            ';' => cursor.single(TokenKind::Semicolon),
            '"' | '\'' => cursor.string(ch),
            c if c.is_ascii_digit() => cursor.number(),
            '-' if cursor.peek_second().is_some_and(|c| c.is_ascii_digit()) => cursor.number(),
            c if c.is_alphabetic() || c == '_' => cursor.identifier(),
            _ => cursor.unknown(),
        };

        tokens.push(Token {
            kind,
            span: Span {
                start_byte,
                end_byte: cursor.pos,
                start,
                end: cursor.point(),
            },
        });
    }

    (tokens, cursor.point())
}

struct Cursor<'s> {
    source: &'s str,
    pos: usize,
    row: usize,
    line_start: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.row += 1;
            self.line_start = self.pos;
        }
        Some(ch)
    }

    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
    }

    fn point(&self) -> Point {
        Point::new(self.row, self.pos - self.line_start)
    }

    fn skip_line(&mut self) {
        self.bump_while(|c| c != '\n');
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    /// A quoted literal.  An unterminated string stops at the end of the
    /// line so one stray quote does not swallow the rest of the file.
    fn string(&mut self, quote: char) -> TokenKind {
        self.bump();
        while let Some(ch) = self.peek() {
            match ch {
                '\n' => break,
                '\\' => {
                    self.bump();
                    if self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                c if c == quote => {
                    self.bump();
                    break;
                }
                _ => {
                    self.bump();
                }
            }
        }
        TokenKind::String
    }

    fn number(&mut self) -> TokenKind {
        self.bump();
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        TokenKind::Number
    }

    fn identifier(&mut self) -> TokenKind {
        self.bump_while(|c| c.is_alphanumeric() || c == '_');
        TokenKind::Identifier
    }

    fn unknown(&mut self) -> TokenKind {
        self.bump();
        while let Some(ch) = self.peek() {
            let starts_token = matches!(ch, '(' | ')' | ',' | ';' | '"' | '\'' | '#')
                || ch.is_alphanumeric()
                || ch == '_'
                || (ch == '/' && self.peek_second() == Some('/'));
            if ch.is_whitespace() || starts_token {
                break;
            }
            self.bump();
        }
        TokenKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).0.iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        tokenize(source)
            .0
            .iter()
            .map(|t| &source[t.span.start_byte..t.span.end_byte])
            .collect()
    }

    #[test]
    fn test_tokenize_binding_call() {
        use TokenKind::*;
        assert_eq!(
            kinds("set(\"x\", 1);"),
            vec![Identifier, LParen, String, Comma, Number, RParen, Semicolon]
        );
    }

    #[test]
    fn test_string_keeps_quotes_and_escapes() {
        assert_eq!(texts(r#"get("a\"b") 'c'"#), vec!["get", "(", r#""a\"b""#, ")", "'c'"]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let source = "get(\"oops\nset(\"x\", 1)";
        let (tokens, _) = tokenize(source);
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(&source[tokens[2].span.start_byte..tokens[2].span.end_byte], "\"oops");
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].span.start, Point::new(1, 0));
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(texts("// hi\nset # trailing\n(1)"), vec!["set", "(", "1", ")"]);
    }

    #[test]
    fn test_numbers_and_unknown_runs() {
        use TokenKind::*;
        assert_eq!(kinds("-2.5 + 3 @@"), vec![Number, Unknown, Number, Unknown]);
        assert_eq!(texts("-2.5 + 3 @@"), vec!["-2.5", "+", "3", "@@"]);
    }

    #[test]
    fn test_positions_use_byte_columns() {
        let (tokens, eof) = tokenize("é(\"x\")\n");
        assert_eq!(tokens[0].span.end, Point::new(0, 2));
        assert_eq!(tokens[2].span.start, Point::new(0, 3));
        assert_eq!(eof, Point::new(1, 0));
    }
}
