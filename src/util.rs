/// Utility functions for the SetLang language server.
///
/// This module contains the conversions between LSP positions (line +
/// UTF-16 character offset) and tree points (row + byte column), plus the
/// client logging helper.
use tower_lsp::lsp_types::*;

use crate::Backend;
use crate::types::Point;

/// The text of row `row`, without its trailing newline.
fn line_at(content: &str, row: usize) -> Option<&str> {
    content.split('\n').nth(row)
}

/// Convert an LSP `Position` into a tree [`Point`].
///
/// The character offset is clamped to the end of its line.  Lines past the
/// end of the document are passed through unchanged; such points lie
/// outside every node and resolve to the root.
pub fn point_for_position(content: &str, position: Position) -> Point {
    let row = position.line as usize;
    let Some(line) = line_at(content, row) else {
        return Point::new(row, position.character as usize);
    };

    let mut units = 0usize;
    for (byte, ch) in line.char_indices() {
        if units >= position.character as usize {
            return Point::new(row, byte);
        }
        units += ch.len_utf16();
    }
    Point::new(row, line.len())
}

/// Convert a tree [`Point`] into an LSP `Position`.
pub fn position_for_point(content: &str, point: Point) -> Position {
    let character = line_at(content, point.row)
        .map(|line| {
            let column = point.column.min(line.len());
            line.get(..column)
                .map(|prefix| prefix.encode_utf16().count())
                .unwrap_or(column)
        })
        .unwrap_or(point.column);

    Position {
        line: point.row as u32,
        character: character as u32,
    }
}

/// A zero-width range sitting at `position`.
pub fn caret_range(position: Position) -> Range {
    Range {
        start: position,
        end: position,
    }
}

impl Backend {
    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }
}
