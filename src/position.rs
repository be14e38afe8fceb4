//! Line/column/offset bookkeeping shared by the tokenizer and the emitter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of columns a tab character advances.
pub const TAB_WIDTH: usize = 4;

/// A location in a properties document.
///
/// Lines and columns are 1-based, the offset counts characters from the
/// start of the input and is 0-based.
///
/// # Examples
///
/// ```rust
/// use propstream::Position;
///
/// let mut pos = Position::new();
/// pos.advance_column(1);
/// pos.advance_line();
/// assert_eq!((pos.line, pos.column, pos.offset), (2, 1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    /// Returns the position of the first character of a document.
    #[must_use]
    pub const fn new() -> Self {
        Position {
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Moves past one character occupying `width` columns.
    pub fn advance_column(&mut self, width: usize) {
        self.column += width;
        self.offset += 1;
    }

    /// Moves past a line terminator.
    pub fn advance_line(&mut self) {
        self.line += 1;
        self.column = 1;
        self.offset += 1;
    }

    /// Moves the offset only, used for the `\r` half of a `\r\n` pair.
    pub(crate) fn advance_offset(&mut self) {
        self.offset += 1;
    }

    /// Moves past `ch`, treating `\n` as a line break and `\t` as a tab stop.
    ///
    /// A lone `\r` is not handled here because whether it ends a line
    /// depends on the character after it.
    pub(crate) fn advance_char(&mut self, ch: char) {
        match ch {
            '\n' => self.advance_line(),
            '\t' => self.advance_column(TAB_WIDTH),
            _ => self.advance_column(1),
        }
    }

    pub fn reset(&mut self) {
        *self = Position::new();
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}
