/// 1-based line/column location in a source string.
///
/// Ordered by line, then column, so document order compares directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Start of a document: line 1, column 1.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(1, 1)
    }

    /// The position reached after consuming `text`.
    ///
    /// A newline moves to the next line and resets the column to 1; any
    /// other character advances the column by one. Columns count
    /// characters, not bytes, so UTF-8 continuation bytes do not advance.
    #[must_use]
    pub fn advanced(mut self, text: &str) -> Self {
        for byte in text.bytes() {
            if byte == b'\n' {
                self.line += 1;
                self.column = 1;
            } else if byte & 0xC0 != 0x80 {
                self.column += 1;
            }
        }
        self
    }
}

/// Half-open source span stamped on every node.
///
/// `start` points at the first character, `end` just past the last one;
/// `start <= end` always holds in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}
