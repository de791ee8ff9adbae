//! Character cursor for traversing source code.
//!
//! Keeps a byte position plus the line/column derived from it so the lexer
//! doesn't need to re-scan for newlines when it wants to stamp a [`Span`]
//! on a token.

use emberc_util::Span;

pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Current character, or `'\0'` at end of input.
    pub fn current(&self) -> char {
        self.source[self.position..].chars().next().unwrap_or('\0')
    }

    pub fn advance(&mut self) {
        if let Some(c) = self.source[self.position..].chars().next() {
            self.position += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn span_from(&self, start: usize, start_line: u32, start_column: u32) -> Span {
        Span::new(start as u32, self.position as u32, start_line, start_column)
    }

    /// Slice of source between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.source[start..end]
    }
}
