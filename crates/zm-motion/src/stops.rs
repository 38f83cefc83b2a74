//! Stop iterators: walk spans across lines from the cursor.
//!
//! Both directions start at the span under the cursor. When the cursor sits
//! past the last span of its line (column `len` of a non-empty line), the
//! forward walk starts on the next line and the backward walk on the line's
//! last span; neither first stop is then flagged `cursor`.
//!
//! An empty line produces one stop with `span == None`. Whether that counts
//! as a word is up to each motion.

use zm_segment::Tokenize;

use crate::buffer::BufferView;
use crate::position::Position;
use crate::span::{LineSpans, Span, index_at};

/// One step of a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop {
    pub line: usize,
    /// `None` for an empty line.
    pub span: Option<Span>,
    /// True for the span the cursor was on when the walk began.
    pub cursor: bool,
    /// True for the last span of its line (always true for an empty line).
    pub eol: bool,
}

impl Stop {
    /// First column, 0 on an empty line.
    #[inline]
    #[must_use]
    pub fn first(&self) -> usize {
        self.span.map_or(0, |s| s.start)
    }

    /// Last column, 0 on an empty line.
    #[inline]
    #[must_use]
    pub fn last(&self) -> usize {
        self.span.map_or(0, Span::last)
    }

    /// One past the last column, 0 on an empty line.
    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.span.map_or(0, |s| s.end)
    }

    /// True when the stop is a non-blank span.
    #[inline]
    #[must_use]
    pub fn is_word(&self) -> bool {
        self.span.is_some_and(|s| s.word)
    }

    /// True for a non-blank span or an empty line.
    #[inline]
    #[must_use]
    pub fn is_word_or_empty(&self) -> bool {
        self.span.is_none_or(|s| s.word)
    }

    #[inline]
    #[must_use]
    pub const fn at(&self, col: usize) -> Position {
        Position::new(self.line, col)
    }
}

// ---------------------------------------------------------------------------
// Forward
// ---------------------------------------------------------------------------

pub struct Forward<'l, 'a, B: ?Sized, T: ?Sized> {
    lines: &'l LineSpans<'a, B, T>,
    spans: Vec<Span>,
    idx: usize,
    line: usize,
    cursor: bool,
}

impl<'l, 'a, B, T> Forward<'l, 'a, B, T>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    #[must_use]
    pub fn new(lines: &'l LineSpans<'a, B, T>, from: Position) -> Self {
        let spans = lines.spans(from.line);
        let idx = index_at(&spans, from.col).unwrap_or(spans.len());
        let cursor = (from.col == 0 && spans.is_empty()) || idx < spans.len();
        Self {
            lines,
            spans,
            idx,
            line: from.line,
            cursor,
        }
    }

    fn take(&mut self) -> Stop {
        let span = self.spans[self.idx];
        let eol = self.idx + 1 == self.spans.len();
        self.idx += 1;
        Stop {
            line: self.line,
            span: Some(span),
            cursor: self.cursor,
            eol,
        }
    }

    const fn empty_line(&self) -> Stop {
        Stop {
            line: self.line,
            span: None,
            cursor: self.cursor,
            eol: true,
        }
    }
}

impl<B, T> Iterator for Forward<'_, '_, B, T>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    type Item = Stop;

    fn next(&mut self) -> Option<Stop> {
        let stop = if self.idx < self.spans.len() {
            Some(self.take())
        } else if self.cursor && self.spans.is_empty() && self.idx == 0 {
            Some(self.empty_line())
        } else if self.line + 1 < self.lines.line_count() {
            self.line += 1;
            self.spans = self.lines.spans(self.line);
            self.idx = 0;
            if self.spans.is_empty() {
                Some(self.empty_line())
            } else {
                Some(self.take())
            }
        } else {
            None
        };
        self.cursor = false;
        stop
    }
}

// ---------------------------------------------------------------------------
// Backward
// ---------------------------------------------------------------------------

pub struct Backward<'l, 'a, B: ?Sized, T: ?Sized> {
    lines: &'l LineSpans<'a, B, T>,
    spans: Vec<Span>,
    /// One past the next span to yield.
    idx: usize,
    line: usize,
    cursor: bool,
    first: bool,
}

impl<'l, 'a, B, T> Backward<'l, 'a, B, T>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    #[must_use]
    pub fn new(lines: &'l LineSpans<'a, B, T>, from: Position) -> Self {
        let spans = lines.spans(from.line);
        let found = index_at(&spans, from.col);
        let cursor = (from.col == 0 && spans.is_empty()) || found.is_some();
        let idx = found.map_or(spans.len(), |i| i + 1);
        Self {
            lines,
            spans,
            idx,
            line: from.line,
            cursor,
            first: true,
        }
    }

    fn take(&mut self) -> Stop {
        self.idx -= 1;
        Stop {
            line: self.line,
            span: Some(self.spans[self.idx]),
            cursor: self.cursor,
            eol: self.idx + 1 == self.spans.len(),
        }
    }

    const fn empty_line(&self) -> Stop {
        Stop {
            line: self.line,
            span: None,
            cursor: self.cursor,
            eol: true,
        }
    }
}

impl<B, T> Iterator for Backward<'_, '_, B, T>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    type Item = Stop;

    fn next(&mut self) -> Option<Stop> {
        let stop = if self.idx > 0 {
            Some(self.take())
        } else if self.first && self.spans.is_empty() {
            Some(self.empty_line())
        } else if self.line > 0 {
            self.line -= 1;
            self.spans = self.lines.spans(self.line);
            self.idx = self.spans.len();
            if self.spans.is_empty() {
                Some(self.empty_line())
            } else {
                Some(self.take())
            }
        } else {
            None
        };
        self.cursor = false;
        self.first = false;
        stop
    }
}
