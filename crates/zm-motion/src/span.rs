//! Motion spans: tokens as the word motions see them.
//!
//! `w`-class motions treat every non-blank token as its own word, so
//! `你好，世界` is three words (`你好` `，` `世界`). `W`-class motions merge
//! runs of non-blank tokens and split only on whitespace, so the same line is
//! a single WORD.

use std::sync::Arc;

use zm_segment::{Token, Tokenize};

use crate::buffer::BufferView;

/// A stretch of one line: a word, or a run of blanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    /// False for whitespace.
    pub word: bool,
}

impl Span {
    #[inline]
    #[must_use]
    pub const fn last(self) -> usize {
        self.end - 1
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, col: usize) -> bool {
        self.start <= col && col < self.end
    }
}

/// Build the spans of one line. `big` selects `W`-class merging.
#[must_use]
pub fn spans(tokens: &[Token], big: bool) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::with_capacity(tokens.len());
    for tok in tokens {
        let word = !tok.is_blank();
        match out.last_mut() {
            Some(prev) if big && word && prev.word => prev.end = tok.end,
            _ => out.push(Span {
                start: tok.start,
                end: tok.end,
                word,
            }),
        }
    }
    out
}

/// Index of the span covering `col`, `None` past the last span.
#[must_use]
pub fn index_at(spans: &[Span], col: usize) -> Option<usize> {
    spans
        .binary_search_by(|s| {
            if col < s.start {
                std::cmp::Ordering::Greater
            } else if col >= s.end {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .ok()
}

/// Span lookup over a whole buffer.
pub struct LineSpans<'a, B: ?Sized, T: ?Sized> {
    buffer: &'a B,
    tokenizer: &'a T,
    big: bool,
}

impl<'a, B, T> LineSpans<'a, B, T>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    #[must_use]
    pub const fn new(buffer: &'a B, tokenizer: &'a T, big: bool) -> Self {
        Self {
            buffer,
            tokenizer,
            big,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Spans of `line`. Empty for an empty line or a line past the end.
    #[must_use]
    pub fn spans(&self, line: usize) -> Vec<Span> {
        self.buffer.line(line).map_or_else(Vec::new, |text| {
            let tokens: Arc<[Token]> = self.tokenizer.tokenize(&text);
            spans(&tokens, self.big)
        })
    }
}
