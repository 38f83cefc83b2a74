//! Tokens, the output of segmentation.
//!
//! A token is a contiguous span of one line, measured in chars (never
//! bytes), tagged with a [`Category`]. The tokens of a line are contiguous,
//! non-overlapping, and cover the line exactly once.

use std::fmt;
use std::ops::Range;

/// The category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A word cut out of a run of CJK ideographs.
    CjkWord,
    /// A run of letters, possibly mixed with digits.
    LatinWord,
    /// A run of digits only.
    Number,
    /// A run of CJK / full-width punctuation.
    CjkPunct,
    /// A run of any other non-blank, non-word characters.
    AsciiPunct,
    /// A run of blanks.
    Whitespace,
}

impl Category {
    /// Short lowercase name, used by the command-line driver.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CjkWord => "cjk",
            Self::LatinWord => "latin",
            Self::Number => "number",
            Self::CjkPunct => "cjk-punct",
            Self::AsciiPunct => "punct",
            Self::Whitespace => "space",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A segment of a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Char column of the first char.
    pub start: usize,
    /// Char column one past the last char.
    pub end: usize,
    pub category: Category,
    pub text: String,
}

impl Token {
    #[must_use]
    pub fn new(start: usize, text: String, category: Category) -> Self {
        let end = start + text.chars().count();
        Self {
            start,
            end,
            category,
            text,
        }
    }

    /// Number of chars in the token. Never zero.
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Char columns covered by the token.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Column of the last char.
    #[inline]
    #[must_use]
    pub const fn last(&self) -> usize {
        self.end - 1
    }

    /// True for the categories the plain `w` family stops on.
    #[inline]
    #[must_use]
    pub const fn is_word(&self) -> bool {
        matches!(
            self.category,
            Category::CjkWord | Category::LatinWord | Category::Number
        )
    }

    /// True for CJK words and CJK punctuation.
    #[inline]
    #[must_use]
    pub const fn is_cjk(&self) -> bool {
        matches!(self.category, Category::CjkWord | Category::CjkPunct)
    }

    /// True for whitespace. Every other token is part of a non-blank run.
    #[inline]
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        matches!(self.category, Category::Whitespace)
    }

    /// True when `col` falls inside the token.
    #[inline]
    #[must_use]
    pub const fn contains(&self, col: usize) -> bool {
        self.start <= col && col < self.end
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.text, self.category)
    }
}

/// Index of the token covering `col`, or `None` when `col` lies past the
/// last token.
#[must_use]
pub fn index_at(tokens: &[Token], col: usize) -> Option<usize> {
    tokens
        .binary_search_by(|tok| {
            if col < tok.start {
                std::cmp::Ordering::Greater
            } else if col >= tok.end {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .ok()
}

/// True when `tokens` tile `line` exactly.
#[must_use]
pub fn covers(tokens: &[Token], line: &str) -> bool {
    let mut col = 0;
    let mut text = String::with_capacity(line.len());
    for tok in tokens {
        if tok.start != col || tok.end <= tok.start {
            return false;
        }
        col = tok.end;
        text.push_str(&tok.text);
    }
    text == line
}
