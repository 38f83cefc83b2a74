//! Read-only line access.
//!
//! The motion engine never owns text. It reads lines through [`BufferView`],
//! which is implemented for plain string collections (handy in tests and for
//! callers that already hold lines) and for the rope-backed [`Buffer`].
//!
//! Lines are handed out **without** their terminator. Columns are char
//! offsets, so the valid cursor columns of a line are `0..=line_len`.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::{Rope, RopeSlice};

use crate::position::Position;

/// Ordered, read-only lines.
pub trait BufferView {
    /// Number of lines. Never zero for a loaded buffer.
    fn line_count(&self) -> usize;

    /// Line `idx` without its terminator, or `None` past the end.
    fn line(&self, idx: usize) -> Option<Cow<'_, str>>;

    /// Char count of line `idx`.
    fn line_len(&self, idx: usize) -> Option<usize> {
        self.line(idx).map(|l| l.chars().count())
    }

    /// True when `pos` names a line and a column at most one past its end.
    fn contains(&self, pos: Position) -> bool {
        self.line_len(pos.line).is_some_and(|len| pos.col <= len)
    }
}

impl<B: BufferView + ?Sized> BufferView for &B {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn line(&self, idx: usize) -> Option<Cow<'_, str>> {
        (**self).line(idx)
    }
}

impl<S: AsRef<str>> BufferView for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, idx: usize) -> Option<Cow<'_, str>> {
        self.get(idx).map(|s| Cow::Borrowed(s.as_ref()))
    }
}

impl<S: AsRef<str>, const N: usize> BufferView for [S; N] {
    fn line_count(&self) -> usize {
        N
    }

    fn line(&self, idx: usize) -> Option<Cow<'_, str>> {
        self.as_slice().line(idx)
    }
}

impl<S: AsRef<str>> BufferView for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, idx: usize) -> Option<Cow<'_, str>> {
        self.as_slice().line(idx)
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a [`ropey::Rope`].
///
/// A trailing line break ends the last line; it does not open an extra empty
/// one, matching how Vim numbers the lines of a file.
#[derive(Debug, Clone)]
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
}

impl Buffer {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            path: None,
        }
    }

    /// Load a buffer from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
        })
    }

    #[inline]
    #[must_use]
    pub const fn rope(&self) -> &Rope {
        &self.rope
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Total char count, terminators included.
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }
}

/// Every char ropey ends a line on: LF, VT, FF, CR, NEL, LS and PS.
/// CRLF counts as one break.
const fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Strip the line break ending a rope line, if any.
fn strip_terminator(line: RopeSlice<'_>) -> RopeSlice<'_> {
    let total = line.len_chars();
    let cut = match (total.checked_sub(2).map(|i| line.char(i)), total.checked_sub(1).map(|i| line.char(i))) {
        (Some('\r'), Some('\n')) => 2,
        (_, Some(c)) if is_line_break(c) => 1,
        _ => 0,
    };
    line.slice(..total - cut)
}

impl BufferView for Buffer {
    fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        let ends_with_break = self
            .rope
            .len_chars()
            .checked_sub(1)
            .is_some_and(|i| is_line_break(self.rope.char(i)));
        if ends_with_break && lines > 1 { lines - 1 } else { lines }
    }

    fn line(&self, idx: usize) -> Option<Cow<'_, str>> {
        if idx >= self.line_count() {
            return None;
        }
        let line = strip_terminator(self.rope.line(idx));
        Some(line.as_str().map_or_else(|| Cow::Owned(line.to_string()), Cow::Borrowed))
    }

    fn line_len(&self, idx: usize) -> Option<usize> {
        if idx >= self.line_count() {
            return None;
        }
        Some(strip_terminator(self.rope.line(idx)).len_chars())
    }
}
