//! Word hops: the elementary algorithms behind `w` `e` `b` `ge`.
//!
//! Each hop walks [`Stop`]s and counts down the stops it accepts. Which stops
//! count depends on the motion and on who consumes it:
//!
//! | Hop                    | Keys             | Empty line a stop? | Lands on          |
//! |------------------------|------------------|--------------------|-------------------|
//! | [`next_start`]         | normal `w`       | yes                | first char        |
//! | [`next_start_visual`]  | visual `w`       | yes                | first char        |
//! | [`next_start_pending`] | `dw` `yw` ...    | yes                | first char / eol  |
//! | [`change_word`]        | `cw`             | depends on start   | last char         |
//! | [`next_end`]           | `e`              | no                 | last char         |
//! | [`next_end_visual`]    | visual `e`       | no                 | last char         |
//! | [`prev_start`]         | `b`              | yes                | first char        |
//! | [`prev_end`]           | `ge`             | yes                | last char         |
//!
//! `W` `E` `B` `gE` run the same hops over WORD spans.
//!
//! Columns equal to the line length ("one past the end") only come out of the
//! operator-pending and visual hops. Whether the caller may keep them is a
//! `virtualedit` decision made by the engine.

use zm_segment::Tokenize;

use crate::buffer::BufferView;
use crate::position::Position;
use crate::span::{LineSpans, index_at};
use crate::stops::{Backward, Forward};

/// Where a hop landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub pos: Position,
    /// The buffer ran out before `count` stops were found.
    pub clamped: bool,
}

impl Hop {
    const fn new(pos: Position, clamped: bool) -> Self {
        Self { pos, clamped }
    }
}

// ---------------------------------------------------------------------------
// Forward to word start
// ---------------------------------------------------------------------------

/// Normal-mode `w`: start of the next word. The span under the cursor never
/// counts; an empty line does.
pub fn next_start<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut it = Forward::new(lines, from).peekable();
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if stop.cursor || !stop.is_word_or_empty() {
            pos = stop.at(stop.last());
        } else {
            pos = stop.at(stop.first());
            count -= 1;
            if count > 0 && it.peek().is_none() {
                pos.col = stop.last();
            }
        }
    }
    Hop::new(pos, count > 0)
}

/// Visual `w`. Like [`next_start`], but running off the end of the buffer
/// lands one past the last char so the selection takes it in.
pub fn next_start_visual<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut it = Forward::new(lines, from).peekable();
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if stop.cursor || !stop.is_word_or_empty() {
            let col = if it.peek().is_some() { stop.last() } else { stop.end() };
            pos = stop.at(col);
        } else {
            pos = stop.at(stop.first());
            count -= 1;
            if count > 0 && it.peek().is_none() {
                pos.col = stop.end();
            }
        }
    }
    Hop::new(pos, count > 0)
}

/// Operator-pending `w`. An exclusive motion that would carry the operator
/// to column 0 of the next line stops at the end of the current line
/// instead.
pub fn next_start_pending<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut it = Forward::new(lines, from).peekable();
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if !stop.is_word_or_empty() {
            pos.line = stop.line;
            if it.peek().is_none() || (count == 1 && stop.eol) {
                pos.col = stop.end();
                count -= 1;
            } else {
                pos.col = stop.last();
            }
            continue;
        }
        if !stop.cursor {
            pos = stop.at(stop.first());
            count -= 1;
        }
        if count > 0 && it.peek().is_none() {
            pos.col = stop.end();
            count -= 1;
        } else if count == 1 && stop.eol && it.peek().is_some() {
            if stop.span.is_some() {
                pos.col = stop.end();
            } else if let Some(next) = it.next() {
                pos = next.at(next.first());
            }
            count -= 1;
        }
    }
    Hop::new(pos, count > 0)
}

/// `cw`. Starting on a non-blank it behaves like `ce` and the result is
/// inclusive (second value `true`); otherwise it is operator-pending `w`
/// with a slightly different end-of-line rule.
pub fn change_word<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> (Hop, bool)
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut it = Forward::new(lines, from).peekable();
    let mut ce_mode: Option<bool> = None;
    let mut on_word = false;

    while count > 0 {
        let Some(stop) = it.next() else { break };
        if *ce_mode.get_or_insert(stop.cursor && stop.is_word()) {
            if stop.is_word() {
                pos = stop.at(stop.last());
                on_word = true;
                count -= 1;
            } else {
                let col = if it.peek().is_none() { stop.end() } else { stop.last() };
                pos = stop.at(col);
                on_word = false;
            }
            continue;
        }

        if !stop.is_word_or_empty() {
            pos.line = stop.line;
            if it.peek().is_none() || (count == 1 && stop.eol) {
                pos.col = stop.end();
                count -= 1;
            } else {
                pos.col = stop.last();
            }
            continue;
        }
        if !stop.cursor {
            pos = stop.at(stop.first());
            count -= 1;
        }
        if count > 0 && it.peek().is_none() {
            pos.col = stop.end();
        } else if count == 1 && stop.eol {
            if let Some(next) = it.next() {
                pos = next.at(next.first());
                count -= 1;
            }
        }
    }
    (Hop::new(pos, count > 0), ce_mode == Some(true) && on_word)
}

// ---------------------------------------------------------------------------
// Forward to word end
// ---------------------------------------------------------------------------

/// `e`: last char of the current word, or of the next one when the cursor
/// is already there. Empty lines are skipped.
pub fn next_end<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut it = Forward::new(lines, from);
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if !stop.is_word() {
            pos = stop.at(stop.last());
        } else if !(stop.cursor && pos.col == stop.last()) {
            pos = stop.at(stop.last());
            count -= 1;
        }
    }
    Hop::new(pos, count > 0)
}

/// Visual `e`. Like [`next_end`], but with nothing left to reach it lands one
/// past the last char.
pub fn next_end_visual<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut clamped = false;
    let mut it = Forward::new(lines, from).peekable();
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if !stop.is_word() {
            let col = if it.peek().is_some() { stop.last() } else { stop.end() };
            pos = stop.at(col);
        } else if !(stop.cursor && pos.col == stop.last()) {
            pos = stop.at(stop.last());
            count -= 1;
            if count > 0 && it.peek().is_none() {
                pos.col = stop.end();
            }
        } else if it.peek().is_none() {
            pos.col = stop.end();
            count -= 1;
            clamped = true;
        }
    }
    Hop::new(pos, clamped || count > 0)
}

// ---------------------------------------------------------------------------
// Backward
// ---------------------------------------------------------------------------

/// `b`: first char of the current word, or of the previous one when the
/// cursor is already there. Empty lines count.
pub fn prev_start<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut it = Backward::new(lines, from);
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if !stop.is_word_or_empty() {
            pos = stop.at(stop.first());
        } else if !(stop.cursor && pos.col == stop.first()) {
            pos = stop.at(stop.first());
            count -= 1;
        }
    }
    Hop::new(pos, count > 0)
}

/// `ge` result before the `d` bookkeeping. The flag is set when the hop ran
/// out of words and fell back onto an empty first line.
fn prev_end_inner<B, T>(lines: &LineSpans<'_, B, T>, from: Position, mut count: usize) -> (Hop, bool)
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let mut pos = from;
    let mut fell_back = false;
    let mut on_empty = false;
    let mut it = Backward::new(lines, from).peekable();
    while count > 0 {
        let Some(stop) = it.next() else { break };
        if stop.cursor || !stop.is_word_or_empty() {
            pos = stop.at(stop.first());
        } else {
            pos = stop.at(stop.last());
            count -= 1;
            if it.peek().is_none() && count > 0 {
                pos.col = stop.first();
                count -= 1;
                fell_back = true;
                on_empty = stop.span.is_none();
            }
        }
    }
    (Hop::new(pos, fell_back || count > 0), on_empty)
}

/// `ge`: last char of the previous word. Empty lines count. With no
/// previous word it falls back to the first char of the buffer.
pub fn prev_end<B, T>(lines: &LineSpans<'_, B, T>, from: Position, count: usize) -> Hop
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    prev_end_inner(lines, from, count).0
}

/// `dge`. The second value asks the operator to do nothing: the cursor is
/// already at the start of the buffer, or the only thing before it is an
/// empty first line.
pub fn prev_end_delete<B, T>(lines: &LineSpans<'_, B, T>, from: Position, count: usize) -> (Hop, bool)
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    let at_start = from == Position::ZERO && count > 0;
    let (hop, on_empty) = prev_end_inner(lines, from, count);
    (hop, at_start || on_empty)
}

// ---------------------------------------------------------------------------
// d-special
// ---------------------------------------------------------------------------

/// True when a `d` over `from..=to` (inclusive, `from <= to`) becomes
/// linewise: the span crosses lines, only blanks precede `from` on its line
/// and only blanks follow `to` on its line.
pub fn is_linewise_delete<B, T>(lines: &LineSpans<'_, B, T>, from: Position, to: Position) -> bool
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    if from.line == to.line {
        return false;
    }

    let head = lines.spans(from.line);
    let i = index_at(&head, from.col).unwrap_or(head.len());
    if head[..i].iter().any(|s| s.word) {
        return false;
    }
    if head.get(i).is_some_and(|s| s.word && from.col > s.start) {
        return false;
    }

    let tail = lines.spans(to.line);
    if let Some(j) = index_at(&tail, to.col) {
        if tail[j + 1..].iter().any(|s| s.word) {
            return false;
        }
        if tail[j].word && to.col < tail[j].last() {
            return false;
        }
    }
    true
}
