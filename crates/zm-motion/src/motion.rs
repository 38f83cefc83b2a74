//! The motion engine.
//!
//! [`MotionEngine::compute`] resolves one [`MotionRequest`] against a
//! [`BufferView`]. It is a pure function of the buffer, the request and the
//! engine's options: nothing is cached here except segmentation, and the
//! buffer is never touched.
//!
//! Dispatch is a table over motion family and context:
//!
//! | Family | Normal         | Visual              | Operator-pending                         |
//! |--------|----------------|---------------------|------------------------------------------|
//! | `w`    | `next_start`   | `next_start_visual` | `change_word` for `c`, else `next_start_pending` |
//! | `e`    | `next_end`     | `next_end_visual`   | `next_end`, `d` checks linewise          |
//! | `b`    | `prev_start`   | `prev_start`        | `prev_start`                             |
//! | `ge`   | `prev_end`     | `prev_end`          | `prev_end_delete` for `d`, else `prev_end` |

use std::fmt;
use std::str::FromStr;

use zm_segment::Tokenize;

use crate::buffer::BufferView;
use crate::error::MotionError;
use crate::mode::{Context, Operator, VisualKind};
use crate::options::MotionOptions;
use crate::position::{Position, Range};
use crate::preview::{Preview, PreviewLimit, PreviewStep, display_col};
use crate::span::LineSpans;
use crate::word::{self, Hop};

// ---------------------------------------------------------------------------
// MotionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    /// `w`: start of the next word.
    W,
    /// `W`: start of the next WORD.
    BigW,
    /// `e`: end of the word.
    E,
    /// `E`: end of the WORD.
    BigE,
    /// `b`: start of the word, backward.
    B,
    /// `B`: start of the WORD, backward.
    BigB,
    /// `ge`: end of the previous word.
    Ge,
    /// `gE`: end of the previous WORD.
    BigGe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    NextStart,
    NextEnd,
    PrevStart,
    PrevEnd,
}

impl MotionKind {
    pub const ALL: [Self; 8] = [
        Self::W,
        Self::BigW,
        Self::E,
        Self::BigE,
        Self::B,
        Self::BigB,
        Self::Ge,
        Self::BigGe,
    ];

    /// The Vim key sequence.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::W => "w",
            Self::BigW => "W",
            Self::E => "e",
            Self::BigE => "E",
            Self::B => "b",
            Self::BigB => "B",
            Self::Ge => "ge",
            Self::BigGe => "gE",
        }
    }

    /// True for the WORD variants.
    #[inline]
    #[must_use]
    pub const fn is_big(self) -> bool {
        matches!(self, Self::BigW | Self::BigE | Self::BigB | Self::BigGe)
    }

    #[inline]
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(self, Self::W | Self::BigW | Self::E | Self::BigE)
    }

    /// `e` `E` `ge` `gE` include the char they land on.
    #[inline]
    #[must_use]
    pub const fn is_inclusive(self) -> bool {
        matches!(self, Self::E | Self::BigE | Self::Ge | Self::BigGe)
    }

    const fn family(self) -> Family {
        match self {
            Self::W | Self::BigW => Family::NextStart,
            Self::E | Self::BigE => Family::NextEnd,
            Self::B | Self::BigB => Family::PrevStart,
            Self::Ge | Self::BigGe => Family::PrevEnd,
        }
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for MotionKind {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| MotionError::UnknownMotion(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Request / result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionRequest {
    pub motion: MotionKind,
    pub count: usize,
    pub context: Context,
    pub start: Position,
}

impl MotionRequest {
    /// A normal-mode request with count 1.
    #[must_use]
    pub const fn new(motion: MotionKind, start: Position) -> Self {
        Self {
            motion,
            count: 1,
            context: Context::Normal,
            start,
        }
    }

    #[must_use]
    pub const fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub const fn context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionResult {
    /// Destination.
    pub pos: Position,
    /// The consumer should include the char at `pos`.
    pub inclusive: bool,
    /// Fewer than `count` stops were available.
    pub clamped: bool,
    /// A `d` over this motion deletes whole lines.
    pub linewise: bool,
    /// The pending operator must be cancelled without effect.
    pub abort: bool,
    /// Operator span or visual selection, ordered and half-open. `None` in
    /// normal mode and when `abort` is set.
    pub span: Option<Range>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Word motions over a tokenizer.
#[derive(Debug, Clone, Default)]
pub struct MotionEngine<T> {
    tokenizer: T,
    options: MotionOptions,
}

struct Resolved {
    hop: Hop,
    inclusive: bool,
    linewise: bool,
    abort: bool,
}

impl Resolved {
    const fn plain(hop: Hop, inclusive: bool) -> Self {
        Self {
            hop,
            inclusive,
            linewise: false,
            abort: false,
        }
    }
}

impl<T: Tokenize> MotionEngine<T> {
    #[must_use]
    pub const fn new(tokenizer: T, options: MotionOptions) -> Self {
        Self { tokenizer, options }
    }

    #[must_use]
    pub const fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    #[must_use]
    pub const fn options(&self) -> &MotionOptions {
        &self.options
    }

    pub const fn options_mut(&mut self) -> &mut MotionOptions {
        &mut self.options
    }

    /// Resolve a motion.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidCount`] for a zero count,
    /// [`MotionError::PositionOutOfBounds`] when the start or the visual
    /// anchor is not in the buffer (one past the end of a line is fine), and
    /// [`MotionError::LinewiseVisual`] for `V` mode.
    pub fn compute<B: BufferView + ?Sized>(&self, buffer: &B, req: &MotionRequest) -> Result<MotionResult, MotionError> {
        if req.count == 0 {
            return Err(MotionError::InvalidCount(req.count));
        }
        match req.context {
            Context::Visual {
                kind: VisualKind::Line,
                ..
            } => return Err(MotionError::LinewiseVisual),
            Context::Visual { anchor, .. } => check_in_bounds(buffer, anchor)?,
            Context::Normal | Context::OperatorPending(_) => {}
        }
        check_in_bounds(buffer, req.start)?;

        let lines = LineSpans::new(buffer, &self.tokenizer, req.motion.is_big());
        let Resolved {
            hop,
            inclusive,
            linewise,
            abort,
        } = Self::resolve(&lines, req);

        let pos = self.settle(buffer, hop.pos);
        let span = if abort {
            None
        } else {
            selection_span(buffer, req, pos, inclusive, linewise)
        };
        let result = MotionResult {
            pos,
            inclusive,
            clamped: hop.clamped,
            linewise,
            abort,
            span,
        };

        tracing::debug!(
            motion = %req.motion,
            count = req.count,
            context = %req.context,
            from = %req.start,
            to = %result.pos,
            clamped = result.clamped,
            "motion computed"
        );
        Ok(result)
    }

    /// [`compute`](Self::compute) without building a request.
    ///
    /// # Errors
    ///
    /// Same as [`compute`](Self::compute).
    pub fn compute_motion<B: BufferView + ?Sized>(
        &self,
        buffer: &B,
        pos: Position,
        motion: MotionKind,
        count: usize,
        context: Context,
    ) -> Result<MotionResult, MotionError> {
        self.compute(buffer, &MotionRequest::new(motion, pos).count(count).context(context))
    }

    fn resolve<B: BufferView + ?Sized>(lines: &LineSpans<'_, B, T>, req: &MotionRequest) -> Resolved {
        let (from, count) = (req.start, req.count);
        match (req.motion.family(), req.context) {
            (Family::NextStart, Context::Normal) => Resolved::plain(word::next_start(lines, from, count), false),
            (Family::NextStart, Context::Visual { .. }) => {
                Resolved::plain(word::next_start_visual(lines, from, count), true)
            }
            (Family::NextStart, Context::OperatorPending(Operator::Change)) => {
                let (hop, inclusive) = word::change_word(lines, from, count);
                Resolved::plain(hop, inclusive)
            }
            (Family::NextStart, Context::OperatorPending(_)) => {
                Resolved::plain(word::next_start_pending(lines, from, count), false)
            }
            (Family::NextEnd, Context::Normal) => Resolved::plain(word::next_end(lines, from, count), false),
            (Family::NextEnd, Context::Visual { .. }) => Resolved::plain(word::next_end_visual(lines, from, count), true),
            (Family::NextEnd, Context::OperatorPending(op)) => {
                let hop = word::next_end(lines, from, count);
                let linewise = op == Operator::Delete && word::is_linewise_delete(lines, from, hop.pos);
                Resolved {
                    hop,
                    inclusive: true,
                    linewise,
                    abort: false,
                }
            }
            (Family::PrevStart, ctx) => Resolved::plain(word::prev_start(lines, from, count), ctx.is_visual()),
            (Family::PrevEnd, Context::OperatorPending(Operator::Delete)) => {
                let (hop, abort) = word::prev_end_delete(lines, from, count);
                Resolved {
                    hop,
                    inclusive: true,
                    linewise: word::is_linewise_delete(lines, hop.pos, from),
                    abort,
                }
            }
            (Family::PrevEnd, ctx) => {
                Resolved::plain(word::prev_end(lines, from, count), !matches!(ctx, Context::Normal))
            }
        }
    }

    /// Pull a one-past-end column back onto the text unless `virtualedit`
    /// allows it.
    fn settle<B: BufferView + ?Sized>(&self, buffer: &B, pos: Position) -> Position {
        if self.options.virtualedit {
            return pos;
        }
        match buffer.line_len(pos.line) {
            Some(len) if len > 0 && pos.col >= len => pos.with_col(len - 1),
            _ => pos,
        }
    }

    /// Replay single normal-mode hops from `pos`, collecting where each one
    /// lands.
    ///
    /// # Errors
    ///
    /// [`MotionError::InvalidCount`] for `PreviewLimit::Count(0)` and
    /// [`MotionError::PositionOutOfBounds`] for a start outside the buffer.
    pub fn preview<B: BufferView + ?Sized>(
        &self,
        buffer: &B,
        pos: Position,
        motion: MotionKind,
        limit: PreviewLimit,
    ) -> Result<Preview, MotionError> {
        if limit == PreviewLimit::Count(0) {
            return Err(MotionError::InvalidCount(0));
        }
        check_in_bounds(buffer, pos)?;

        let mut steps = Vec::new();
        let mut cur = pos;
        loop {
            if let PreviewLimit::Count(n) = limit {
                if steps.len() >= n {
                    break;
                }
            }
            let hop = self.compute(buffer, &MotionRequest::new(motion, cur))?;
            if hop.pos == cur {
                break;
            }
            if limit == PreviewLimit::Line && hop.pos.line != pos.line {
                break;
            }
            let text = buffer.line(hop.pos.line).unwrap_or_default();
            steps.push(PreviewStep {
                pos: hop.pos,
                display_col: display_col(&text, hop.pos.col),
                clamped: hop.clamped,
            });
            if hop.clamped {
                break;
            }
            cur = hop.pos;
        }
        Ok(Preview {
            origin: pos,
            motion,
            steps,
        })
    }
}

fn check_in_bounds<B: BufferView + ?Sized>(buffer: &B, pos: Position) -> Result<(), MotionError> {
    if buffer.contains(pos) {
        Ok(())
    } else {
        Err(MotionError::PositionOutOfBounds {
            pos,
            line_count: buffer.line_count(),
        })
    }
}

/// The half-open range an operator or selection covers.
fn selection_span<B: BufferView + ?Sized>(
    buffer: &B,
    req: &MotionRequest,
    pos: Position,
    inclusive: bool,
    linewise: bool,
) -> Option<Range> {
    let anchor = match req.context {
        Context::Normal => return None,
        Context::OperatorPending(_) => req.start,
        Context::Visual { anchor, .. } => anchor,
    };
    let mut range = Range::ordered(anchor, pos);
    if linewise {
        range.start.col = 0;
        range.end.col = buffer.line_len(range.end.line).unwrap_or(0);
    } else if inclusive {
        let len = buffer.line_len(range.end.line).unwrap_or(0);
        range.end.col = (range.end.col + 1).min(len);
    }
    Some(range)
}

/// Resolve one motion with default options.
///
/// # Errors
///
/// Same as [`MotionEngine::compute`].
pub fn compute_motion<B, T>(
    tokenizer: &T,
    buffer: &B,
    pos: Position,
    motion: MotionKind,
    count: usize,
    context: Context,
) -> Result<MotionResult, MotionError>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    MotionEngine::new(tokenizer, MotionOptions::default()).compute_motion(buffer, pos, motion, count, context)
}

/// Preview one motion with default options.
///
/// # Errors
///
/// Same as [`MotionEngine::compute`].
pub fn preview_motion<B, T>(
    tokenizer: &T,
    buffer: &B,
    pos: Position,
    motion: MotionKind,
    limit: PreviewLimit,
) -> Result<Preview, MotionError>
where
    B: BufferView + ?Sized,
    T: Tokenize + ?Sized,
{
    MotionEngine::new(tokenizer, MotionOptions::default()).preview(buffer, pos, motion, limit)
}
