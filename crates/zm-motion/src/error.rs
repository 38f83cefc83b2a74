//! Motion engine errors.
//!
//! Reaching the start or end of the buffer is never an error: the motion is
//! clamped and flagged instead. These variants cover requests that make no
//! sense at all.

use thiserror::Error;

use crate::position::Position;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// A count of zero.
    #[error("count must be at least 1, got {0}")]
    InvalidCount(usize),

    /// The start or anchor names no line, or a column beyond the end of its line.
    #[error("position {pos} is outside the buffer ({line_count} lines)")]
    PositionOutOfBounds { pos: Position, line_count: usize },

    /// `V` mode has no use for word motions.
    #[error("word motions are not supported in linewise visual mode")]
    LinewiseVisual,

    /// A key that names none of the eight motions.
    #[error("unknown motion {0:?}")]
    UnknownMotion(String),

    /// Text that is not a 1-indexed `LINE:COL`.
    #[error("invalid position {0:?}, expected LINE:COL")]
    InvalidPosition(String),
}
