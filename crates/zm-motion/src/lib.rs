//! # zm-motion: Vim word motions over segmented text
//!
//! - **[`position`]**: `Position` (line, col) and `Range`, 0-indexed, char columns
//! - **[`buffer`]**: the read-only [`BufferView`] and a rope-backed [`Buffer`]
//! - **[`mode`]**: the [`Context`] a motion is consumed in
//! - **[`span`]** / **[`stops`]**: tokens regrouped as words and walked across lines
//! - **[`word`]**: the elementary `w` `e` `b` `ge` hops
//! - **[`motion`]**: [`MotionEngine`], dispatch and result flags
//! - **[`preview`]**: repeated hops with display columns
//! - **[`options`]**: `:set`-style [`MotionOptions`]

pub mod buffer;
pub mod error;
pub mod mode;
pub mod motion;
pub mod options;
pub mod position;
pub mod preview;
pub mod span;
pub mod stops;
pub mod word;

pub use buffer::{Buffer, BufferView};
pub use error::MotionError;
pub use mode::{Context, Operator, VisualKind};
pub use motion::{MotionEngine, MotionKind, MotionRequest, MotionResult, compute_motion, preview_motion};
pub use options::{MotionOptions, OptionError, SetDirective, parse_set};
pub use position::{Position, Range};
pub use preview::{Preview, PreviewLimit, PreviewStep, display_col};
