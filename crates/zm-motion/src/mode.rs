//! The context a motion is consumed in.
//!
//! The same key lands in different places depending on who asked:
//!
//! | Context           | Consumer              | Result inclusive?          |
//! |-------------------|-----------------------|----------------------------|
//! | `Normal`          | cursor move           | never                      |
//! | `OperatorPending` | `d`, `c`, `y`, ...    | per motion (`e` yes, `w` no) |
//! | `Visual`          | selection extension   | always                     |

use std::fmt;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`
    Char,
    /// `V`
    Line,
    /// `Ctrl-V`
    Block,
}

impl VisualKind {
    /// Parse the key that enters the sub-mode. `b` stands in for `Ctrl-V`.
    #[must_use]
    pub const fn from_key(key: char) -> Option<Self> {
        match key {
            'v' => Some(Self::Char),
            'V' => Some(Self::Line),
            'b' | '\x16' => Some(Self::Block),
            _ => None,
        }
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("VISUAL"),
            Self::Line => f.write_str("VISUAL LINE"),
            Self::Block => f.write_str("VISUAL BLOCK"),
        }
    }
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// A pending operator. Only `d` and `c` change how word motions resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Delete,
    Change,
    Yank,
    Other(char),
}

impl Operator {
    #[must_use]
    pub const fn from_key(key: char) -> Self {
        match key {
            'd' => Self::Delete,
            'c' => Self::Change,
            'y' => Self::Yank,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn key(self) -> char {
        match self {
            Self::Delete => 'd',
            Self::Change => 'c',
            Self::Yank => 'y',
            Self::Other(key) => key,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    #[default]
    Normal,
    OperatorPending(Operator),
    /// Extending a selection that started at `anchor`.
    Visual {
        kind: VisualKind,
        anchor: crate::position::Position,
    },
}

impl Context {
    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual { .. })
    }

    #[inline]
    #[must_use]
    pub const fn operator(self) -> Option<Operator> {
        match self {
            Self::OperatorPending(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("NORMAL"),
            Self::OperatorPending(op) => write!(f, "OPERATOR {op}"),
            Self::Visual { kind, .. } => write!(f, "{kind}"),
        }
    }
}
