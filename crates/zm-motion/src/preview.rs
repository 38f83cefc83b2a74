//! Motion previews: where repeated presses of a key would land.
//!
//! A preview replays single normal-mode hops and records each destination
//! together with its terminal column, so a renderer can mark the landing
//! spots on a line holding double-width CJK text. Nothing is moved.

use std::fmt;

use unicode_width::UnicodeWidthChar;

use crate::motion::MotionKind;
use crate::position::Position;

/// Tab stop used when converting to display columns.
pub const TAB_WIDTH: usize = 8;

/// How far a preview runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PreviewLimit {
    /// At most `n` steps.
    Count(usize),
    /// Until a hop leaves the starting line.
    #[default]
    Line,
}

impl PreviewLimit {
    /// From the `previewlimit` option: 0 means the current line.
    #[must_use]
    pub const fn from_option(value: usize) -> Self {
        if value == 0 { Self::Line } else { Self::Count(value) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewStep {
    pub pos: Position,
    /// Terminal column of `pos` on its line.
    pub display_col: usize,
    /// The hop ran out of words; this is the last step.
    pub clamped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub origin: Position,
    pub motion: MotionKind,
    pub steps: Vec<PreviewStep>,
}

impl Preview {
    #[must_use]
    pub fn positions(&self) -> Vec<Position> {
        self.steps.iter().map(|s| s.pos).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {}:", self.motion, self.origin)?;
        for (i, step) in self.steps.iter().enumerate() {
            write!(f, " {}={} [{}]", i + 1, step.pos, step.display_col)?;
            if step.clamped {
                f.write_str("!")?;
            }
        }
        Ok(())
    }
}

/// Terminal column of char column `col` in `line`. Wide chars take two
/// cells, tabs run to the next [`TAB_WIDTH`] stop.
#[must_use]
pub fn display_col(line: &str, col: usize) -> usize {
    let mut cells = 0;
    for ch in line.chars().take(col) {
        match ch {
            '\t' => cells = (cells / TAB_WIDTH + 1) * TAB_WIDTH,
            _ => cells += ch.width().unwrap_or(0),
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use zm_segment::{Dictionary, Segmenter};

    use crate::motion::MotionEngine;
    use crate::options::MotionOptions;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    fn engine() -> MotionEngine<Segmenter> {
        let dict = Dictionary::from_entries([("我", 100), ("爱", 50), ("北京", 40), ("天安门", 20)]);
        MotionEngine::new(Segmenter::new(Arc::new(dict)), MotionOptions::default())
    }

    #[test]
    fn display_col_counts_wide_chars() {
        assert_eq!(display_col("我爱北京", 0), 0);
        assert_eq!(display_col("我爱北京", 2), 4);
        assert_eq!(display_col("ab北京cd", 5), 7);
        assert_eq!(display_col("\tx", 1), 8);
        assert_eq!(display_col("ab", 10), 2);
    }

    #[test]
    fn display_col_mixes_tabs_and_combining_marks_with_wide_chars() {
        assert_eq!(display_col("a\t北x", 3), 10);
        assert_eq!(display_col("北\tx", 2), 8);
        assert_eq!(display_col("e\u{301}北京", 3), 3);
        assert_eq!(display_col("e\u{301}北京", 4), 5);
    }

    #[test]
    fn limit_from_option() {
        assert_eq!(PreviewLimit::from_option(0), PreviewLimit::Line);
        assert_eq!(PreviewLimit::from_option(3), PreviewLimit::Count(3));
    }

    #[test]
    fn line_preview_of_w() {
        let buf = ["我爱北京天安门", "next"];
        let pv = engine().preview(&buf, p(0, 0), MotionKind::W, PreviewLimit::Line).unwrap();
        assert_eq!(pv.positions(), vec![p(0, 1), p(0, 2), p(0, 4)]);
        let cols: Vec<_> = pv.steps.iter().map(|s| s.display_col).collect();
        assert_eq!(cols, vec![2, 4, 8]);
        assert!(pv.steps.iter().all(|s| !s.clamped));
    }

    #[test]
    fn count_preview_crosses_lines() {
        let buf = ["我爱北京天安门", "next"];
        let pv = engine().preview(&buf, p(0, 0), MotionKind::W, PreviewLimit::Count(4)).unwrap();
        assert_eq!(pv.positions(), vec![p(0, 1), p(0, 2), p(0, 4), p(1, 0)]);
        let pv = engine().preview(&buf, p(0, 0), MotionKind::W, PreviewLimit::Count(2)).unwrap();
        assert_eq!(pv.positions(), vec![p(0, 1), p(0, 2)]);
    }

    #[test]
    fn clamped_hop_ends_preview() {
        let buf = ["foo bar"];
        let pv = engine().preview(&buf, p(0, 0), MotionKind::W, PreviewLimit::Count(5)).unwrap();
        assert_eq!(
            pv.steps,
            vec![
                PreviewStep {
                    pos: p(0, 4),
                    display_col: 4,
                    clamped: false,
                },
                PreviewStep {
                    pos: p(0, 6),
                    display_col: 6,
                    clamped: true,
                },
            ]
        );
    }

    #[test]
    fn stuck_hop_ends_preview() {
        let pv = engine().preview(&["foo"], p(0, 0), MotionKind::B, PreviewLimit::Count(3)).unwrap();
        assert!(pv.is_empty());
    }

    #[test]
    fn backward_preview() {
        let buf = ["我爱北京天安门"];
        let pv = engine().preview(&buf, p(0, 6), MotionKind::B, PreviewLimit::Line).unwrap();
        assert_eq!(pv.positions(), vec![p(0, 4), p(0, 2), p(0, 1), p(0, 0)]);
        assert_eq!(pv.to_string(), "b from 1:7: 1=1:5 [8] 2=1:3 [4] 3=1:2 [2] 4=1:1 [0]");
    }

    #[test]
    fn preview_validates_start() {
        assert!(engine().preview(&["foo"], p(3, 0), MotionKind::W, PreviewLimit::Line).is_err());
    }
}
