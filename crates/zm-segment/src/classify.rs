//! Character classification for segmentation.
//!
//! Every `char` maps to exactly one [`CharClass`]. The classifier is a pure,
//! total function: unassigned or unknown code points fall into
//! [`CharClass::Punct`] so they behave like non-word, non-blank characters.
//!
//! | Class       | Examples                    | Token category            |
//! |-------------|-----------------------------|---------------------------|
//! | `Ideograph` | `中` `〇` `⺈`               | `CjkWord` (via dictionary) |
//! | `CjkPunct`  | `，` `。` `「` `…` `—`      | `CjkPunct`                |
//! | `Letter`    | `a` `Z` `_` `é` `×` `ж`     | `LatinWord`               |
//! | `Digit`     | `0` `9` `٣`                 | `Number` / `LatinWord`    |
//! | `Punct`     | `.` `+` `(` `€`             | `AsciiPunct`              |
//! | `Space`     | ` ` `\t` U+3000             | `Whitespace`              |
//!
//! Full-width CJK punctuation is kept apart from its ASCII counterpart: the
//! plain `w` motion stops at the boundary between the two.

/// The class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// CJK ideographs, segmented with the dictionary.
    Ideograph,
    /// Full-width and CJK punctuation.
    CjkPunct,
    /// Letters and underscore (Vim `iskeyword`).
    Letter,
    /// Numeric characters.
    Digit,
    /// Any other non-blank character.
    Punct,
    /// Blanks, including the ideographic space.
    Space,
}

impl CharClass {
    /// True for letters and digits, which group into one keyword run.
    #[inline]
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(self, Self::Letter | Self::Digit)
    }
}

/// Classify a character.
#[must_use]
pub fn classify(ch: char) -> CharClass {
    if is_space(ch) {
        CharClass::Space
    } else if is_ideograph(ch) {
        CharClass::Ideograph
    } else if is_cjk_punct(ch) {
        CharClass::CjkPunct
    } else if ch.is_ascii_digit() {
        CharClass::Digit
    } else if ch.is_ascii_alphabetic() || ch == '_' {
        CharClass::Letter
    } else if ch.is_ascii() {
        CharClass::Punct
    } else if matches!(ch, '\u{c0}'..='\u{ff}') {
        // Vim's default `iskeyword` takes all of 192-255, `×` and `÷` included.
        CharClass::Letter
    } else if ch.is_numeric() {
        CharClass::Digit
    } else if ch.is_alphabetic() {
        CharClass::Letter
    } else {
        CharClass::Punct
    }
}

/// Blank characters. U+303F (ideographic half fill space) is drawn empty and
/// is treated as a blank too.
fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{3000}' | '\u{303f}') || ch.is_whitespace()
}

/// CJK ideographs and radicals.
#[must_use]
pub fn is_ideograph(ch: char) -> bool {
    matches!(
        ch,
        '\u{3007}'
            | '\u{4e00}'..='\u{9fff}'
            | '\u{3400}'..='\u{4dbf}'
            | '\u{f900}'..='\u{faff}'
            | '\u{20000}'..='\u{2a6df}'
            | '\u{2a700}'..='\u{2b73f}'
            | '\u{2b740}'..='\u{2b81f}'
            | '\u{2f800}'..='\u{2fa1f}'
            | '\u{2f00}'..='\u{2fd5}'
            | '\u{2e80}'..='\u{2ef3}'
    )
}

/// CJK and full-width punctuation.
#[must_use]
pub fn is_cjk_punct(ch: char) -> bool {
    match ch {
        // CJK symbols and punctuation, minus the blanks and 〇.
        '\u{3001}'..='\u{303e}' => ch != '\u{3007}',
        // Full-width ASCII variants: only the punctuation, letters and
        // digits fall through to the generic checks.
        '\u{ff01}'..='\u{ff60}' => !ch.is_alphanumeric(),
        // Half-width CJK punctuation.
        '\u{ff61}'..='\u{ff65}' => true,
        // Vertical forms, compatibility forms, small form variants.
        '\u{fe10}'..='\u{fe19}' | '\u{fe30}'..='\u{fe6b}' => true,
        // Dashes, curly quotes, ellipsis, hyphenation point, middle dot.
        '\u{2013}' | '\u{2014}' | '\u{2018}'..='\u{201f}' | '\u{2026}' | '\u{2027}' | '\u{00b7}' => {
            true
        }
        _ => false,
    }
}
