//! Line segmentation.
//!
//! A line is first partitioned into maximal runs of one *run class*:
//!
//! | Run        | Chars                    | Tokens                         |
//! |------------|--------------------------|--------------------------------|
//! | CJK        | ideographs               | one `CjkWord` per DAG edge     |
//! | keyword    | letters and digits       | one `Number` or `LatinWord`    |
//! | CJK punct  | full-width punctuation   | one `CjkPunct`                 |
//! | punct      | everything else          | one `AsciiPunct`               |
//! | blank      | whitespace               | one `Whitespace`               |
//!
//! CJK runs are cut by building a DAG over char positions (an edge for every
//! dictionary word found by prefix enumeration, plus a single-char fallback
//! edge) and picking the maximum-score path with a right-to-left DP.

use std::fmt;
use std::sync::Arc;

use crate::classify::{CharClass, classify};
use crate::dictionary::Dictionary;
use crate::token::{Category, Token, covers};

/// Scores closer than this are ties; ties go to the longer edge.
const TIE_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Scoring strategy for DAG edges. Higher is better; a path scores the sum
/// of its edges.
pub trait Scorer: fmt::Debug + Send + Sync {
    /// Score one edge. `freq` is the dictionary frequency of the edge's word,
    /// or `None` for a single-char fallback edge. `total` is the dictionary
    /// total.
    fn score(&self, freq: Option<u64>, total: u64) -> f64;
}

/// Log-probability scoring: `ln(freq) - ln(total)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogFrequency {
    /// Frequency assumed for chars missing from the dictionary.
    pub unknown_freq: u64,
}

impl LogFrequency {
    #[must_use]
    pub const fn new(unknown_freq: u64) -> Self {
        Self { unknown_freq }
    }
}

impl Default for LogFrequency {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Scorer for LogFrequency {
    #[allow(clippy::cast_precision_loss)]
    fn score(&self, freq: Option<u64>, total: u64) -> f64 {
        let freq = freq.unwrap_or(self.unknown_freq).max(1) as f64;
        freq.ln() - (total.max(1) as f64).ln()
    }
}

// ---------------------------------------------------------------------------
// DAG + DP
// ---------------------------------------------------------------------------

/// Best cut of a run of chars, as a list of edge lengths summing to
/// `chars.len()`.
pub(crate) fn best_cut(chars: &[char], dict: &Dictionary, scorer: &dyn Scorer) -> Vec<usize> {
    let n = chars.len();
    let total = dict.total();
    // best[i] = (score of the best path from i to n, length of its first edge)
    let mut best: Vec<(f64, usize)> = vec![(0.0, 0); n + 1];

    for i in (0..n).rev() {
        let matches = dict.matches(&chars[i..]);
        let single = matches.first().filter(|&&(len, _)| len == 1).map(|&(_, f)| f);
        let mut choice = (scorer.score(single, total) + best[i + 1].0, 1);
        for &(len, freq) in matches.iter().filter(|&&(len, _)| len > 1) {
            let score = scorer.score(Some(freq), total) + best[i + len].0;
            if score + TIE_EPSILON >= choice.0 {
                choice = (score, len);
            }
        }
        best[i] = choice;
    }

    let mut cut = Vec::new();
    let mut i = 0;
    while i < n {
        let len = best[i].1;
        cut.push(len);
        i += len;
    }
    cut
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunClass {
    Cjk,
    Keyword,
    CjkPunct,
    Punct,
    Blank,
}

const fn run_class(class: CharClass) -> RunClass {
    match class {
        CharClass::Ideograph => RunClass::Cjk,
        CharClass::Letter | CharClass::Digit => RunClass::Keyword,
        CharClass::CjkPunct => RunClass::CjkPunct,
        CharClass::Punct => RunClass::Punct,
        CharClass::Space => RunClass::Blank,
    }
}

fn push_run(tokens: &mut Vec<Token>, start: usize, run: &[char], class: RunClass, dict: &Dictionary, scorer: &dyn Scorer) {
    let category = match class {
        RunClass::Cjk => {
            let mut col = start;
            let cut = best_cut(run, dict, scorer);
            tracing::trace!(run = %run.iter().collect::<String>(), ?cut, "segmented cjk run");
            for len in cut {
                let text: String = run[col - start..col - start + len].iter().collect();
                tokens.push(Token::new(col, text, Category::CjkWord));
                col += len;
            }
            return;
        }
        RunClass::Keyword if run.iter().all(|&c| classify(c) == CharClass::Digit) => Category::Number,
        RunClass::Keyword => Category::LatinWord,
        RunClass::CjkPunct => Category::CjkPunct,
        RunClass::Punct => Category::AsciiPunct,
        RunClass::Blank => Category::Whitespace,
    };
    tokens.push(Token::new(start, run.iter().collect(), category));
}

/// Segment `line` with an explicit scorer.
#[must_use]
pub fn segment_with(line: &str, dict: &Dictionary, scorer: &dyn Scorer) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut run_start = 0;

    for i in 1..=chars.len() {
        let class = run_class(classify(chars[run_start]));
        if i == chars.len() || run_class(classify(chars[i])) != class {
            push_run(&mut tokens, run_start, &chars[run_start..i], class, dict, scorer);
            run_start = i;
        }
    }

    debug_assert!(covers(&tokens, line), "tokens do not cover {line:?}");
    tokens
}

/// Segment `line` with the default [`LogFrequency`] scoring.
#[must_use]
pub fn segment(line: &str, dict: &Dictionary) -> Vec<Token> {
    segment_with(line, dict, &LogFrequency::default())
}

// ---------------------------------------------------------------------------
// Segmenter
// ---------------------------------------------------------------------------

/// A dictionary bundled with a scoring strategy.
#[derive(Debug, Clone)]
pub struct Segmenter {
    dict: Arc<Dictionary>,
    scorer: Arc<dyn Scorer>,
}

impl Segmenter {
    /// Segmenter with [`LogFrequency`] scoring.
    #[must_use]
    pub fn new(dict: Arc<Dictionary>) -> Self {
        Self::with_scorer(dict, LogFrequency::default())
    }

    #[must_use]
    pub fn with_scorer(dict: Arc<Dictionary>, scorer: impl Scorer + 'static) -> Self {
        Self {
            dict,
            scorer: Arc::new(scorer),
        }
    }

    #[must_use]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    #[must_use]
    pub fn segment(&self, line: &str) -> Vec<Token> {
        segment_with(line, &self.dict, self.scorer.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use crate::dictionary::{DEFAULT_DICT, build_dictionary};

    fn scenario_dict() -> Dictionary {
        Dictionary::from_entries([("我", 100), ("爱", 50), ("北京", 40), ("天安门", 20)])
    }

    fn texts(tokens: &[Token]) -> Vec<(&str, Category)> {
        tokens.iter().map(|t| (t.text.as_str(), t.category)).collect()
    }

    #[derive(Debug)]
    struct Flat;

    impl Scorer for Flat {
        fn score(&self, _freq: Option<u64>, _total: u64) -> f64 {
            0.0
        }
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert!(segment("", &scenario_dict()).is_empty());
    }

    #[test]
    fn chinese_sentence_cuts_on_dictionary_words() {
        let tokens = segment("我爱北京天安门", &scenario_dict());
        assert_eq!(
            texts(&tokens),
            vec![
                ("我", Category::CjkWord),
                ("爱", Category::CjkWord),
                ("北京", Category::CjkWord),
                ("天安门", Category::CjkWord),
            ]
        );
        assert_eq!(tokens[3].cols(), 4..7);
    }

    #[test]
    fn default_dictionary_cuts_the_same_sentence() {
        let dict = build_dictionary(DEFAULT_DICT, None).unwrap();
        let tokens = segment("我爱北京天安门", &dict);
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(words, vec!["我", "爱", "北京", "天安门"]);
    }

    #[test]
    fn mixed_latin_and_chinese() {
        let tokens = segment("hello北京world", &scenario_dict());
        assert_eq!(
            texts(&tokens),
            vec![
                ("hello", Category::LatinWord),
                ("北京", Category::CjkWord),
                ("world", Category::LatinWord),
            ]
        );
        assert_eq!(tokens[1].start, 5);
        assert_eq!(tokens[2].start, 7);
    }

    #[test]
    fn cjk_punct_splits_words() {
        let dict = Dictionary::from_entries([("你好", 10), ("世界", 10)]);
        let tokens = segment("你好，世界", &dict);
        assert_eq!(
            texts(&tokens),
            vec![
                ("你好", Category::CjkWord),
                ("，", Category::CjkPunct),
                ("世界", Category::CjkWord),
            ]
        );
    }

    #[test]
    fn keyword_runs_and_numbers() {
        let tokens = segment("abc123 42 x_y", &Dictionary::default());
        assert_eq!(
            texts(&tokens),
            vec![
                ("abc123", Category::LatinWord),
                (" ", Category::Whitespace),
                ("42", Category::Number),
                (" ", Category::Whitespace),
                ("x_y", Category::LatinWord),
            ]
        );
    }

    #[test]
    fn ascii_and_cjk_punct_are_separate_tokens() {
        let tokens = segment("a.,。b", &Dictionary::default());
        assert_eq!(
            texts(&tokens),
            vec![
                ("a", Category::LatinWord),
                (".,", Category::AsciiPunct),
                ("。", Category::CjkPunct),
                ("b", Category::LatinWord),
            ]
        );
    }

    #[test]
    fn unknown_ideographs_fall_back_to_single_chars() {
        let tokens = segment("龘靐", &Dictionary::default());
        assert_eq!(
            texts(&tokens),
            vec![("龘", Category::CjkWord), ("靐", Category::CjkWord)]
        );
    }

    #[test]
    fn frequency_decides_between_overlapping_words() {
        // 研究生命 -> 研究|生命 when 生命 is common, 研究生|命 otherwise.
        let common = Dictionary::from_entries([("研究", 100), ("研究生", 10), ("生命", 100), ("命", 5)]);
        let cut = best_cut(&"研究生命".chars().collect::<Vec<_>>(), &common, &LogFrequency::default());
        assert_eq!(cut, vec![2, 2]);

        let rare = Dictionary::from_entries([("研究", 10), ("研究生", 1000), ("生命", 1), ("命", 1000)]);
        let cut = best_cut(&"研究生命".chars().collect::<Vec<_>>(), &rare, &LogFrequency::default());
        assert_eq!(cut, vec![3, 1]);
    }

    #[test]
    fn ties_prefer_the_longer_edge() {
        let dict = Dictionary::from_entries([("北京", 1), ("北京大学", 1), ("大学生", 1), ("学生", 1)]);
        let cut = best_cut(&"北京大学生".chars().collect::<Vec<_>>(), &dict, &Flat);
        assert_eq!(cut, vec![4, 1]);
    }

    #[test]
    fn unknown_frequency_shifts_fallback_score() {
        let dict = Dictionary::from_entries([("天安", 2), ("天", 1000), ("安", 1000)]);
        let chars: Vec<char> = "天安".chars().collect();
        assert_eq!(best_cut(&chars, &dict, &LogFrequency::default()), vec![1, 1]);
        let lone = Dictionary::from_entries([("天安", 2), ("门", 1000)]);
        // Neither 天 nor 安 is known: the fallback scores 1/total each.
        assert_eq!(best_cut(&chars, &lone, &LogFrequency::default()), vec![2]);
        // A generous unknown frequency makes single chars win.
        assert_eq!(best_cut(&chars, &lone, &LogFrequency::new(1000)), vec![1, 1]);
    }

    #[test]
    fn segmenter_uses_its_scorer() {
        let dict = Arc::new(Dictionary::from_entries([("北京", 1), ("北京大学", 1), ("学生", 1)]));
        let flat = Segmenter::with_scorer(Arc::clone(&dict), Flat);
        let words: Vec<String> = flat.segment("北京大学生").into_iter().map(|t| t.text).collect();
        assert_eq!(words, vec!["北京大学", "生"]);
        assert_eq!(flat.dictionary().len(), 3);
    }

    proptest! {
        #[test]
        fn tokens_cover_any_line(line in any::<String>()) {
            let tokens = segment(&line, &scenario_dict());
            prop_assert!(covers(&tokens, &line));
        }

        #[test]
        fn tokens_cover_mixed_lines(line in "[a-z0-9 _.,，。！「」我爱北京天安门龘\\t\u{3000}]{0,32}") {
            let dict = scenario_dict();
            let tokens = segment(&line, &dict);
            prop_assert!(covers(&tokens, &line));
            prop_assert!(tokens.iter().all(|t| !t.text.is_empty()));
        }

        #[test]
        fn segmentation_is_deterministic(line in "[a-z 我爱北京天安门，]{0,24}") {
            let dict = scenario_dict();
            prop_assert_eq!(segment(&line, &dict), segment(&line, &dict));
        }
    }
}
