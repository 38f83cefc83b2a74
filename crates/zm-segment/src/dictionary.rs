//! Word dictionary: frequencies, totals and prefix lookup.
//!
//! A [`Dictionary`] is built once through a [`DictionaryBuilder`] and never
//! mutated afterwards. It answers two questions for the segmenter:
//!
//! - what is the frequency of this exact word, and
//! - which dictionary words start at this position ([`Dictionary::matches`]).
//!
//! # Source format
//!
//! One entry per line, whitespace separated:
//!
//! ```text
//! 北京 34488 ns
//! 天安门 6722 ns
//! 云计算
//! ```
//!
//! The frequency and tag are optional. An entry without a frequency (or with
//! frequency 0) gets a suggested frequency just large enough to beat the way
//! the dictionary would otherwise cut it. Later entries override earlier ones,
//! which is how a user dictionary is merged over the default one.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::segmenter::{self, LogFrequency};

/// The built-in default table, shipped with the crate.
pub const DEFAULT_DICT: &str = include_str!("../data/default.dict");

/// Errors produced while loading dictionary text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictError {
    /// The frequency column is not a non-negative integer.
    #[error("line {line}: invalid frequency {value:?}")]
    InvalidFrequency {
        /// 1-based line number within the source.
        line: usize,
        /// The offending column text.
        value: String,
    },
}

/// One dictionary word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Occurrence count. Always at least 1.
    pub freq: u64,
    /// Optional part-of-speech tag, carried through but unused.
    pub tag: Option<String>,
}

/// An immutable word → frequency table with a prefix index.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashMap<String, Entry>,
    /// Every non-empty prefix of every word, words included.
    prefixes: HashSet<String>,
    total: u64,
    /// Longest word, in chars.
    max_len: usize,
}

impl Dictionary {
    /// Start building a dictionary.
    #[must_use]
    pub fn builder() -> DictionaryBuilder {
        DictionaryBuilder::default()
    }

    /// Build a dictionary from `(word, freq)` pairs.
    #[must_use]
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let mut builder = Self::builder();
        for (word, freq) in entries {
            builder.add_word(word, Some(freq), None);
        }
        builder.build()
    }

    /// Frequency of `word`, if it is in the dictionary.
    #[inline]
    #[must_use]
    pub fn freq(&self, word: &str) -> Option<u64> {
        self.words.get(word).map(|e| e.freq)
    }

    /// The full entry for `word`.
    #[must_use]
    pub fn entry(&self, word: &str) -> Option<&Entry> {
        self.words.get(word)
    }

    /// True when `word` is a dictionary word.
    #[inline]
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// True when some dictionary word starts with `prefix`.
    #[inline]
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    /// Sum of all word frequencies.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of words.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when the dictionary has no words.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Length in chars of the longest word.
    #[inline]
    #[must_use]
    pub const fn max_word_len(&self) -> usize {
        self.max_len
    }

    /// Enumerate the dictionary words that are prefixes of `chars`, shortest
    /// first, as `(length in chars, frequency)`.
    #[must_use]
    pub fn matches(&self, chars: &[char]) -> Vec<(usize, u64)> {
        let mut found = Vec::new();
        let mut candidate = String::new();
        for (i, &ch) in chars.iter().enumerate().take(self.max_len) {
            candidate.push(ch);
            if !self.prefixes.contains(&candidate) {
                break;
            }
            if let Some(freq) = self.freq(&candidate) {
                found.push((i + 1, freq));
            }
        }
        found
    }

    fn insert(&mut self, word: &str, entry: Entry) {
        let mut prefix = String::with_capacity(word.len());
        for ch in word.chars() {
            prefix.push(ch);
            if !self.prefixes.contains(&prefix) {
                self.prefixes.insert(prefix.clone());
            }
        }
        self.max_len = self.max_len.max(word.chars().count());
        let freq = entry.freq;
        if let Some(old) = self.words.insert(word.to_string(), entry) {
            self.total = self.total.saturating_sub(old.freq);
        }
        // Saturates on absurd frequencies instead of wrapping.
        self.total = self.total.saturating_add(freq);
    }

    /// Frequency that makes `word` win over its current segmentation.
    fn suggest_freq(&self, word: &str) -> u64 {
        let chars: Vec<char> = word.chars().collect();
        let total = self.total.max(1);
        #[allow(clippy::cast_precision_loss)]
        let total_f = total as f64;
        let mut prob = 1.0_f64;
        let mut start = 0;
        for len in segmenter::best_cut(&chars, self, &LogFrequency::default()) {
            let part: String = chars[start..start + len].iter().collect();
            #[allow(clippy::cast_precision_loss)]
            let freq = self.freq(&part).unwrap_or(1) as f64;
            prob *= freq / total_f;
            start += len;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let suggested = ((prob * total_f) as u64).saturating_add(1);
        suggested.max(self.freq(word).unwrap_or(1))
    }
}

/// Accumulates dictionary sources. Entries apply in order, so later sources
/// override earlier ones.
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
    dict: Dictionary,
}

impl DictionaryBuilder {
    /// Add one word. `None` or `Some(0)` asks for a suggested frequency.
    pub fn add_word(&mut self, word: &str, freq: Option<u64>, tag: Option<&str>) -> &mut Self {
        if word.is_empty() {
            return self;
        }
        let freq = match freq {
            Some(f) if f > 0 => f,
            _ => self.dict.suggest_freq(word),
        };
        self.dict.insert(
            word,
            Entry {
                freq,
                tag: tag.map(str::to_string),
            },
        );
        self
    }

    /// Load every entry of a dictionary source.
    ///
    /// # Errors
    ///
    /// Returns [`DictError::InvalidFrequency`] on the first line whose
    /// frequency column does not parse. Entries before it stay loaded.
    pub fn load(&mut self, source: &str) -> Result<&mut Self, DictError> {
        for (idx, line) in source.lines().enumerate() {
            let mut cols = line.split_whitespace();
            let Some(word) = cols.next() else {
                continue;
            };
            let freq = match cols.next() {
                None => None,
                Some(value) => Some(value.parse::<u64>().map_err(|_| {
                    DictError::InvalidFrequency {
                        line: idx + 1,
                        value: value.to_string(),
                    }
                })?),
            };
            self.add_word(word, freq, cols.next());
        }
        Ok(self)
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Dictionary {
        tracing::debug!(
            words = self.dict.len(),
            total = self.dict.total(),
            max_len = self.dict.max_word_len(),
            "dictionary built"
        );
        self.dict
    }
}

/// Build a dictionary from the default source, merged with an optional user
/// source whose entries take precedence.
///
/// # Errors
///
/// Propagates the first [`DictError`] of either source.
pub fn build_dictionary(default_source: &str, user_source: Option<&str>) -> Result<Dictionary, DictError> {
    let mut builder = Dictionary::builder();
    builder.load(default_source)?;
    if let Some(user) = user_source {
        builder.load(user)?;
    }
    Ok(builder.build())
}
