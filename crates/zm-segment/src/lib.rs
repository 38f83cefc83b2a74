//! # zm-segment: line segmentation for mixed Chinese/Latin text
//!
//! - **[`classify`]**: `char` to [`CharClass`], a pure total function
//! - **[`dictionary`]**: immutable word frequencies with a prefix index
//! - **[`segmenter`]**: line to [`Token`]s, dictionary DAG for CJK runs
//! - **[`cache`]**: content-addressed LRU of segmented lines
//! - **[`token`]**: the [`Token`] type and its [`Category`]

pub mod cache;
pub mod classify;
pub mod dictionary;
pub mod segmenter;
pub mod token;

pub use cache::{CacheStats, CachedSegmenter, SegmentCache, Tokenize};
pub use classify::{CharClass, classify};
pub use dictionary::{DEFAULT_DICT, DictError, Dictionary, DictionaryBuilder, build_dictionary};
pub use segmenter::{LogFrequency, Scorer, Segmenter, segment, segment_with};
pub use token::{Category, Token};
