//! Segmentation cache.
//!
//! Lines are keyed by their content, so two buffers that share a line share
//! its tokens. The cache is the only shared mutable state in the workspace;
//! it serializes through a mutex, and segmentation itself runs outside the
//! lock (two callers racing on the same miss both compute, last write wins).

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::segmenter::Segmenter;
use crate::token::Token;

/// Anything that turns a line into tokens.
pub trait Tokenize {
    fn tokenize(&self, line: &str) -> Arc<[Token]>;
}

impl Tokenize for Segmenter {
    fn tokenize(&self, line: &str) -> Arc<[Token]> {
        self.segment(line).into()
    }
}

impl<T: Tokenize + ?Sized> Tokenize for &T {
    fn tokenize(&self, line: &str) -> Arc<[Token]> {
        (**self).tokenize(line)
    }
}

impl<T: Tokenize + ?Sized> Tokenize for Arc<T> {
    fn tokenize(&self, line: &str) -> Arc<[Token]> {
        (**self).tokenize(line)
    }
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Lines currently cached.
    pub len: usize,
}

#[derive(Debug)]
struct Inner {
    lines: LruCache<Box<str>, Arc<[Token]>>,
    hits: u64,
    misses: u64,
}

/// Content-addressed LRU of segmented lines.
#[derive(Debug)]
pub struct SegmentCache {
    inner: Mutex<Inner>,
    capacity: Option<NonZeroUsize>,
}

impl SegmentCache {
    /// A cache holding at most `capacity` lines; 0 means unbounded.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity);
        let lines = capacity.map_or_else(LruCache::unbounded, LruCache::new);
        Self {
            inner: Mutex::new(Inner {
                lines,
                hits: 0,
                misses: 0,
            }),
            capacity,
        }
    }

    /// Configured capacity, `None` when unbounded.
    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity.map(NonZeroUsize::get)
    }

    /// Cached tokens for `line`, computing and storing them on a miss.
    pub fn get_or_compute<F>(&self, line: &str, compute: F) -> Arc<[Token]>
    where
        F: FnOnce(&str) -> Vec<Token>,
    {
        {
            let mut inner = self.inner.lock();
            if let Some(tokens) = inner.lines.get(line).cloned() {
                inner.hits += 1;
                tracing::trace!(line, "segment cache hit");
                return tokens;
            }
            inner.misses += 1;
        }
        tracing::trace!(line, "segment cache miss");

        let tokens: Arc<[Token]> = compute(line).into();
        self.inner.lock().lines.put(line.into(), Arc::clone(&tokens));
        tokens
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            len: inner.lines.len(),
        }
    }

    /// Drop every cached line. Counters are kept.
    pub fn clear(&self) {
        self.inner.lock().lines.clear();
    }
}

impl Default for SegmentCache {
    fn default() -> Self {
        Self::new(4096)
    }
}

/// A [`Segmenter`] memoized through a [`SegmentCache`].
#[derive(Debug)]
pub struct CachedSegmenter {
    segmenter: Segmenter,
    cache: SegmentCache,
}

impl CachedSegmenter {
    #[must_use]
    pub fn new(segmenter: Segmenter, capacity: usize) -> Self {
        Self {
            segmenter,
            cache: SegmentCache::new(capacity),
        }
    }

    #[must_use]
    pub const fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    #[must_use]
    pub const fn cache(&self) -> &SegmentCache {
        &self.cache
    }
}

impl Tokenize for CachedSegmenter {
    fn tokenize(&self, line: &str) -> Arc<[Token]> {
        self.cache.get_or_compute(line, |l| self.segmenter.segment(l))
    }
}

// One cache is shared by every thread that moves a cursor.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SegmentCache>();
    assert_send_sync::<CachedSegmenter>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    use crate::dictionary::Dictionary;
    use crate::segmenter::segment;

    fn segmenter() -> Segmenter {
        Segmenter::new(Arc::new(Dictionary::from_entries([("北京", 10), ("天安门", 5)])))
    }

    #[test]
    fn miss_then_hit_returns_same_tokens() {
        let cache = SegmentCache::new(8);
        let calls = Cell::new(0);
        let dict = Dictionary::from_entries([("北京", 10)]);
        let compute = |line: &str| {
            calls.set(calls.get() + 1);
            segment(line, &dict)
        };

        let first = cache.get_or_compute("去北京", compute);
        let second = cache.get_or_compute("去北京", compute);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, len: 1 });
    }

    #[test]
    fn lru_evicts_oldest_line() {
        let cache = SegmentCache::new(2);
        let seg = segmenter();
        for line in ["a", "b", "a", "c"] {
            cache.get_or_compute(line, |l| seg.segment(l));
        }
        // "b" was least recently used when "c" arrived.
        assert_eq!(cache.stats().len, 2);
        cache.get_or_compute("a", |l| seg.segment(l));
        cache.get_or_compute("b", |l| seg.segment(l));
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 4, len: 2 });
    }

    #[test]
    fn zero_capacity_is_unbounded() {
        let cache = SegmentCache::new(0);
        assert_eq!(cache.capacity(), None);
        let seg = segmenter();
        for i in 0..100 {
            cache.get_or_compute(&i.to_string(), |l| seg.segment(l));
        }
        assert_eq!(cache.stats().len, 100);
    }

    #[test]
    fn clear_keeps_counters() {
        let cache = SegmentCache::default();
        assert_eq!(cache.capacity(), Some(4096));
        cache.get_or_compute("x", |_| Vec::new());
        cache.clear();
        assert_eq!(cache.stats(), CacheStats { hits: 0, misses: 1, len: 0 });
    }

    #[test]
    fn cached_segmenter_matches_fresh_segmentation() {
        let cached = CachedSegmenter::new(segmenter(), 16);
        let line = "我去北京天安门";
        let fresh = cached.segmenter().segment(line);
        assert_eq!(cached.tokenize(line).to_vec(), fresh);
        assert_eq!(cached.tokenize(line).to_vec(), fresh);
        assert_eq!(cached.cache().stats().hits, 1);
    }

    #[test]
    fn shared_across_threads() {
        const THREADS: usize = 4;
        const ROUNDS: usize = 50;
        let cached = CachedSegmenter::new(segmenter(), 16);
        let lines = ["我去北京", "天安门 gate", "北京天安门"];
        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for round in 0..ROUNDS {
                        let line = lines[round % lines.len()];
                        assert_eq!(cached.tokenize(line).to_vec(), cached.segmenter().segment(line));
                    }
                });
            }
        });
        let stats = cached.cache().stats();
        assert_eq!(stats.hits + stats.misses, (THREADS * ROUNDS) as u64);
        assert!(stats.misses >= lines.len() as u64);
        assert_eq!(stats.len, lines.len());
    }

    #[test]
    fn tokenize_through_references() {
        let seg = Arc::new(segmenter());
        let by_ref: &Segmenter = &seg;
        assert_eq!(seg.tokenize("北京").len(), 1);
        assert_eq!(by_ref.tokenize("北京 x").len(), 3);
    }
}
