use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::FeedItem;

/// Why a paginated request fell back to placeholder posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// Retries ran out or the category was rate limited
    Unreachable,
    /// The source answered with no posts
    NoPosts,
    /// Posts arrived but none were static images
    Filtered,
}

impl FallbackKind {
    fn batch_size(self) -> usize {
        match self {
            FallbackKind::Unreachable | FallbackKind::NoPosts => 3,
            FallbackKind::Filtered => 2,
        }
    }

    /// Exclusive upper bounds for (likes, comments) jitter.
    fn jitter_bounds(self) -> (u64, u64) {
        match self {
            FallbackKind::Unreachable => (500, 20),
            FallbackKind::NoPosts => (300, 15),
            FallbackKind::Filtered => (200, 10),
        }
    }
}

/// Clones placeholder posts into fresh, visibly tagged fallback batches.
#[derive(Debug)]
pub struct FallbackSynthesizer {
    pool: Vec<FeedItem>,
    seed: Option<u64>,
    // Seeded from the clock, bumped once per batch. Keeps ids distinct
    // even for two batches in the same millisecond.
    sequence: AtomicU64,
}

impl FallbackSynthesizer {
    pub fn new(pool: Vec<FeedItem>, seed: Option<u64>) -> Self {
        let start = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self::with_sequence(pool, seed, start)
    }

    pub fn with_sequence(pool: Vec<FeedItem>, seed: Option<u64>, start: u64) -> Self {
        Self {
            pool,
            seed,
            sequence: AtomicU64::new(start),
        }
    }

    /// The untouched placeholder posts.
    pub fn pool(&self) -> &[FeedItem] {
        &self.pool
    }

    pub fn synthesize(&self, cursor: &str, category: &str, kind: FallbackKind) -> Vec<FeedItem> {
        let stamp = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ stamp),
            None => StdRng::from_entropy(),
        };
        let (max_likes, max_comments) = kind.jitter_bounds();

        self.pool
            .iter()
            .take(kind.batch_size())
            .enumerate()
            .map(|(index, item)| FeedItem {
                id: format!("mixed-{}-{}-{:x}", cursor, index, stamp),
                title: format!("{} • r/{}", item.title, category),
                url: item.url.clone(),
                author: item.author.clone(),
                likes: Some(item.likes.unwrap_or(0) + rng.gen_range(0..max_likes)),
                comments: Some(item.comments.unwrap_or(0) + rng.gen_range(0..max_comments)),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::config::FeedConfig;

    fn synthesizer(seed: Option<u64>) -> FallbackSynthesizer {
        FallbackSynthesizer::with_sequence(FeedConfig::default().fallback, seed, 1000)
    }

    #[test]
    fn test_batch_is_tagged_and_sized() {
        let synth = synthesizer(Some(1));
        let batch = synth.synthesize("cycle-0-0", "memes", FallbackKind::Filtered);
        assert_eq!(batch.len(), 2);
        assert!(batch.iter().all(|item| item.title.ends_with(" • r/memes")));
        assert_eq!(batch[0].id, "mixed-cycle-0-0-0-3e8");
        assert_eq!(batch[1].id, "mixed-cycle-0-0-1-3e8");

        let batch = synth.synthesize("cycle-0-0", "memes", FallbackKind::NoPosts);
        assert_eq!(batch.len(), 3);
    }

    #[test]
    fn test_jitter_is_bounded_and_upward() {
        let synth = synthesizer(None);
        let pool = synth.pool().to_vec();
        for _ in 0..50 {
            let batch = synth.synthesize("t3_x", "funny", FallbackKind::Unreachable);
            for (item, original) in batch.iter().zip(&pool) {
                let likes = item.likes.unwrap();
                let base = original.likes.unwrap();
                assert!(likes >= base && likes < base + 500);
                let comments = item.comments.unwrap();
                let base = original.comments.unwrap();
                assert!(comments >= base && comments < base + 20);
            }
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = synthesizer(Some(42)).synthesize("c", "memes", FallbackKind::NoPosts);
        let b = synthesizer(Some(42)).synthesize("c", "memes", FallbackKind::NoPosts);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ids_distinct_across_back_to_back_batches() {
        let synth = synthesizer(Some(7));
        let mut seen = HashSet::new();
        for _ in 0..2 {
            for item in synth.synthesize("cycle-0-0", "memes", FallbackKind::NoPosts) {
                assert!(seen.insert(item.id));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_pool_is_untouched() {
        let synth = synthesizer(Some(3));
        let _ = synth.synthesize("c", "memes", FallbackKind::Unreachable);
        assert_eq!(synth.pool(), FeedConfig::default().fallback.as_slice());
    }
}
