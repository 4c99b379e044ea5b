//! Deterministic token-hashing embedder.
//!
//! Hashes lower-cased whitespace tokens into a fixed number of buckets and
//! L2-normalizes the result. No semantic model behind it, but deterministic
//! and dependency-free, which makes it a usable local fallback when no
//! embedding service is reachable and the exercise corpus was indexed the
//! same way.

use std::hash::{BuildHasher, Hasher};

use ahash::RandomState;
use async_trait::async_trait;

use crate::embedding::embedder::Embedder;
use crate::error::{Result, TamrinError};

// Fixed seeds keep the bucket assignment stable across processes.
const HASH_SEEDS: (u64, u64, u64, u64) = (0x74616d, 0x72696e, 0x686173, 0x68696e);

/// An [`Embedder`] that hashes tokens into buckets.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    hasher: RandomState,
}

impl HashingEmbedder {
    /// Create a hashing embedder producing vectors of the given dimension.
    ///
    /// # Panics
    ///
    /// Panics if `dimension` is zero.
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "hashing embedder dimension must be non-zero");
        Self {
            dimension,
            hasher: RandomState::with_seeds(
                HASH_SEEDS.0,
                HASH_SEEDS.1,
                HASH_SEEDS.2,
                HASH_SEEDS.3,
            ),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        let mut hasher = self.hasher.build_hasher();
        hasher.write(token.as_bytes());
        (hasher.finish() % self.dimension as u64) as usize
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];
        let mut tokens = 0usize;
        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            vector[self.bucket(&token)] += 1.0;
            tokens += 1;
        }
        if tokens == 0 {
            return Err(TamrinError::embedding_unavailable(
                "cannot embed empty text",
            ));
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }
}
