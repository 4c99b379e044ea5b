//! The embedding capability trait.

use async_trait::async_trait;

use crate::error::Result;

/// Converts query text into a fixed-length numeric vector.
///
/// Implementations are shared across concurrent searches behind an `Arc` and
/// must not require exclusive access per call. A failed or timed-out embed
/// must surface as [`TamrinError::EmbeddingUnavailable`] — never a zero
/// vector and never an empty vector, since a silent fallback would be
/// indistinguishable from a legitimately empty result set.
///
/// [`TamrinError::EmbeddingUnavailable`]: crate::error::TamrinError::EmbeddingUnavailable
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Dimensionality of every vector returned by [`embed`](Self::embed).
    fn dimension(&self) -> usize;

    /// Embed a non-empty text, Persian or English.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
