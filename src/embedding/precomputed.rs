//! Embedder backed by a fixed text-to-vector table.
//!
//! Useful for tests and for corpora whose query vocabulary is known ahead of
//! time. A lookup miss is an embedding failure, not an empty result.

use ahash::AHashMap;
use async_trait::async_trait;

use crate::embedding::embedder::Embedder;
use crate::error::{Result, TamrinError};

/// An [`Embedder`] that returns pre-registered vectors.
#[derive(Debug, Clone)]
pub struct PrecomputedEmbedder {
    dimension: usize,
    vectors: AHashMap<String, Vec<f32>>,
    fallback: Option<Vec<f32>>,
}

impl PrecomputedEmbedder {
    /// Create an empty table for vectors of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: AHashMap::new(),
            fallback: None,
        }
    }

    /// Register a vector for an exact text. The vector's length must match
    /// the declared dimension.
    pub fn insert(&mut self, text: impl Into<String>, vector: Vec<f32>) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(TamrinError::internal(format!(
                "precomputed vector has dimension {}, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        self.vectors.insert(text.into(), vector);
        Ok(())
    }

    /// Set a vector returned for texts with no exact entry.
    pub fn with_fallback(mut self, vector: Vec<f32>) -> Result<Self> {
        if vector.len() != self.dimension {
            return Err(TamrinError::internal(format!(
                "fallback vector has dimension {}, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        self.fallback = Some(vector);
        Ok(self)
    }
}

#[async_trait]
impl Embedder for PrecomputedEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(vector) = self.vectors.get(text) {
            return Ok(vector.clone());
        }
        if let Some(fallback) = &self.fallback {
            return Ok(fallback.clone());
        }
        Err(TamrinError::embedding_unavailable(format!(
            "no precomputed vector for text: {text}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_and_miss() {
        let mut embedder = PrecomputedEmbedder::new(3);
        embedder.insert("leg exercises", vec![1.0, 0.0, 0.0]).unwrap();

        let vector = tokio_test::block_on(embedder.embed("leg exercises")).unwrap();
        assert_eq!(vector, vec![1.0, 0.0, 0.0]);

        let err = tokio_test::block_on(embedder.embed("unknown")).unwrap_err();
        assert!(err.is_unavailable());
    }

    #[test]
    fn fallback_covers_misses() {
        let embedder = PrecomputedEmbedder::new(2)
            .with_fallback(vec![0.5, 0.5])
            .unwrap();
        let vector = tokio_test::block_on(embedder.embed("anything")).unwrap();
        assert_eq!(vector, vec![0.5, 0.5]);
    }

    #[test]
    fn rejects_wrong_dimension() {
        let mut embedder = PrecomputedEmbedder::new(3);
        assert!(embedder.insert("x", vec![1.0]).is_err());
    }
}
