//! Brute-force in-memory vector index.
//!
//! Scores every row by cosine similarity. Suitable for tests and for small
//! embedded corpora; a production deployment would put a managed vector
//! database behind the same [`VectorIndex`] trait.

use async_trait::async_trait;

use crate::catalog::ExerciseMetadata;
use crate::error::{Result, TamrinError};
use crate::index::provider::{Candidate, CoarseFilter, VectorIndex};

#[derive(Debug, Clone)]
struct IndexRow {
    exercise_id: u64,
    vector: Vec<f32>,
    metadata: ExerciseMetadata,
}

/// An exhaustive cosine-similarity [`VectorIndex`].
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    dimension: usize,
    rows: Vec<IndexRow>,
}

impl InMemoryVectorIndex {
    /// Create an empty index for vectors of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            rows: Vec::new(),
        }
    }

    /// Insert a record with its embedding vector.
    pub fn insert(&mut self, vector: Vec<f32>, metadata: ExerciseMetadata) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(TamrinError::internal(format!(
                "vector for exercise {} has dimension {}, index expects {}",
                metadata.exercise_id,
                vector.len(),
                self.dimension
            )));
        }
        self.rows.push(IndexRow {
            exercise_id: metadata.exercise_id,
            vector,
            metadata,
        });
        Ok(())
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 { 0.0 } else { dot / denom }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&CoarseFilter>,
        top_k: usize,
    ) -> Result<Vec<Candidate>> {
        if vector.len() != self.dimension {
            return Err(TamrinError::invalid_query(format!(
                "query vector has dimension {}, index expects {}",
                vector.len(),
                self.dimension
            )));
        }

        let mut hits: Vec<Candidate> = self
            .rows
            .iter()
            .filter(|row| filter.is_none_or(|f| f.matches(&row.metadata)))
            .map(|row| Candidate {
                exercise_id: row.exercise_id,
                score: cosine_similarity(vector, &row.vector),
                metadata: Some(row.metadata.clone()),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.exercise_id.cmp(&b.exercise_id))
        });
        hits.truncate(top_k);
        Ok(hits)
    }
}
