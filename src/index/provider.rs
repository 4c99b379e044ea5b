//! The vector index capability trait and its request/response types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::{Equipment, ExerciseMetadata, Intensity, Level};
use crate::error::Result;

/// A raw nearest-neighbor hit, before safety filtering.
///
/// `metadata` may be absent when the provider stores vectors without a full
/// metadata payload; the engine backfills it from the corpus view in that
/// case. When both sides carry metadata, the index copy is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub exercise_id: u64,
    /// Provider-native similarity; higher is more similar. The numeric range
    /// is not unified across providers, so scores are ordinal only.
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<ExerciseMetadata>,
}

/// Best-effort, provider-native metadata predicate applied during retrieval.
///
/// Providers may support none, some or all of these predicates, so the
/// engine never relies on the coarse filter alone: every safety-relevant
/// predicate is re-checked locally after retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoarseFilter {
    #[serde(default)]
    pub equipment: Option<Equipment>,
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub intensity: Option<Intensity>,
}

impl CoarseFilter {
    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.equipment.is_none() && self.level.is_none() && self.intensity.is_none()
    }

    /// Evaluate all set predicates against a record.
    pub fn matches(&self, metadata: &ExerciseMetadata) -> bool {
        if let Some(equipment) = self.equipment
            && metadata.equipment != equipment
        {
            return false;
        }
        if let Some(level) = self.level
            && metadata.level != level
        {
            return false;
        }
        if let Some(intensity) = self.intensity
            && metadata.intensity != intensity
        {
            return false;
        }
        true
    }
}

/// Returns the top-K nearest exercise records for a query vector.
///
/// Implementations are shared across concurrent searches behind an `Arc`.
/// A failed or timed-out query must surface as
/// [`TamrinError::IndexUnavailable`](crate::error::TamrinError::IndexUnavailable).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Query for the `top_k` most similar records, optionally restricted by
    /// a coarse metadata filter.
    async fn query(
        &self,
        vector: &[f32],
        filter: Option<&CoarseFilter>,
        top_k: usize,
    ) -> Result<Vec<Candidate>>;
}
