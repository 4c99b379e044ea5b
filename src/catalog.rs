//! Exercise catalog records and the read-only corpus view.
//!
//! The catalog is bilingual: every record carries Persian and English display
//! names plus Persian variants of the muscle and equipment descriptions. The
//! engine never owns embedding vectors for these records; vectors live in the
//! [`VectorIndex`](crate::index::VectorIndex) and only similarity scores cross
//! back into this crate.

use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Training level of an exercise or a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Coarse equipment feasibility class of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Machine,
    Home,
    Hybrid,
}

/// Intensity class of an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Light,
    Medium,
    Heavy,
}

/// One row of the exercise catalog.
///
/// `exercise_id` is the only stable join key between vector index results and
/// the corpus view. `gender_suitability` is advisory display metadata and is
/// not consulted by any filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseMetadata {
    pub exercise_id: u64,
    pub name_fa: String,
    pub name_en: String,
    pub muscle: String,
    pub muscle_fa: String,
    pub level: Level,
    pub equipment: Equipment,
    /// Free-text equipment description, matched by substring against a
    /// user's owned-equipment tokens.
    #[serde(default)]
    pub equipment_needed: String,
    #[serde(default)]
    pub equipment_needed_fa: String,
    /// Contraindication labels, e.g. "knee" or "lower_back".
    #[serde(default)]
    pub injury_tags: Vec<String>,
    /// Coarse grouping such as "bodybuilding_machine" or "functional_home".
    #[serde(default)]
    pub category: String,
    pub intensity: Intensity,
    #[serde(default)]
    pub gender_suitability: String,
}

/// Read-only, in-memory view of the exercise catalog keyed by `exercise_id`.
///
/// The view backfills metadata for candidates the vector index returned
/// without it. When both sides carry metadata, the index copy wins since it
/// is what was actually retrieved.
#[derive(Debug, Default)]
pub struct ExerciseCorpus {
    records: AHashMap<u64, Arc<ExerciseMetadata>>,
}

impl ExerciseCorpus {
    /// Build a corpus view from an iterator of records. A later record with
    /// a duplicate `exercise_id` replaces the earlier one.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ExerciseMetadata>,
    {
        let records = records
            .into_iter()
            .map(|record| (record.exercise_id, Arc::new(record)))
            .collect();
        Self { records }
    }

    /// Look up a record by its identity.
    pub fn get(&self, exercise_id: u64) -> Option<Arc<ExerciseMetadata>> {
        self.records.get(&exercise_id).cloned()
    }

    /// Number of records in the view.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the view holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in the view.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ExerciseMetadata>> {
        self.records.values()
    }
}
