//! # Tamrin
//!
//! Exercise recommendation and semantic search for bilingual
//! (Persian/English) fitness catalogs.
//!
//! Given a free-text or profile-derived query and a user's
//! physical/equipment/injury profile, the engine returns exercises that are
//! both semantically relevant and provably safe and feasible for that user:
//!
//! - approximate nearest-neighbor retrieval over learned embeddings,
//!   consumed through the [`Embedder`] and [`VectorIndex`] capability traits
//! - a deterministic safety filter pipeline (equipment feasibility, injury
//!   contraindication exclusion, level/intensity/muscle matching)
//! - score-descending ranking with deterministic tie-breaking
//!
//! The engine holds no cross-request state and is safely callable
//! concurrently. Upstream failures abort the search with a distinguishable
//! error; an empty result list is always a successful outcome.

pub mod catalog;
pub mod embedding;
mod error;
pub mod index;
pub mod profile;
pub mod search;

// Re-exports for the public API
pub use catalog::{Equipment, ExerciseCorpus, ExerciseMetadata, Intensity, Level};
pub use embedding::Embedder;
#[cfg(feature = "embeddings-openai")]
pub use embedding::OpenAiEmbedder;
pub use embedding::{HashingEmbedder, PrecomputedEmbedder};
pub use error::{Result, TamrinError};
pub use index::{Candidate, CoarseFilter, InMemoryVectorIndex, VectorIndex};
pub use profile::{FitnessGoal, UserProfile};
pub use search::{
    EngineConfig, Language, RecommendOptions, SearchEngine, SearchRequest, SearchRequestBuilder,
    SearchResult,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
