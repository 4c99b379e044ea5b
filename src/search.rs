//! Search orchestration: requests, safety filtering, ranking and the engine.

pub mod engine;
pub mod filter;
pub mod rank;
pub mod request;

pub use engine::{EngineConfig, SearchEngine, SearchEngineBuilder, SearchResult};
pub use filter::SafetyFilterPipeline;
pub use request::{Language, RecommendOptions, SearchRequest, SearchRequestBuilder};
