//! Embedding providers.
//!
//! The engine consumes embeddings through the [`Embedder`] capability trait;
//! the concrete adapters here are swappable and the filter core has no
//! dependency on any of them.

pub mod embedder;
pub mod hashing;
#[cfg(feature = "embeddings-openai")]
pub mod openai;
pub mod precomputed;

pub use embedder::Embedder;
pub use hashing::HashingEmbedder;
#[cfg(feature = "embeddings-openai")]
pub use openai::OpenAiEmbedder;
pub use precomputed::PrecomputedEmbedder;
