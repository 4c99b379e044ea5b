//! Vector index capability and adapters.

pub mod memory;
pub mod provider;

pub use memory::InMemoryVectorIndex;
pub use provider::{Candidate, CoarseFilter, VectorIndex};
