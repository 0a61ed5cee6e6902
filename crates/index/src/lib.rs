//! Persistent exact-search vector index over embedded chunks.

pub mod build;
pub mod error;
pub mod flat;
pub mod handle;
pub mod manifest;
pub mod store;

pub use build::build_index;
pub use error::IndexError;
pub use flat::VectorIndex;
pub use handle::{IndexHandle, IndexOrigin};
pub use manifest::IndexManifest;
