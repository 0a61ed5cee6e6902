//! Sliding-window chunking.
//!
//! Splits documents into fixed-size character windows; consecutive windows
//! of one document share `overlap` characters. Every chunk inherits its
//! parent's metadata unchanged.

mod types;
mod window;

pub use types::{ChunkConfig, ChunkError};
pub use window::{split_document, split_documents};
