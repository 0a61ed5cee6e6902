pub mod config;
pub mod conversation;
pub mod document;
pub mod error;

pub use config::Config;
pub use conversation::*;
pub use document::*;
pub use error::*;
