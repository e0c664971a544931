// Public modules
pub mod clipboard;
pub mod convert;
pub mod encoding;
pub mod error;
pub mod terminology;
pub mod text;

// Internal modules - not part of public API
pub(crate) mod paths;

// Public modules for CLI access
pub mod defaults;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
