//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `json` - JSON pointer writes
//! - `parser` - Text extraction helpers

pub mod io;
pub mod json;
pub mod parser;
