//! Deterministic JSON serialization for files on disk.
//!
//! Files use 2-space indentation, a trailing newline and UTF-8 without BOM,
//! so stored state and exports diff cleanly.

mod json;

pub use json::*;
