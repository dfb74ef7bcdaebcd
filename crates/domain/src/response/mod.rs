//! HTTP response domain types

mod spec;

pub use spec::{ResponseSpec, StatusClass, format_bytes};
