//! HTTP request domain types

mod body;
mod method;
mod spec;
pub mod url;

pub use body::{BodyMode, ContentType, RequestBody};
pub use method::HttpMethod;
pub use spec::RequestSpec;
