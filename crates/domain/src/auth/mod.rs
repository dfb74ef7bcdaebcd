//! Authentication domain types

mod resolve;
mod types;

pub use resolve::{ResolvedAuth, resolve_auth};
pub use types::{
    ApiKeyAuth, ApiKeyLocation, AuthConfig, AuthEdit, AuthType, BasicAuth, BearerAuth,
    DEFAULT_BEARER_PREFIX,
};
