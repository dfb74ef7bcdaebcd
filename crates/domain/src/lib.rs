//! `QueryBox` Domain - Core workbench types
//!
//! This crate defines the data model of the request workbench: tabs, the
//! requests they edit, environments of `{{var}}` substitutions, responses,
//! history and collections. All types here are pure Rust with no I/O.

pub mod auth;
pub mod collection;
pub mod environment;
pub mod error;
pub mod export;
pub mod history;
pub mod id;
pub mod key_value;
pub mod request;
pub mod response;
pub mod state;
pub mod tab;

pub use auth::{
    ApiKeyAuth, ApiKeyLocation, AuthConfig, AuthEdit, AuthType, BasicAuth, BearerAuth,
    ResolvedAuth, resolve_auth,
};
pub use collection::{Collection, SavedRequest};
pub use environment::{Environment, EnvironmentVariable, VariableMap};
pub use error::{DomainError, DomainResult};
pub use export::{
    EXPORT_FORMAT, EXPORT_VERSION, ExportEnvelope, ExportFile, ExportKind, ImportStrategy,
    ImportSummary, Importable, plan_import,
};
pub use history::{HistoryEntry, MAX_HISTORY_ENTRIES};
pub use id::generate_id;
pub use key_value::{KeyValue, KeyValueEdit, KeyValueList, KeyValuePair};
pub use request::{BodyMode, ContentType, HttpMethod, RequestBody, RequestSpec};
pub use response::{ResponseSpec, StatusClass, format_bytes};
pub use state::{RequestError, RequestErrorKind, RequestState, RequestStatus};
pub use tab::{DEFAULT_TAB_NAME, Tab};
