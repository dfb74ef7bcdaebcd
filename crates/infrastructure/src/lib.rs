//! `QueryBox` Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the file formats the
//! workbench reads and writes.

pub mod adapters;
pub mod codegen;
pub mod export;
pub mod import;
pub mod persistence;
pub mod serialization;

pub use adapters::{MAX_BODY_SIZE, ReqwestTransport, SystemClock, TransportConfig};
pub use codegen::{
    SnippetLanguage, generate_curl, generate_javascript_fetch, generate_node_axios,
    generate_python_requests, generate_snippet,
};
pub use export::{ExportError, export_to_string, write_export};
pub use import::{
    ImportError, parse_import_file, parse_import_file_as, read_collections, read_environments,
};
pub use persistence::{InMemoryStore, JsonFileStore};
pub use serialization::{
    SerializationError, from_json, from_json_bytes, to_json_stable, to_json_stable_bytes,
};
