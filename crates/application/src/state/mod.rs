//! In-memory workbench state.
//!
//! Each store owns one slice of the session and knows nothing about
//! persistence; the [`Workbench`](crate::Workbench) saves after every change.

mod collection_store;
mod history_log;
mod tab_registry;
mod variable_store;

pub use collection_store::CollectionStore;
pub use history_log::HistoryLog;
pub use tab_registry::{MAX_TABS, TabRegistry};
pub use variable_store::VariableStore;
