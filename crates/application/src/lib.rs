//! QueryBox Application - Workbench state, interpolation and ports
//!
//! This crate defines the application layer with:
//! - Port traits (transport, state store, clock, cancellation)
//! - `{{variable}}` interpolation
//! - The tab, environment, history and collection stores
//! - The [`Workbench`] session that ties them together and sends requests

pub mod error;
pub mod persistence;
pub mod ports;
pub mod state;
pub mod use_cases;
pub mod variable_resolver;
pub mod workbench;

#[cfg(test)]
mod testing;

pub use error::{ApplicationError, ApplicationResult};
pub use persistence::PersistenceBridge;
pub use ports::{
    CancellationReceiver, CancellationToken, Clock, PreparedRequest, StateStore, StoreError,
    Transport, TransportError, TransportFuture,
};
pub use state::{CollectionStore, HistoryLog, MAX_TABS, TabRegistry, VariableStore};
pub use use_cases::{ResolvedSend, SendRequest, prepare_send};
pub use variable_resolver::{extract_variable_names, has_variables, interpolate, interpolate_request};
pub use workbench::{SendOutcome, Workbench};
