//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod cancellation;
mod clock;
mod state_store;
mod transport;

pub use cancellation::{CancellationReceiver, CancellationToken};
pub use clock::Clock;
pub use state_store::{StateStore, StoreError};
pub use transport::{PreparedRequest, Transport, TransportError, TransportFuture};
