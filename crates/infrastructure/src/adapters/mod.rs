//! Port implementations

mod reqwest_transport;
mod system_clock;

pub use reqwest_transport::{MAX_BODY_SIZE, ReqwestTransport, TransportConfig};
pub use system_clock::SystemClock;
