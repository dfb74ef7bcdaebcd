//! Application use cases (business logic orchestration).

mod send_request;

pub use send_request::{
    CANCELLED_MESSAGE, ResolvedSend, SendRequest, classify_failure, prepare_send,
    validation_error,
};
