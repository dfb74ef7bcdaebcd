//! Test doubles shared by the unit tests of this crate.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use querybox_domain::ResponseSpec;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::ports::{
    Clock, PreparedRequest, StateStore, StoreError, Transport, TransportError, TransportFuture,
};

/// In-memory store whose clones share the same map.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
    corrupt: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub fn with(entries: &[(&str, Value)]) -> Self {
        let store = Self::default();
        for (key, value) in entries {
            store.values.lock().insert((*key).to_string(), value.clone());
        }
        store
    }

    /// Makes reads of `key` fail as corrupt while it holds a value.
    pub fn mark_corrupt(&self, key: &str) {
        self.corrupt.lock().push(key.to_string());
    }

    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.lock().get(key).cloned()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value = self.value(key);
        if value.is_some() && self.corrupt.lock().iter().any(|k| k == key) {
            return Err(StoreError::Corrupt {
                key: key.into(),
                message: "expected value at line 1 column 1".into(),
            });
        }
        Ok(value)
    }

    fn set(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.values.lock().insert(key.into(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.lock().remove(key);
        Ok(())
    }
}

pub struct FixedClock(i64);

impl FixedClock {
    pub const fn new(millis: i64) -> Self {
        Self(millis)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.0).unwrap()
    }
}

pub type Reply = oneshot::Sender<Result<ResponseSpec, TransportError>>;

/// Transport that hands every request to the test, which replies when it wants.
pub struct ScriptedTransport {
    requests: mpsc::UnboundedSender<(PreparedRequest, Reply)>,
}

impl ScriptedTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(PreparedRequest, Reply)>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: PreparedRequest) -> TransportFuture<'_> {
        let (reply, response) = oneshot::channel();
        let _ = self.requests.send((request, reply));
        Box::pin(async move {
            response
                .await
                .unwrap_or_else(|_| Err(TransportError::Other("no reply".into())))
        })
    }
}

pub fn response(status: u16, body: &str) -> ResponseSpec {
    ResponseSpec {
        status,
        status_text: "OK".into(),
        body: body.into(),
        ..ResponseSpec::default()
    }
}
