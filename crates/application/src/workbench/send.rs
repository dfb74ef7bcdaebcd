//! Sending and cancelling per-tab requests.
//!
//! Every send gets a generation number. A send only commits its result if
//! its generation is still the one registered for the tab, so a newer send
//! or closing the tab silently supersedes it.

use querybox_domain::{HistoryEntry, RequestError, RequestState, ResponseSpec};
use tracing::{debug, info};

use super::{InFlight, Workbench};
use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{CancellationToken, StateStore};
use crate::use_cases::{classify_failure, prepare_send, validation_error};

/// How a send ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// A response arrived and was stored on the tab.
    Completed(Box<ResponseSpec>),
    /// The send was rejected, failed or was cancelled; the error is on the tab.
    Failed(RequestError),
    /// A newer send or a tab close superseded this one; nothing was stored.
    Discarded,
}

impl<S: StateStore> Workbench<S> {
    /// Sends the request of one tab.
    ///
    /// Any send already in flight for this tab is cancelled and discarded.
    /// Sends on other tabs are unaffected. Validation failures go straight
    /// to the error state without entering loading.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::NotFound`] if the tab does not exist.
    pub async fn send(&self, tab_id: &str) -> ApplicationResult<SendOutcome> {
        let (request, resolved, generation, cancel) = {
            let mut session = self.session.lock();
            let request = session
                .tabs
                .tab(tab_id)
                .map(|t| t.request.clone())
                .ok_or_else(|| ApplicationError::NotFound(format!("tab {tab_id}")))?;

            if session.cancel_in_flight(tab_id) {
                debug!(tab_id, "superseding in-flight send");
            }

            let variables = session.variables.active_variables_map();
            let resolved = match prepare_send(&request, &variables) {
                Ok(resolved) => resolved,
                Err(e) => {
                    let error = validation_error(&e);
                    debug!(tab_id, error = %error, "send rejected");
                    session
                        .tabs
                        .update_tab_response(tab_id, RequestState::Error(error.clone()));
                    return Ok(SendOutcome::Failed(error));
                }
            };

            session.next_generation += 1;
            let generation = session.next_generation;
            let token = CancellationToken::new();
            let cancel = token.receiver();
            session
                .in_flight
                .insert(tab_id.to_string(), InFlight { generation, token });
            session.tabs.update_tab_response(tab_id, RequestState::loading());
            (request, resolved, generation, cancel)
        };

        info!(
            tab_id,
            method = %resolved.prepared.method,
            url = %resolved.prepared.url,
            "sending request"
        );
        let history_url = resolved.history_url;
        let host = resolved.host;
        let result = self.send_request.execute(resolved.prepared, cancel).await;

        let mut session = self.session.lock();
        if session.in_flight.get(tab_id).map(|f| f.generation) != Some(generation) {
            debug!(tab_id, generation, "discarding superseded result");
            return Ok(SendOutcome::Discarded);
        }
        session.in_flight.remove(tab_id);

        match result {
            Ok(response) => {
                info!(
                    tab_id,
                    status = response.status,
                    time_ms = response.time,
                    size = response.size,
                    "response received"
                );
                let timestamp = self.clock.now_millis();
                session.history.add(HistoryEntry::new(
                    &request,
                    history_url,
                    response.status,
                    response.status_text.clone(),
                    timestamp,
                ));
                if let Some(host) = host
                    && session.tabs.tab(tab_id).is_some_and(|t| t.has_default_name())
                {
                    session.tabs.rename_tab(tab_id, host);
                }
                session
                    .tabs
                    .update_tab_response(tab_id, RequestState::success(response.clone()));
                self.persist_tabs(&session);
                self.persistence.save_history(session.history.entries());
                Ok(SendOutcome::Completed(Box::new(response)))
            }
            Err(e) => {
                let error = classify_failure(&e);
                info!(tab_id, kind = ?error.kind, error = %e, "request failed");
                session
                    .tabs
                    .update_tab_response(tab_id, RequestState::Error(error.clone()));
                Ok(SendOutcome::Failed(error))
            }
        }
    }

    /// Sends the active tab's request.
    ///
    /// # Errors
    ///
    /// See [`send`](Self::send).
    pub async fn send_active(&self) -> ApplicationResult<SendOutcome> {
        let tab_id = self.active_tab_id();
        self.send(&tab_id).await
    }

    /// Cancels the tab's in-flight send. Returns false if nothing was in flight.
    ///
    /// The send then ends with an abort error.
    pub fn cancel(&self, tab_id: &str) -> bool {
        self.session
            .lock()
            .in_flight
            .get(tab_id)
            .map(|f| f.token.cancel())
            .is_some()
    }

    /// Returns true while a send for this tab is in flight.
    pub fn is_in_flight(&self, tab_id: &str) -> bool {
        self.session.lock().in_flight.contains_key(tab_id)
    }
}
