//! Server-sent-events stream of committed store changes.
//!
//! Each committed write is sent as a `change` event carrying the collection,
//! document id, new version and body. A subscriber that falls behind the
//! broadcast buffer gets a `resync` event and should re-read the
//! collections it mirrors.

use std::convert::Infallible;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use koperasi_db::ChangeEvent;
use serde_json::json;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{debug, error, warn};

use crate::AppState;

/// Creates the event stream route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(stream_events))
}

async fn next_event(receiver: &mut Receiver<ChangeEvent>) -> Option<Event> {
    loop {
        match receiver.recv().await {
            Ok(change) => match Event::default().event("change").json_data(&change) {
                Ok(event) => return Some(event),
                Err(e) => {
                    error!(error = %e, collection = %change.collection, "Failed to encode change event");
                }
            },
            Err(RecvError::Lagged(missed)) => {
                warn!(missed, "Event subscriber lagged, asking for resync");
                let event = Event::default()
                    .event("resync")
                    .json_data(json!({ "missed": missed }))
                    .unwrap_or_else(|_| Event::default().event("resync"));
                return Some(event);
            }
            Err(RecvError::Closed) => {
                debug!("Change feed closed");
                return None;
            }
        }
    }
}

/// GET `/events` - Stream committed changes.
async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.store.subscribe();
    let events = stream::unfold(receiver, |mut receiver| async move {
        next_event(&mut receiver)
            .await
            .map(|event| (Ok(event), receiver))
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
