use std::{collections::VecDeque, sync::Mutex};

use {async_trait::async_trait, serde_json::Value};

use crate::{
    backend::{BackendError, InteractionBackend},
    payload::OutboundPayload,
};

/// Backend that replays canned outcomes and records what it was sent.
#[derive(Default)]
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<Result<Value, BackendError>>>,
    sent: Mutex<Vec<OutboundPayload>>,
}

#[allow(clippy::unwrap_used)]
impl ScriptedBackend {
    pub fn new(outcomes: impl IntoIterator<Item = Result<Value, BackendError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<OutboundPayload> {
        self.sent.lock().unwrap().clone()
    }
}

#[allow(clippy::unwrap_used)]
#[async_trait]
impl InteractionBackend for ScriptedBackend {
    async fn check(&self, payload: &OutboundPayload) -> Result<Value, BackendError> {
        self.sent.lock().unwrap().push(payload.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(BackendError::Status(599)))
    }
}
