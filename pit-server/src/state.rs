//! Shared state accessible from all request handlers.

use std::sync::{Arc, Mutex, PoisonError};

use pit_agent::{Agent, AgentError, AgentInfo};
use tracing::debug;

use crate::error::ApiError;

/// The one agent this server exposes.
///
/// Agent calls are serialized through a single lock and run on the blocking
/// pool, so a request dropped mid-call still lets the call finish. Identity
/// is captured at construction because it never changes.
#[derive(Clone)]
pub struct AppState {
    info: Arc<AgentInfo>,
    agent: Arc<Mutex<Box<dyn Agent>>>,
}

impl AppState {
    pub fn new(agent: Box<dyn Agent>) -> Self {
        let info = AgentInfo::of(&*agent);
        Self {
            info: Arc::new(info),
            agent: Arc::new(Mutex::new(agent)),
        }
    }

    pub fn info(&self) -> &AgentInfo {
        &self.info
    }

    /// Run `f` against the agent, one call at a time.
    pub async fn call<T, F>(&self, op: &'static str, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut dyn Agent) -> Result<T, AgentError> + Send + 'static,
        T: Send + 'static,
    {
        let agent = Arc::clone(&self.agent);
        let joined = tokio::task::spawn_blocking(move || {
            // A panic in an earlier call poisons the lock; the agent itself is
            // still usable.
            let mut agent = agent.lock().unwrap_or_else(PoisonError::into_inner);
            debug!(op, "dispatching agent call");
            f(&mut **agent)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(e) => Err(ApiError::Aborted(format!("{op}: {e}"))),
        }
    }
}
