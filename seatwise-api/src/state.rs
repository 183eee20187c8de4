use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;
use seatwise_assign::{AssignmentService, EditorSession};
use seatwise_store::app_config::EngineConfig;
use seatwise_store::InMemorySeatStore;

/// One editor session per transport, created on first use
pub type SessionRegistry = Arc<Mutex<HashMap<Uuid, Arc<Mutex<EditorSession>>>>>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemorySeatStore>,
    pub service: AssignmentService,
    pub sessions: SessionRegistry,
    pub history_limit: usize,
}

impl AppState {
    pub fn new(store: Arc<InMemorySeatStore>, engine: &EngineConfig) -> Self {
        let service = AssignmentService::new(store.clone())
            .with_default_block_reason(engine.default_block_reason.clone());

        Self {
            store,
            service,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            history_limit: engine.history_limit,
        }
    }

    /// Session for `transport_id`, opened on first mutation; mutations on one
    /// transport are serialized through its mutex
    pub async fn session(&self, transport_id: Uuid) -> Arc<Mutex<EditorSession>> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(transport_id)
            .or_insert_with(|| {
                tracing::debug!("Opening editor session for transport {}", transport_id);
                Arc::new(Mutex::new(self.new_session(transport_id)))
            })
            .clone()
    }

    /// Open session for `transport_id`, if any. Read-only routes use this so
    /// they never register sessions.
    pub async fn existing_session(&self, transport_id: Uuid) -> Option<Arc<Mutex<EditorSession>>> {
        self.sessions.lock().await.get(&transport_id).cloned()
    }

    /// Unregistered session with an empty history
    pub fn new_session(&self, transport_id: Uuid) -> EditorSession {
        EditorSession::new(transport_id, self.service.clone(), self.store.clone())
            .with_history_limit(self.history_limit)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
