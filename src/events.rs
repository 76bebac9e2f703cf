use serde::Serialize;
use tokio::sync::broadcast;

use crate::models::user::UserResponse;

/// Domain events emitted by the auth flows for downstream consumers
/// (analytics, audit). Fire-and-forget: emission never fails a request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuthEvent {
    /// `user.login` — a session token was issued for a user.
    UserLogin { user: UserResponse, token: String },
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<AuthEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn emit(&self, event: AuthEvent) {
        if let AuthEvent::UserLogin { user, .. } = &event {
            tracing::info!(user = %user.id, "user.login");
        }
        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
