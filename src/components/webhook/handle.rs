use super::actor::{WebhookActor, WebhookActorHandle};
use super::models::NotificationOutcome;
use super::Notifier;
use crate::error::VahtiResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

/// Handle for interacting with the webhook actor
#[derive(Clone)]
pub struct WebhookHandle {
    actor_handle: WebhookActorHandle,
    endpoint: Url,
    _actor_task: Arc<JoinHandle<()>>,
}

impl WebhookHandle {
    /// Create a new WebhookHandle and spawn the actor
    pub fn new(endpoint: Url, timeout: Duration) -> VahtiResult<Self> {
        let (mut actor, handle) = WebhookActor::new(endpoint.clone(), timeout)?;

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Ok(Self {
            actor_handle: handle,
            endpoint,
            _actor_task: Arc::new(actor_task),
        })
    }

    /// Endpoint this handle delivers to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> VahtiResult<()> {
        self.actor_handle.shutdown().await
    }
}

#[async_trait]
impl Notifier for WebhookHandle {
    async fn notify(&self, event_id: &str) -> NotificationOutcome {
        let outcome = self.actor_handle.deliver(event_id).await;

        match &outcome {
            NotificationOutcome::Delivered { http_status, body } => {
                info!(event_id, http_status, ?body, "Webhook notified");
            }
            NotificationOutcome::Rejected { http_status, body } => {
                warn!(event_id, http_status, ?body, "Webhook rejected notification");
            }
            NotificationOutcome::Failed { reason } => {
                error!(event_id, "Webhook notification failed: {}", reason);
            }
        }

        outcome
    }
}
