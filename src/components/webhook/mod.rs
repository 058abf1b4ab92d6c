mod actor;
mod handle;
pub mod models;

pub use handle::WebhookHandle;
pub use models::{NotificationOutcome, ResponseBody, WebhookPayload};

use crate::config::Config;
use crate::error::VahtiResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// Best-effort notification boundary.
///
/// `notify` never fails and never retries. Whatever happens on the wire comes
/// back as a [`NotificationOutcome`] for the caller to log.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event_id: &str) -> NotificationOutcome;
}

/// Webhook component, present only when a webhook URL is configured
#[derive(Default)]
pub struct Webhook {
    handle: RwLock<Option<WebhookHandle>>,
}

impl Webhook {
    /// Create a new webhook component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<WebhookHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Webhook {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn init(&self, config: Arc<RwLock<Config>>) -> VahtiResult<()> {
        let (endpoint, timeout) = {
            let config_read = config.read().await;
            (
                config_read.webhook_url.clone(),
                Duration::from_secs(config_read.webhook_timeout_secs),
            )
        };

        let Some(endpoint) = endpoint else {
            info!("WEBHOOK_URL not set, spam notifications disabled");
            return Ok(());
        };

        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(WebhookHandle::new(endpoint, timeout)?);
        }

        Ok(())
    }

    async fn shutdown(&self) -> VahtiResult<()> {
        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
