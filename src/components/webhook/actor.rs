use super::models::{is_json_content_type, NotificationOutcome, ResponseBody, WebhookPayload};
use crate::error::{component_error, VahtiResult};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::info;
use url::Url;

/// The webhook actor that processes delivery requests
pub struct WebhookActor {
    client: Client,
    endpoint: Url,
    command_rx: mpsc::Receiver<WebhookCommand>,
}

/// Commands that can be sent to the webhook actor
pub enum WebhookCommand {
    Deliver {
        event_id: String,
        respond_to: oneshot::Sender<NotificationOutcome>,
    },
    Shutdown,
}

/// Handle for communicating with the webhook actor
#[derive(Clone)]
pub struct WebhookActorHandle {
    command_tx: mpsc::Sender<WebhookCommand>,
}

impl WebhookActorHandle {
    /// Deliver a notification and wait for its outcome
    pub async fn deliver(&self, event_id: &str) -> NotificationOutcome {
        let (response_tx, response_rx) = oneshot::channel();
        let command = WebhookCommand::Deliver {
            event_id: event_id.to_string(),
            respond_to: response_tx,
        };
        if let Err(e) = self.command_tx.send(command).await {
            return NotificationOutcome::failed(format!("Actor mailbox error: {}", e));
        }

        response_rx
            .await
            .unwrap_or_else(|_| NotificationOutcome::failed("Response channel closed"))
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> VahtiResult<()> {
        let _ = self.command_tx.send(WebhookCommand::Shutdown).await;
        Ok(())
    }
}

impl WebhookActor {
    /// Create a new actor and return its handle
    pub fn new(endpoint: Url, timeout: Duration) -> VahtiResult<(Self, WebhookActorHandle)> {
        let (command_tx, command_rx) = mpsc::channel(32);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| component_error(&format!("Failed to build webhook client: {}", e)))?;

        let actor = Self {
            client,
            endpoint,
            command_rx,
        };

        let handle = WebhookActorHandle { command_tx };

        Ok((actor, handle))
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Webhook actor started for {}", self.endpoint);

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                WebhookCommand::Deliver {
                    event_id,
                    respond_to,
                } => {
                    // Deliveries run side by side so one slow webhook call
                    // does not hold up other flow runs
                    let client = self.client.clone();
                    let endpoint = self.endpoint.clone();
                    tokio::spawn(async move {
                        let outcome = deliver(&client, &endpoint, &event_id).await;
                        let _ = respond_to.send(outcome);
                    });
                }
                WebhookCommand::Shutdown => {
                    info!("Webhook actor shutting down");
                    break;
                }
            }
        }

        info!("Webhook actor shut down");
    }
}

/// POST the payload for one event, exactly once
async fn deliver(client: &Client, endpoint: &Url, event_id: &str) -> NotificationOutcome {
    let payload = WebhookPayload::for_event(event_id);

    let response = match client.post(endpoint.clone()).json(&payload).send().await {
        Ok(response) => response,
        Err(e) => {
            return NotificationOutcome::failed(format!("Failed to send webhook request: {}", e))
        }
    };

    let status = response.status();
    let is_json = is_json_content_type(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
    );

    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            return NotificationOutcome::failed(format!("Failed to read webhook response: {}", e))
        }
    };

    let body = if is_json {
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => {
                return NotificationOutcome::failed(format!(
                    "Webhook declared JSON but sent an undecodable body: {}",
                    e
                ))
            }
        }
    } else {
        ResponseBody::Text(text)
    };

    if status.is_success() {
        NotificationOutcome::Delivered {
            http_status: status.as_u16(),
            body,
        }
    } else {
        NotificationOutcome::Rejected {
            http_status: status.as_u16(),
            body,
        }
    }
}
