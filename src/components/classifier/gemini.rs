use super::policy::ClassificationPolicy;
use super::verdict::{build_task_prompt, parse_verdict};
use super::Classifier;
use crate::components::event::CalendarEvent;
use crate::error::{classification_error, VahtiResult};
use async_trait::async_trait;
use rig::completion::{Chat, Message};
use rig::providers::gemini::Client as GeminiClient;
use tracing::info;

/// Classifier that delegates the decision to a Gemini agent through Rig
pub struct GeminiClassifier {
    client: GeminiClient,
    model: String,
    preamble: String,
}

impl GeminiClassifier {
    /// Create a classifier whose agent is instructed with the given policy
    pub fn new(api_key: &str, model: &str, policy: &ClassificationPolicy) -> Self {
        info!("Using Gemini model: {}", model);
        Self {
            client: GeminiClient::new(api_key),
            model: model.to_string(),
            preamble: policy.render_instructions(),
        }
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn classify(&self, event: &CalendarEvent) -> VahtiResult<bool> {
        let prompt = build_task_prompt(event)?;

        let agent = self
            .client
            .agent(&self.model)
            .preamble(&self.preamble)
            .temperature(0.0)
            .build();

        let response = agent
            .chat(prompt, Vec::<Message>::new())
            .await
            .map_err(|e| classification_error(&format!("Rig API request failed: {}", e)))?;

        info!(event_id = event.event_id(), "Received response from Gemini");
        parse_verdict(&response)
    }
}
