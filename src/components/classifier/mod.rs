#[cfg(feature = "gemini")]
mod gemini;
pub mod policy;
pub mod rules;
pub mod verdict;

#[cfg(feature = "gemini")]
pub use gemini::GeminiClassifier;
pub use policy::{ClassificationPolicy, PolicyExample, RuleMatch};
pub use rules::RuleClassifier;

use crate::components::event::CalendarEvent;
use crate::config::{ClassifierBackend, Config};
#[cfg(feature = "gemini")]
use crate::error::env_error;
use crate::error::{component_error, VahtiResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Capability that decides whether an event is spam.
///
/// Implementations must not alter the verdict after producing it; the flow
/// logs and branches on exactly what `classify` returns.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    /// Classify one event, `true` meaning spam
    async fn classify(&self, event: &CalendarEvent) -> VahtiResult<bool>;
}

/// Build the classifier selected by the configuration
pub fn build_classifier(config: &Config) -> VahtiResult<Arc<dyn Classifier>> {
    match config.classifier_backend {
        ClassifierBackend::Rules => Ok(Arc::new(RuleClassifier::new(config.policy.clone()))),
        #[cfg(feature = "gemini")]
        ClassifierBackend::Gemini => {
            let api_key = config
                .gemini_api_key
                .as_deref()
                .ok_or_else(|| env_error("GEMINI_API_KEY"))?;
            Ok(Arc::new(GeminiClassifier::new(
                api_key,
                &config.gemini_model,
                &config.policy,
            )))
        }
        #[cfg(not(feature = "gemini"))]
        ClassifierBackend::Gemini => {
            Err(component_error(
                "Gemini backend requested but the crate was built without the `gemini` feature",
            ))
        }
    }
}

/// Classifier component, owns the configured backend
#[derive(Default)]
pub struct ClassifierComponent {
    classifier: RwLock<Option<Arc<dyn Classifier>>>,
}

impl ClassifierComponent {
    /// Create a new classifier component
    pub fn new() -> Self {
        Self {
            classifier: RwLock::new(None),
        }
    }

    /// Get the classifier if the component has been initialized
    pub async fn get_classifier(&self) -> Option<Arc<dyn Classifier>> {
        self.classifier.read().await.clone()
    }
}

#[async_trait]
impl super::Component for ClassifierComponent {
    fn name(&self) -> &'static str {
        "classifier"
    }

    async fn init(&self, config: Arc<RwLock<Config>>) -> VahtiResult<()> {
        let mut classifier_lock = self.classifier.write().await;
        if classifier_lock.is_some() {
            return Ok(());
        }

        let classifier = {
            let config_read = config.read().await;
            build_classifier(&config_read)?
        };
        info!("Classifier backend: {}", classifier.name());
        *classifier_lock = Some(classifier);

        Ok(())
    }

    async fn shutdown(&self) -> VahtiResult<()> {
        self.classifier.write().await.take();
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Fetch the initialized classifier or fail with a component error
pub async fn require_classifier(component: &ClassifierComponent) -> VahtiResult<Arc<dyn Classifier>> {
    component
        .get_classifier()
        .await
        .ok_or_else(|| component_error("Classifier component has not been initialized"))
}
