use crate::components::classifier::Classifier;
use crate::components::event::{parse_event, CalendarEvent};
use crate::components::webhook::{NotificationOutcome, Notifier};
use crate::error::{classification_error, Error, VahtiResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Name the classification flow is served under
pub const FLOW_NAME: &str = "classify-calendar-event";

/// Report of a single flow invocation
#[derive(Debug, Clone, Serialize)]
pub struct FlowRun {
    pub run_id: Uuid,
    pub flow: String,
    pub event_id: String,
    pub is_spam: bool,
    /// Present only when the event was flagged and a notifier is configured
    pub notification: Option<NotificationOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// The classification flow: parse, classify, then notify on spam.
///
/// Invocations share no mutable state, so one instance serves any number of
/// concurrent runs.
pub struct ClassifyCalendarEvent {
    classifier: Arc<dyn Classifier>,
    notifier: Option<Arc<dyn Notifier>>,
    policy_name: String,
    classifier_timeout: Option<Duration>,
}

impl ClassifyCalendarEvent {
    /// Create a flow without a notifier
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            notifier: None,
            policy_name: String::from("default"),
            classifier_timeout: None,
        }
    }

    /// Notify this notifier whenever an event is flagged
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Name of the policy the classifier was built from
    pub fn with_policy_name(mut self, policy_name: impl Into<String>) -> Self {
        self.policy_name = policy_name.into();
        self
    }

    /// Fail the run when the classifier takes longer than `timeout`
    pub fn with_classifier_timeout(mut self, timeout: Duration) -> Self {
        self.classifier_timeout = Some(timeout);
        self
    }

    pub fn name(&self) -> &'static str {
        FLOW_NAME
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// Run the flow for one serialized event.
    ///
    /// Malformed input fails before the classifier is called. Classification
    /// errors fail the run. Notification problems never do; they end up in
    /// [`FlowRun::notification`].
    pub async fn run(&self, event_json: &str) -> VahtiResult<FlowRun> {
        let run_id = Uuid::new_v4();
        let span = info_span!("flow_run", flow = FLOW_NAME, %run_id);
        self.execute(run_id, event_json).instrument(span).await
    }

    async fn execute(&self, run_id: Uuid, event_json: &str) -> VahtiResult<FlowRun> {
        let started_at = Utc::now();
        info!("Classifying event: {}", event_json);

        let event = parse_event(event_json).map_err(|e| {
            error!("Rejected event payload: {}", e);
            e
        })?;

        let is_spam = self.classify(&event).await.map_err(|e| {
            error!(backend = self.classifier.name(), "Classification failed: {}", e);
            match e {
                Error::Classification(_) => e,
                other => Error::Classification(other.to_string()),
            }
        })?;

        info!(event_id = event.event_id(), "Is spam: {}", is_spam);

        let notification = match (&self.notifier, is_spam) {
            (Some(notifier), true) => Some(notifier.notify(event.event_id()).await),
            _ => None,
        };

        Ok(FlowRun {
            run_id,
            flow: FLOW_NAME.to_string(),
            event_id: event.event_id().to_string(),
            is_spam,
            notification,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn classify(&self, event: &CalendarEvent) -> VahtiResult<bool> {
        let Some(limit) = self.classifier_timeout else {
            return self.classifier.classify(event).await;
        };
        tokio::time::timeout(limit, self.classifier.classify(event))
            .await
            .map_err(|_| {
                classification_error(&format!(
                    "{} classifier timed out after {:?}",
                    self.classifier.name(),
                    limit
                ))
            })?
    }
}
