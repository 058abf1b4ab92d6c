use async_trait::async_trait;
use kalenterivahti::components::classifier::Classifier;
use kalenterivahti::components::event::CalendarEvent;
use kalenterivahti::components::webhook::{
    NotificationOutcome, Notifier, ResponseBody, WebhookHandle,
};
use kalenterivahti::error::VahtiResult;
use kalenterivahti::flow::ClassifyCalendarEvent;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SPAM_EVENT: &str = r#"{"description":"asdfiyb12","invitee_email":"parash.hallur@kyndryl.com","event_id":"e1","created_date":"","event_name":""}"#;
const LEGIT_EVENT: &str = r#"{"description":"Troubleshoot Kubernetes Helm chart for Prefect work pool","invitee_email":"kiran.jayasheela@mercedes-benz.com","event_id":"e2","created_date":"","event_name":""}"#;

/// Classifier returning a fixed verdict
struct FixedClassifier(bool);

#[async_trait]
impl Classifier for FixedClassifier {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn classify(&self, _event: &CalendarEvent) -> VahtiResult<bool> {
        Ok(self.0)
    }
}

fn webhook_for(uri: &str) -> WebhookHandle {
    let endpoint = Url::parse(uri).unwrap();
    WebhookHandle::new(endpoint, Duration::from_secs(5)).unwrap()
}

fn flow_for(verdict: bool, handle: WebhookHandle) -> ClassifyCalendarEvent {
    let notifier: Arc<dyn Notifier> = Arc::new(handle);
    ClassifyCalendarEvent::new(Arc::new(FixedClassifier(verdict))).with_notifier(notifier)
}

#[tokio::test]
async fn test_spam_event_posts_exactly_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(json!({"event_id": "e1", "test": "event"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"received": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let flow = flow_for(true, webhook_for(&mock_server.uri()));
    let run = flow.run(SPAM_EVENT).await.unwrap();

    assert!(run.is_spam);
    assert_eq!(
        run.notification,
        Some(NotificationOutcome::Delivered {
            http_status: 200,
            body: ResponseBody::Json(json!({"received": true})),
        })
    );

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body, json!({"event_id": "e1", "test": "event"}));
}

#[tokio::test]
async fn test_legit_event_posts_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let flow = flow_for(false, webhook_for(&mock_server.uri()));
    let run = flow.run(LEGIT_EVENT).await.unwrap();

    assert!(!run.is_spam);
    assert!(run.notification.is_none());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_plain_text_response_is_kept_as_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Accepted"))
        .mount(&mock_server)
        .await;

    let run = flow_for(true, webhook_for(&mock_server.uri()))
        .run(SPAM_EVENT)
        .await
        .unwrap();

    assert_eq!(
        run.notification,
        Some(NotificationOutcome::Delivered {
            http_status: 200,
            body: ResponseBody::Text("Accepted".to_string()),
        })
    );
}

#[tokio::test]
async fn test_server_error_does_not_fail_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let run = flow_for(true, webhook_for(&mock_server.uri()))
        .run(SPAM_EVENT)
        .await
        .unwrap();

    assert!(run.is_spam);
    assert!(matches!(
        run.notification,
        Some(NotificationOutcome::Rejected { http_status: 500, .. })
    ));
}

#[tokio::test]
async fn test_undecodable_json_does_not_fail_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
        .mount(&mock_server)
        .await;

    let run = flow_for(true, webhook_for(&mock_server.uri()))
        .run(SPAM_EVENT)
        .await
        .unwrap();

    assert!(matches!(run.notification, Some(NotificationOutcome::Failed { .. })));
}

#[tokio::test]
async fn test_connection_error_does_not_fail_the_run() {
    // Nothing listens on port 1
    let run = flow_for(true, webhook_for("http://127.0.0.1:1/"))
        .run(SPAM_EVENT)
        .await
        .unwrap();

    assert!(run.is_spam);
    assert!(matches!(run.notification, Some(NotificationOutcome::Failed { .. })));
}

#[tokio::test]
async fn test_slow_webhook_times_out_without_failing_the_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let endpoint = Url::parse(&mock_server.uri()).unwrap();
    let handle = WebhookHandle::new(endpoint, Duration::from_millis(200)).unwrap();

    let run = flow_for(true, handle).run(SPAM_EVENT).await.unwrap();

    assert!(run.is_spam);
    assert!(matches!(run.notification, Some(NotificationOutcome::Failed { .. })));
}

#[tokio::test]
async fn test_stopped_actor_reports_failure() {
    let handle = webhook_for("http://127.0.0.1:1/");
    handle.shutdown().await.unwrap();

    let outcome = handle.notify("e1").await;
    assert!(matches!(outcome, NotificationOutcome::Failed { .. }));
}
