use serde_json::json;
use techlens_client::{AnalysisClient, ClientConfig, PollPhase, PollSettings, StatusPoller};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn poller_follows_backend_to_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/technologies/9/analysis-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "technologyId": 9,
            "components": {
                "comparisonAxes": {"status": "complete"},
                "medicalAssessment": {"status": "error", "errorMessage": "No fee schedule for region"}
            },
            "overall": "complete",
            "pollingRecommendation": {"intervalMs": 5000}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AnalysisClient::new(ClientConfig::new(server.uri())).unwrap();
    let poller = StatusPoller::new(client, PollSettings::default());
    poller.start("9", true);

    let view = poller.settled().await;
    assert_eq!(view.phase, PollPhase::Idle);
    assert!(!view.loading);
    assert!(!poller.is_polling());

    let status = poller.snapshot().expect("snapshot");
    assert!(status.is_terminal());
    assert_eq!(
        status.error_message("medicalAssessment"),
        Some("No fee schedule for region")
    );
}

#[tokio::test]
async fn poller_records_http_failure_and_keeps_polling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/technologies/9/analysis-status"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = AnalysisClient::new(ClientConfig::new(server.uri())).unwrap();
    let poller = StatusPoller::new(client, PollSettings::default());
    let mut updates = poller.subscribe();
    poller.start("9", true);

    let view = updates
        .wait_for(|v| v.fetch_count == 1)
        .await
        .unwrap()
        .clone();
    assert_eq!(view.phase, PollPhase::Scheduled);
    assert_eq!(view.next_delay, Some(std::time::Duration::from_secs(30)));
    assert!(view.snapshot.is_none());
    assert!(view.error.unwrap().contains("502"));

    poller.stop();
    assert_eq!(poller.phase(), PollPhase::Stopped);
}
