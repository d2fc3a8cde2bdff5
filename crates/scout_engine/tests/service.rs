use std::time::Duration;

use scout_core::SearchRequest;
use scout_engine::{
    FailureKind, JobHandle, JobStatus, ReqwestScrapeService, ScrapeService, ServiceSettings,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service_for(server: &MockServer) -> ReqwestScrapeService {
    ReqwestScrapeService::new(ServiceSettings {
        base_url: server.uri(),
        ..ServiceSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn submit_posts_query_and_returns_job_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .and(body_json(json!({
            "search_query": "tech reviews",
            "max_channel_links": 7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "queued",
            "message": "Scrape job added to queue.",
            "job_id": "5f1c"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let request = SearchRequest::parse("tech reviews", "7").unwrap();

    let job = service.submit(&request).await.expect("submit ok");
    assert_eq!(job, JobHandle { id: "5f1c".to_string() });
}

#[tokio::test]
async fn submit_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let request = SearchRequest::parse("tech", "").unwrap();

    let err = service.submit(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn synchronous_protocol_response_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "channel_details": []
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let request = SearchRequest::parse("tech", "3").unwrap();

    let err = service.submit(&request).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::MissingJobId);
}

#[tokio::test]
async fn job_status_decodes_completed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed",
            "job_id": "abc",
            "channel_urls": [{"channel_url": "https://www.youtube.com/@one"}],
            "channel_details": [{
                "channel_url": "https://www.youtube.com/@one",
                "nationality": "Canada",
                "joined_on": "Not found",
                "subscribers": "2.1K",
                "videos_count": "12 videos",
                "total_views": "Not found"
            }]
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let report = service
        .job_status(&JobHandle { id: "abc".to_string() })
        .await
        .expect("status ok");

    assert_eq!(report.status, JobStatus::Completed);
    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.channel_url, "https://www.youtube.com/@one");
    assert_eq!(record.nationality.as_deref(), Some("Canada"));
    assert_eq!(record.joined_on, None);
    assert_eq!(record.total_views, None);
}

#[tokio::test]
async fn job_status_reports_not_found_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/queued-job"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "not_found",
            "message": "Scrape results not found for this job ID."
        })))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service
        .job_status(&JobHandle {
            id: "queued-job".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn job_status_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"status": "pending"})),
        )
        .mount(&server)
        .await;

    let service = ReqwestScrapeService::new(ServiceSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..ServiceSettings::default()
    })
    .expect("client");

    let err = service
        .job_status(&JobHandle {
            id: "slow".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn job_status_rejects_non_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let service = service_for(&server);
    let err = service
        .job_status(&JobHandle {
            id: "garbled".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}
