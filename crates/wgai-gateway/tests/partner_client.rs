//! Outbound relay behavior exercised against a local mock of the partner API.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wgai_gateway::config::PartnerConfig;
use wgai_gateway::{
    gateway_router, ApplicationRequest, ForwardError, PartnerApi, PartnerClient,
    TechnicalAnalysisRequest,
};
use wiremock::matchers::{body_json, header as header_matcher, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn application_payload() -> Value {
    json!({
        "github_url": "https://github.com/realuser",
        "background": "Real background with more than fifty characters in it.",
        "full_name": "Real User",
        "email": "real@example.com",
        "years_experience": 5,
        "skills": ["Python", "FastAPI"],
        "position_applied": "AI Engineer"
    })
}

fn technical_payload() -> Value {
    json!({
        "synopsis": "This document provides a comprehensive overview of microservices architecture patterns, focusing on service decomposition.",
        "key_concepts": ["Service decomposition", "API gateway pattern", "Event-driven architecture"],
        "technical_details": [
            "REST and gRPC for synchronous communication",
            "Apache Kafka for asynchronous messaging",
            "Kubernetes for container orchestration"
        ],
        "analysis": "The microservices architecture presents significant advantages for scalability and team autonomy, allowing independent deployment cycles and technology flexibility per service. However, it introduces complexity in distributed system management.",
        "submitted_by": "angela.developer@example.com"
    })
}

fn application() -> ApplicationRequest {
    ApplicationRequest::from_value(&application_payload()).expect("valid application")
}

fn technical_document() -> TechnicalAnalysisRequest {
    TechnicalAnalysisRequest::from_value(&technical_payload()).expect("valid document")
}

fn client_for(base_url: &str, timeout: Duration) -> PartnerClient {
    let config = PartnerConfig::new(base_url, "phase-one-key", "phase-two-key")
        .expect("valid partner config")
        .with_timeout(timeout);
    PartnerClient::new(&config).expect("client builds")
}

/// Answers the first connection with `reply` verbatim, then holds the socket open for `hold`.
fn raw_partner(reply: &'static [u8], hold: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = [0_u8; 8192];
            let _ = stream.read(&mut request);
            let _ = stream.write_all(reply);
            let _ = stream.flush();
            thread::sleep(hold);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn application_is_posted_with_phase_one_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/hire/me"))
        .and(header_matcher("X-Auth-Key", "phase-one-key"))
        .and(header_matcher("content-type", "application/json"))
        .and(body_json(application_payload()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "app-42" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Duration::from_secs(5));
    let response = client
        .submit_application(&application(), None)
        .await
        .expect("partner accepts");

    assert_eq!(response, json!({ "id": "app-42" }));
}

#[tokio::test]
async fn technical_document_is_posted_with_phase_two_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/api/analyze/technical-document"))
        .and(header_matcher("X-Auth-Key", "phase-two-key"))
        .and(body_json(technical_payload()))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "doc-7" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&format!("{}/", server.uri()), Duration::from_secs(5));
    let response = client
        .analyze_technical_document(&technical_document(), None)
        .await
        .expect("any 2xx is success");

    assert_eq!(response["id"], "doc-7");
}

#[tokio::test]
async fn credential_override_replaces_configured_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/hire/me"))
        .and(header_matcher("X-Auth-Key", "wrong-key-for-testing"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "detail": "Invalid API key" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Duration::from_secs(5));
    let err = client
        .submit_application(&application(), Some("wrong-key-for-testing"))
        .await
        .expect_err("partner rejects the key");

    assert_eq!(err.upstream_status(), Some(StatusCode::UNAUTHORIZED));
    match err {
        ForwardError::UpstreamStatus { body, .. } => assert!(body.contains("Invalid API key")),
        other => panic!("expected upstream status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_upstream_surfaces_as_internal_error_through_router() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/hire/me"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server.uri(), Duration::from_secs(5)));
    let response = gateway_router(client)
        .oneshot(
            Request::post("/submit/application")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&application_payload()).expect("payload encodes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let body: Value = serde_json::from_slice(&body).expect("json payload");
    assert!(body["detail"]
        .as_str()
        .expect("detail string")
        .contains("401"));
}

#[tokio::test]
async fn slow_partner_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/hire/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": "late" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Duration::from_millis(200));
    let err = client
        .submit_application(&application(), None)
        .await
        .expect_err("call exceeds the ceiling");

    assert!(
        matches!(err, ForwardError::TransportTimeout(_)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn closed_port_is_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let client = client_for(&format!("http://{addr}"), Duration::from_secs(5));
    let err = client
        .analyze_technical_document(&technical_document(), None)
        .await
        .expect_err("nothing listens on the port");

    assert!(
        matches!(err, ForwardError::TransportUnreachable(_)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn non_json_success_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/api/hire/me"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server.uri(), Duration::from_secs(5));
    let err = client
        .submit_application(&application(), None)
        .await
        .expect_err("html is not json");

    assert!(
        matches!(err, ForwardError::InvalidResponseBody(_)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn non_http_reply_is_a_transport_failure() {
    let base_url = raw_partner(b"THIS IS NOT HTTP\r\n\r\n", Duration::ZERO);

    let client = client_for(&base_url, Duration::from_secs(5));
    let err = client
        .submit_application(&application(), None)
        .await
        .expect_err("garbage is not a response");

    assert!(matches!(err, ForwardError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn stalled_error_body_times_out() {
    let base_url = raw_partner(
        b"HTTP/1.1 401 Unauthorized\r\nContent-Type: text/plain\r\nContent-Length: 100\r\n\r\npartial",
        Duration::from_secs(3),
    );

    let client = client_for(&base_url, Duration::from_millis(500));
    let err = client
        .submit_application(&application(), None)
        .await
        .expect_err("body never completes");

    assert!(
        matches!(err, ForwardError::TransportTimeout(_)),
        "got {err:?}"
    );
}
