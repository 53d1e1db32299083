//! Black-box tests for the sender HTTP surface, run against the in-memory
//! transport (same router as prod, ephemeral port).

use std::sync::Arc;
use std::time::Duration;

use courier_core::{InstanceIdentity, ServiceStats};
use courier_pipeline::memory::{InMemoryActivityLog, InMemoryConsumer, InMemoryQueue};
use courier_pipeline::{Delivery, Producer, QueueConsumer};
use courier_sender::app::{AppState, build_app};
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    log: Arc<InMemoryActivityLog>,
    queue: Arc<InMemoryQueue>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> (Self, InMemoryConsumer) {
        let log = Arc::new(InMemoryActivityLog::new());
        let (queue, consumer) = InMemoryQueue::channel();
        let queue = Arc::new(queue);
        let stats = Arc::new(ServiceStats::new());
        let identity = InstanceIdentity::fixed("sender-test", "#6666ff");

        let producer = Producer::new(log.clone(), queue.clone(), identity.clone(), stats.clone());
        let state = Arc::new(AppState {
            producer,
            log: log.clone(),
            sessions: None,
            identity,
            stats,
        });

        let app = build_app(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (
            Self {
                base_url,
                log,
                queue,
                handle,
            },
            consumer,
        )
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_open() {
    let (srv, _consumer) = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn whitespace_submission_is_rejected_before_any_side_effect() {
    let (srv, mut consumer) = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/messages", srv.base_url))
        .json(&json!({ "message": "   \t  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "empty_message");

    // No activity record, no queue message.
    use courier_pipeline::ActivityLog;
    assert!(srv.log.recent(20).await.unwrap().is_empty());
    let nothing = tokio::time::timeout(Duration::from_millis(50), consumer.next_delivery()).await;
    assert!(nothing.is_err(), "a message reached the queue");
}

#[tokio::test]
async fn valid_submission_persists_and_publishes() {
    let (srv, mut consumer) = TestServer::spawn().await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/messages", srv.base_url))
        .json(&json!({ "message": "  ship it  " }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    let id = body["id"].as_i64().unwrap();

    let status: serde_json::Value = client
        .get(format!("{}/status", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(status["sent_count"], 1);
    assert_eq!(status["node"]["name"], "sender-test");
    assert_eq!(status["recent"][0]["id"], id);
    assert_eq!(status["recent"][0]["message"], "ship it");
    assert!(status["last_sent_at"].is_string());

    let delivery = consumer.next_delivery().await.unwrap();
    assert_eq!(delivery.payload(), b"ship it");
    delivery.ack().await.unwrap();
    assert_eq!(srv.queue.settlements().len(), 1);
}

#[tokio::test]
async fn persistence_failure_maps_to_store_error() {
    let (srv, _consumer) = TestServer::spawn().await;
    srv.log.fail_writes(true);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/messages", srv.base_url))
        .json(&json!({ "message": "doomed" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "store_error");
}

#[tokio::test]
async fn publish_failure_maps_to_bad_gateway() {
    let (srv, _consumer) = TestServer::spawn().await;
    srv.queue.fail_publishes(true);

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/messages", srv.base_url))
        .json(&json!({ "message": "half-done" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "publish_error");

    // The record was written before the publish failed; the gap is accepted.
    use courier_pipeline::ActivityLog;
    assert_eq!(srv.log.recent(20).await.unwrap().len(), 1);
}
