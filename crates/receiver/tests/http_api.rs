//! Black-box tests for the receiver HTTP surface, with the consumer worker
//! running against the in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use courier_core::{InstanceIdentity, NeverFail, ServiceStats, UniformDelay};
use courier_pipeline::memory::{InMemoryActivityLog, InMemoryQueue, Settlement};
use courier_pipeline::{QueuePublisher, Worker};
use courier_receiver::app::{AppState, build_app};
use reqwest::StatusCode;

struct TestServer {
    base_url: String,
    log: Arc<InMemoryActivityLog>,
    queue: Arc<InMemoryQueue>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Spawn the receiver app plus a worker wired to an in-memory queue.
    async fn spawn() -> Self {
        let log = Arc::new(InMemoryActivityLog::new());
        let (queue, consumer) = InMemoryQueue::channel();
        let queue = Arc::new(queue);
        let stats = Arc::new(ServiceStats::new());
        let identity = InstanceIdentity::fixed("receiver-test", "#ff6666");

        let worker = Arc::new(Worker::new(
            log.clone(),
            Arc::new(UniformDelay::new(5)),
            Arc::new(NeverFail),
            identity.clone(),
            stats.clone(),
        ));
        tokio::spawn(worker.run(consumer));

        let state = Arc::new(AppState {
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

        Self {
            base_url,
            log,
            queue,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn received_eventually(
    client: &reqwest::Client,
    base_url: &str,
    count: u64,
) -> serde_json::Value {
    // Processing is asynchronous; poll briefly until the worker catches up.
    for _ in 0..100 {
        let body: serde_json::Value = client
            .get(format!("{base_url}/received"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        if body["processed_count"].as_u64() == Some(count) {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("worker did not process {count} messages within timeout");
}

#[tokio::test]
async fn empty_view_before_any_message() {
    let srv = TestServer::spawn().await;

    let body: serde_json::Value = reqwest::get(format!("{}/received", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["processed_count"], 0);
    assert!(body["last_processed_at"].is_null());
    assert_eq!(body["recent"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn consumed_messages_show_up_in_the_activity_view() {
    let srv = TestServer::spawn().await;

    srv.queue.publish(b"first").await.unwrap();
    srv.queue.publish(b"second").await.unwrap();

    let client = reqwest::Client::new();
    let body = received_eventually(&client, &srv.base_url, 2).await;

    assert_eq!(body["node"]["name"], "receiver-test");
    assert!(body["last_processed_at"].is_string());

    let recent = body["recent"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    for row in recent {
        assert!(row["processing_ms"].as_i64().unwrap() >= 0);
        assert_eq!(row["processed_by"], "receiver-test");
    }

    // Both deliveries were acked exactly once. The counter is bumped just
    // before the ack, so give the in-flight acks a moment to land.
    for _ in 0..100 {
        if srv.queue.settlements().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let settlements = srv.queue.settlements();
    assert_eq!(settlements.len(), 2);
    assert!(settlements
        .iter()
        .all(|s| matches!(s, Settlement::Acked(_))));
}

#[tokio::test]
async fn store_failure_maps_to_store_error() {
    let srv = TestServer::spawn().await;
    srv.log.fail_reads(true);

    let res = reqwest::get(format!("{}/received", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "store_error");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn health_is_open() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}
