//! End-to-end pipeline exercise over the in-memory transport:
//! submit → persist → publish → consume → simulate → persist → ack.

use std::sync::Arc;

use courier_core::{InstanceIdentity, NeverFail, Payload, ServiceStats};
use courier_pipeline::memory::{FixedDelays, InMemoryActivityLog, InMemoryQueue, Settlement};
use courier_pipeline::{ActivityLog, Producer, Worker};

#[tokio::test(start_paused = true)]
async fn payload_round_trips_into_both_logs() {
    let sender_log = Arc::new(InMemoryActivityLog::new());
    let receiver_log = Arc::new(InMemoryActivityLog::new());
    let (queue, consumer) = InMemoryQueue::channel();
    let queue = Arc::new(queue);

    let producer = Producer::new(
        sender_log.clone(),
        queue.clone(),
        InstanceIdentity::fixed("sender-1", "#6666ff"),
        Arc::new(ServiceStats::new()),
    );

    let receiver_stats = Arc::new(ServiceStats::new());
    let worker = Arc::new(Worker::new(
        receiver_log.clone(),
        Arc::new(FixedDelays::new([40])),
        Arc::new(NeverFail),
        InstanceIdentity::fixed("receiver-1", "#ff6666"),
        receiver_stats.clone(),
    ));
    let run = tokio::spawn(worker.run(consumer));

    let payload = Payload::parse("  one unit of work  ").unwrap();
    producer.submit(&payload).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    let sent = sender_log.recent(20).await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].message, "one unit of work");
    assert_eq!(sent[0].processed_by, "sender-1");

    let processed = receiver_log.recent(20).await.unwrap();
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].message, "one unit of work");
    assert_eq!(processed[0].processed_by, "receiver-1");
    assert_eq!(processed[0].processing_ms, Some(40));

    assert_eq!(receiver_stats.handled_count(), 1);
    assert_eq!(
        queue.settlements(),
        vec![Settlement::Acked(b"one unit of work".to_vec())]
    );

    drop(producer);
    drop(queue);
    run.await.unwrap();
}
