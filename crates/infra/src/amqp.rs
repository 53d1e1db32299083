//! RabbitMQ adapter (lapin): durable queue bootstrap, persistent publish,
//! manual-ack consumption.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, BasicRejectOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::error;

use courier_pipeline::{AckError, Delivery, PublishError, QueueConsumer, QueuePublisher};

use crate::bootstrap::connect_with_retry;

/// Marks a published message as persistent (survives a broker restart).
const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// Process-lifetime queue resources: the connection is held only to keep the
/// channel alive.
pub struct QueueHandle {
    _connection: Connection,
    channel: Channel,
    queue_name: String,
}

/// Bootstrap the durable queue: connect, open a channel, and declare the
/// named queue with durability enabled. Retries forever on failure.
pub async fn connect_queue(url: &str, queue_name: &str) -> QueueHandle {
    connect_with_retry("rabbitmq", || try_connect(url, queue_name)).await
}

async fn try_connect(url: &str, queue_name: &str) -> Result<QueueHandle, lapin::Error> {
    let connection = Connection::connect(url, ConnectionProperties::default()).await?;
    let channel = connection.create_channel().await?;
    channel
        .queue_declare(
            queue_name,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    Ok(QueueHandle {
        _connection: connection,
        channel,
        queue_name: queue_name.to_string(),
    })
}

impl QueueHandle {
    /// Producer-side view of the queue.
    pub fn publisher(&self) -> AmqpQueue {
        AmqpQueue {
            channel: self.channel.clone(),
            queue_name: self.queue_name.clone(),
        }
    }

    /// Subscribe once, for the process lifetime, in manual-ack mode.
    ///
    /// No `basic_qos` is issued: prefetch is unbounded in this design, so
    /// any number of deliveries may be in flight at once.
    pub async fn subscribe(&self, consumer_tag: &str) -> Result<AmqpConsumer, lapin::Error> {
        let inner = self
            .channel
            .basic_consume(
                &self.queue_name,
                consumer_tag,
                BasicConsumeOptions {
                    no_ack: false,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        Ok(AmqpConsumer { inner })
    }
}

/// Publishes payloads to the named durable queue via the default exchange.
#[derive(Clone)]
pub struct AmqpQueue {
    channel: Channel,
    queue_name: String,
}

#[async_trait]
impl QueuePublisher for AmqpQueue {
    async fn publish(&self, payload: &[u8]) -> Result<(), PublishError> {
        // Fire-and-forget: the returned publisher confirm is dropped
        // unawaited. A broker crash between the activity-log write and this
        // publish reaching disk can lose a message already recorded as sent.
        self.channel
            .basic_publish(
                "",
                &self.queue_name,
                BasicPublishOptions::default(),
                payload,
                BasicProperties::default().with_delivery_mode(DELIVERY_MODE_PERSISTENT),
            )
            .await
            .map_err(|err| PublishError(err.to_string()))?;

        Ok(())
    }
}

/// Manual-ack subscription stream.
pub struct AmqpConsumer {
    inner: lapin::Consumer,
}

#[async_trait]
impl QueueConsumer for AmqpConsumer {
    async fn next_delivery(&mut self) -> Option<Box<dyn Delivery>> {
        loop {
            match self.inner.next().await? {
                Ok(delivery) => return Some(Box::new(AmqpDelivery { inner: delivery })),
                Err(err) => {
                    // Transient stream error; the subscription itself is
                    // still alive, so keep pulling.
                    error!(%err, "failed to receive delivery");
                }
            }
        }
    }
}

struct AmqpDelivery {
    inner: lapin::message::Delivery,
}

#[async_trait]
impl Delivery for AmqpDelivery {
    fn payload(&self) -> &[u8] {
        &self.inner.data
    }

    async fn ack(self: Box<Self>) -> Result<(), AckError> {
        self.inner
            .acker
            .ack(BasicAckOptions::default())
            .await
            .map_err(|err| AckError(err.to_string()))
    }

    async fn reject(self: Box<Self>) -> Result<(), AckError> {
        // requeue stays false; redelivery is the broker's decision.
        self.inner
            .acker
            .reject(BasicRejectOptions { requeue: false })
            .await
            .map_err(|err| AckError(err.to_string()))
    }
}
