//! Infrastructure layer: RabbitMQ, Postgres, Redis, bootstrap.

pub mod activity_log;
pub mod amqp;
pub mod bootstrap;
pub mod sessions;

pub use activity_log::{ActivityTable, PostgresActivityLog, connect_pool};
pub use amqp::{AmqpConsumer, AmqpQueue, QueueHandle, connect_queue};
pub use bootstrap::{RETRY_DELAY, connect_with_retry};
pub use sessions::{SessionStore, connect_store};
