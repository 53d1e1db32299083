use std::sync::Arc;

use courier_core::{Config, InstanceIdentity, ServiceStats};
use courier_infra::{ActivityTable, PostgresActivityLog, connect_pool, connect_queue, connect_store};
use courier_pipeline::{ActivityLog, Producer};
use courier_sender::app::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    courier_observability::init();

    let config = Config::from_env()?;
    let identity = InstanceIdentity::generate("sender");
    tracing::info!(name = identity.name(), color = identity.color(), "starting sender");

    // Prerequisite connections must establish themselves successfully; both
    // bootstraps retry forever and readiness waits on the slower one.
    let session_store_url = config.session_store_url();
    let (queue, sessions) = tokio::join!(
        connect_queue(&config.queue_url, &config.queue_name),
        connect_store(&session_store_url),
    );

    let pool = connect_pool(&config.db);
    let pg_log = PostgresActivityLog::new(pool, ActivityTable::Sent);
    tracing::debug!("initiating sender db");
    pg_log.ensure_schema().await?;
    let log: Arc<dyn ActivityLog> = Arc::new(pg_log);

    let stats = Arc::new(ServiceStats::new());
    let producer = Producer::new(
        log.clone(),
        Arc::new(queue.publisher()),
        identity.clone(),
        stats.clone(),
    );

    let state = Arc::new(AppState {
        producer,
        log,
        sessions: Some(sessions),
        identity,
        stats,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "starting sender app");
    axum::serve(listener, build_app(state)).await?;

    Ok(())
}
