use std::sync::Arc;

use courier_core::{
    Config, InstanceIdentity, RandomFailureOracle, ServiceStats, UniformDelay,
};
use courier_infra::{ActivityTable, PostgresActivityLog, connect_pool, connect_queue, connect_store};
use courier_pipeline::{ActivityLog, Worker};
use courier_receiver::app::{AppState, build_app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    courier_observability::init();

    let config = Config::from_env()?;
    let identity = InstanceIdentity::generate("receiver");
    tracing::info!(name = identity.name(), color = identity.color(), "starting receiver");

    // Prerequisite connections must establish themselves successfully; both
    // bootstraps retry forever and readiness waits on the slower one.
    let session_store_url = config.session_store_url();
    let (queue, sessions) = tokio::join!(
        connect_queue(&config.queue_url, &config.queue_name),
        connect_store(&session_store_url),
    );

    let pool = connect_pool(&config.db);
    let pg_log = PostgresActivityLog::new(pool, ActivityTable::Processed);
    tracing::debug!("initiating receiver db");
    pg_log.ensure_schema().await?;
    let log: Arc<dyn ActivityLog> = Arc::new(pg_log);

    let stats = Arc::new(ServiceStats::new());
    let worker = Arc::new(Worker::new(
        log.clone(),
        Arc::new(UniformDelay::new(config.processing_time_max_ms)),
        Arc::new(RandomFailureOracle::new(config.random_error_chance)),
        identity.clone(),
        stats.clone(),
    ));

    // One subscription for the process lifetime; each delivery gets its own
    // task, so slow simulated work never blocks intake.
    let consumer = queue.subscribe(identity.name()).await?;
    tokio::spawn(worker.run(consumer));

    let state = Arc::new(AppState {
        log,
        sessions: Some(sessions),
        identity,
        stats,
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "starting receiver app");
    axum::serve(listener, build_app(state)).await?;

    Ok(())
}
