//! # rulehubd — rulehub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Register the built-in action handlers with their collaborators
//! - Start the background dispatch loop consuming the event bus
//! - Build the axum router and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use rulehub_adapter_http_axum::state::AppState;
use rulehub_adapter_storage_sqlite_sqlx::{SqliteExecutionRepository, SqliteRuleRepository};
use rulehub_adapter_virtual::{
    VirtualMailTransport, VirtualNotificationSink, VirtualStatusChanger, VirtualTaskQueue,
};
use rulehub_adapter_webhook_reqwest::ReqwestWebhookClient;
use rulehub_app::dispatcher::EventDispatcher;
use rulehub_app::event_bus::InProcessEventBus;
use rulehub_app::handlers::HandlerRegistry;
use rulehub_app::recorder::ExecutionRecorder;
use rulehub_app::scheduler::ExecutionScheduler;
use rulehub_app::services::RuleService;
use tokio::sync::broadcast::error::RecvError;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(config.logging.filter.clone())
        .init();

    // Database
    let db = rulehub_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;
    let pool = db.pool().clone();

    // Repositories
    let rules = Arc::new(SqliteRuleRepository::new(pool.clone()));
    let executions = Arc::new(SqliteExecutionRepository::new(pool));

    // Event bus
    let bus = Arc::new(InProcessEventBus::new(config.engine.bus_capacity));

    // Action handlers, backed by the virtual collaborators plus a real
    // HTTP client for webhooks.
    let registry = HandlerRegistry::with_builtins(
        VirtualNotificationSink::default(),
        VirtualMailTransport::default(),
        VirtualStatusChanger::default(),
        VirtualTaskQueue::default(),
        ReqwestWebhookClient::new().map_err(|err| anyhow::anyhow!(err))?,
    );

    // Execution pipeline
    let engine = config.engine_config();
    let scheduler = Arc::new(ExecutionScheduler::new(Arc::new(registry), engine.clone()));
    let recorder = ExecutionRecorder::new(
        Arc::clone(&executions),
        Arc::clone(&rules),
        Arc::clone(&bus),
    );
    let dispatcher = EventDispatcher::new(
        Arc::clone(&rules),
        Arc::clone(&executions),
        recorder.clone(),
        scheduler,
        engine.max_queue_depth,
    );

    // Dispatch loop: consume the bus until every sender is dropped.
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(err) = dispatcher.dispatch(event).await {
                        tracing::warn!(error = %err, "event dispatch failed");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "dispatch loop lagged behind the event bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    // HTTP
    let state = AppState::from_arcs(
        Arc::new(RuleService::new(Arc::clone(&rules))),
        Arc::new(recorder),
        Arc::new(bus),
    );
    let app = rulehub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    tracing::info!(%bind_addr, "rulehubd listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install shutdown handler");
    }
}
