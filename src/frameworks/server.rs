// Framework bootstrap for the simulation server runtime.

use crate::domain::{MonotonicSource, SimError, TickClock, World};
use crate::frameworks::config;
use crate::interface_adapters::net::{spawn_projectile_handler, spawn_serializers, ws_handler};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{GameEvent, ServerState, SimNotice, WorldChannels, WorldUpdate, world_task};

use axum::{
    Router,
    extract::ws::Utf8Bytes,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc};
use tokio::sync::{Notify, broadcast, mpsc, watch};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    // build state
    let state = build_state()?;
    // Start the Web Server
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .route("/projectiles", post(spawn_projectile_handler))
        .with_state(state);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Result<Arc<AppState>> {
    let tuning = config::sim_tuning().map_err(|e| {
        let err = SimError::from(e);
        tracing::error!(error = %err, "refusing to start");
        std::io::Error::other(err)
    })?;
    let world = World::new(tuning)
        .map_err(|e| std::io::Error::other(format!("failed to build world: {e}")))?;
    let clock = TickClock::new(MonotonicSource::new(), tuning.max_clock_delta)
        .map_err(|e| std::io::Error::other(format!("failed to build clock: {e}")))?;
    let tick_interval = config::tick_interval();
    tracing::debug!(
        ?tuning,
        tick_interval_ms = tick_interval.as_millis(),
        "simulation configured"
    );

    // Setup Channels
    // input_tx/rx: client inputs and spawn requests go to the single world task.
    let (input_tx, input_rx) = mpsc::channel::<GameEvent>(config::INPUT_CHANNEL_CAPACITY);
    // world_tx/notice_tx: domain-level broadcasts, serialized once below.
    let (world_tx, _world_rx) =
        broadcast::channel::<WorldUpdate>(config::WORLD_BROADCAST_CAPACITY);
    let (notice_tx, _notice_rx) =
        broadcast::channel::<SimNotice>(config::NOTICE_BROADCAST_CAPACITY);
    let (world_bytes_tx, _world_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::WORLD_BROADCAST_CAPACITY);
    let (world_latest_tx, _world_latest_rx) = watch::channel::<Utf8Bytes>(Utf8Bytes::from(""));
    let (notice_bytes_tx, _notice_bytes_rx) =
        broadcast::channel::<Utf8Bytes>(config::NOTICE_BROADCAST_CAPACITY);
    let (server_state_tx, _server_state_rx) = watch::channel(ServerState::Running);

    let state = Arc::new(AppState {
        input_tx,
        world_bytes_tx,
        world_latest_tx,
        notice_bytes_tx,
        server_state_tx: server_state_tx.clone(),
    });

    // Serializers subscribe before the world task can publish its first tick.
    spawn_serializers(&world_tx, &notice_tx, &state);

    // The server runs until the process exits, so nothing ever notifies this.
    let shutdown = Arc::new(Notify::new());
    tokio::spawn(world_task(
        world,
        clock,
        WorldChannels {
            input_rx,
            world_tx,
            notice_tx,
            server_state_tx,
        },
        tick_interval,
        shutdown,
    ));

    Ok(state)
}
