//! Charades Back binary entrypoint wiring REST, SSE, the turn timer and snapshot persistence.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::{net::TcpListener, runtime::Handle};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charades_back::{
    config::AppConfig,
    content::ContentProvider,
    dao::{prompts::ImageDirectorySource, snapshot_store::FileSnapshotStore},
    routes,
    services::{game_service, timer::CountdownTimer},
    state::{AppState, GameController, SharedState},
};

/// URL prefix the image deck is served under.
const IMAGES_ROUTE: &str = "/images";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let images_dir = config.images_dir().clone();
    let store = Arc::new(FileSnapshotStore::new(config.snapshot_path().clone()));
    let images = Arc::new(ImageDirectorySource::new(images_dir.clone(), IMAGES_ROUTE));
    let (timer, timer_events) = CountdownTimer::new(Handle::current());

    let controller = GameController::restore(
        store,
        Arc::new(timer),
        images,
        config.controller_settings(),
    );
    let app_state = AppState::new(controller, content_provider());

    tokio::spawn(game_service::run_timer_dispatcher(
        app_state.clone(),
        timer_events,
    ));

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state, &images_dir);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    // Single-device game: only the local browser talks to us.
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, images = %images_dir.display(), "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

#[cfg(feature = "openrouter")]
fn content_provider() -> Arc<dyn ContentProvider> {
    charades_back::content::openrouter::provider_from_env()
}

#[cfg(not(feature = "openrouter"))]
fn content_provider() -> Arc<dyn ContentProvider> {
    info!("built without OpenRouter support; word generation disabled");
    Arc::new(charades_back::content::DisabledProvider)
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState, images_dir: &std::path::Path) -> Router<()> {
    routes::router(state)
        .nest_service(IMAGES_ROUTE, ServeDir::new(images_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
