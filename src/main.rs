use axum::Router;
use lantern_watch::config::Config;
use lantern_watch::services::{FileStore, KeyValueStore, MemoryStore, NotificationCenter};
use lantern_watch::sources::BackendClient;
use lantern_watch::tui::{self, LogBuffer, LogMakeWriter};
use lantern_watch::{api, AppState};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "lantern_watch=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env());

    // The console owns the terminal, so logs go to a buffer it renders.
    let log_buffer = Arc::new(LogBuffer::new(1000));
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    if config.tui {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(LogMakeWriter::new(log_buffer.clone())),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!(
        "Starting lantern-watch against {} as {}",
        config.api_base_url, config.operator_rights
    );
    if config.access_token.is_none() {
        warn!("ACCESS_TOKEN is not set; backend requests will be unauthenticated");
    }

    let store: Arc<dyn KeyValueStore> = match FileStore::open(config.state_dir.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(
                "Cannot open state directory {:?} ({}); read state will not survive restarts",
                config.state_dir, e
            );
            Arc::new(MemoryStore::new())
        }
    };

    let backend = Arc::new(BackendClient::new(
        config.api_base_url.clone(),
        config.access_token.clone(),
        config.http_timeout,
    )?);

    let center = Arc::new(NotificationCenter::new(
        backend,
        store,
        config.operator_rights,
        config.locale,
    ));

    let pollers = center.start_polling(config.poll_interval);

    let state = AppState {
        config: config.clone(),
        center: center.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Notification API listening on {}", addr);

    if config.tui {
        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Notification API error: {}", e);
            }
        });

        tui::run_tui(center.clone(), log_buffer).await?;
        server.abort();
    } else {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;
    }

    center.close();
    for poller in pollers {
        poller.shutdown().await;
    }
    info!("lantern-watch stopped");

    Ok(())
}
