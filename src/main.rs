use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use campus_events_server::auth::JwtService;
use campus_events_server::cache::{DisabledCache, RedisCache, TrendingCache};
use campus_events_server::config::Config;
use campus_events_server::routes::create_routes;
use campus_events_server::state::AppState;
use campus_events_server::store::{EventStore, PgStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let store = Arc::new(
        PgStore::connect(&config.database_url, 5)
            .await
            .expect("Failed to connect to database"),
    );

    let redis = match RedisCache::connect(&config.redis_url, config.cache_op_timeout).await {
        Ok(cache) => Some(Arc::new(cache)),
        Err(e) => {
            error!(error = %e, "Error connecting to Redis, trending will be computed per request");
            None
        }
    };
    let cache: Arc<dyn TrendingCache> = match &redis {
        Some(redis) => Arc::clone(redis) as Arc<dyn TrendingCache>,
        None => Arc::new(DisabledCache),
    };

    let state = AppState::new(
        Arc::clone(&store) as Arc<dyn EventStore>,
        cache,
        JwtService::from_secret(config.jwt_secret.as_bytes()),
    );
    let app = create_routes(state, &config.http);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    if let Some(redis) = redis {
        match Arc::try_unwrap(redis) {
            Ok(redis) => redis.close().await,
            Err(_) => warn!("Redis connection still shared at shutdown, dropping it"),
        }
    }
    store.close().await;
    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
