//! Service entry point: load assets once, then serve until shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hemorisk::server::create_router;
use hemorisk::{AppContext, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hemorisk=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env();
    let port = config.port;

    // Configuration failures are fatal: never serve with a broken model.
    let ctx = match AppContext::load(config) {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::error!("startup failed: {err}");
            eprintln!("startup failed: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        n_features = ctx.model.n_features(),
        n_trees = ctx.model.forest().n_trees(),
        "model loaded"
    );
    for spec in &ctx.specs {
        tracing::info!(name = %spec.name, kind = ?spec.kind, "feature");
    }

    let app = create_router(Arc::new(ctx));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("server error");
}
