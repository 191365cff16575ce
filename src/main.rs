// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chirp_server::{
    api::router,
    auth::TokenService,
    config::{AppConfig, LogFormat},
    media::{CloudinaryMedia, DisabledMedia, MediaStore},
    state::AppState,
    storage::Database,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    if config.uses_development_secret() {
        warn!("JWT_SECRET not set; using the built-in development secret");
    }

    let database_path = config.database_path();
    let db = Database::open(&database_path)?;
    info!(path = %database_path.display(), "Database opened");

    let media: Arc<dyn MediaStore> = match config.cloudinary.clone() {
        Some(cloudinary) => {
            info!(cloud_name = %cloudinary.cloud_name, "Cloudinary media host configured");
            Arc::new(CloudinaryMedia::new(cloudinary)?)
        }
        None => {
            warn!("Cloudinary credentials not set; image uploads are disabled");
            Arc::new(DisabledMedia)
        }
    };

    let state = AppState::new(db, TokenService::new(&config.jwt_secret, config.token_ttl))
        .with_media(media)
        .with_secure_cookies(config.secure_cookies());
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Chirp server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
