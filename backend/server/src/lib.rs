//! Documentation of a one-vote-per-account voting backend.
//!
//! # General Infrastructure
//! - Browser form or `vote-client` talks JSON to this server
//! - Server authenticates the email/password pair against the account directory
//! - Accepted votes land in the ledger, memory for a single instance or Redis
//!   when several instances share one ledger
//!
//!
//!
//! # Endpoints
//!
//! List votes, oldest first.
//! ```sh
//! curl http://localhost:1111/api/votes
//! ```
//!
//! Cast a vote.
//! ```sh
//! curl -X POST http://localhost:1111/api/vote \
//!     -H 'Content-Type: application/json' \
//!     -d '{"email": "voter@example.com", "password": "hunter2"}'
//! ```
//!
//! | Outcome | Status |
//! |---------|--------|
//! | recorded | 201 |
//! | empty field or bad JSON | 400 |
//! | wrong email/password | 401 |
//! | already voted | 409 |
//! | ledger unavailable | 500 |
//!
//! Every failure body is `{ "message": "..." }`.
//!
//!
//!
//! # Setup
//!
//! Accounts file, one entry per voter, value is the SHA-256 of the password.
//! ```sh
//! printf '{"voter@example.com": "%s"}' "$(printf hunter2 | sha256sum | cut -d' ' -f1)" > accounts.json
//! ```
//!
//! Run with the in-memory ledger.
//! ```sh
//! ACCOUNTS_PATH=accounts.json RUST_LOG=info cargo run -p vote
//! ```
//!
//! Run against Redis.
//! ```sh
//! LEDGER_BACKEND=redis REDIS_URL=redis://127.0.0.1:6379 ACCOUNTS_PATH=accounts.json cargo run -p vote
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::ctrl_c;
#[cfg(unix)]
use signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod routes;
pub mod service;
pub mod state;

use config::Config;
use routes::{vote_handler, votes_handler};
use state::State;

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/votes", get(votes_handler))
        .route("/api/vote", post(vote_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: Arc<State>) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let config = Config::load()?;
    let state = State::new(config).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    serve(listener, state).await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
