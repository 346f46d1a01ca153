//! Serves pocketbook over HTTPS.

use std::{env, error::Error, fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::{Handle, tls_rustls::RustlsConfig};
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pocketbook::{AppState, build_router, graceful_shutdown, logging_middleware};

/// The environment variable the cookie key is derived from.
const SECRET_VAR: &str = "SECRET";
const DEBUG_LOG_PATH: &str = "debug.log";

/// The web server for pocketbook.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: PathBuf,

    /// Directory holding the TLS certificate `cert.pem` and key `key.pem`.
    #[arg(long)]
    cert_path: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging()?;
    let args = Args::parse();

    let secret = env::var(SECRET_VAR)
        .map_err(|_| format!("the environment variable {SECRET_VAR} must be set"))?;
    let tls_config = RustlsConfig::from_pem_file(
        args.cert_path.join("cert.pem"),
        args.cert_path.join("key.pem"),
    )
    .await?;
    let state = AppState::new(Connection::open(&args.db_path)?, &secret, &args.timezone)?;

    let router = with_request_spans(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );
    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let address = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTPS server listening on {address}");
    axum_server::bind_rustls(address, tls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log INFO and above to stdout and DEBUG and above to [DEBUG_LOG_PATH].
fn init_logging() -> Result<(), Box<dyn Error>> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(DEBUG_LOG_PATH)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_filter(LevelFilter::INFO),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .pretty()
                .with_ansi(false)
                .with_writer(Arc::new(log_file))
                .with_filter(LevelFilter::DEBUG),
        )
        .try_init()?;

    Ok(())
}

/// Open a debug span per request, named after the matched route.
fn with_request_spans(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request| {
                let route = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);

                tracing::debug_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    route
                )
            })
            // Handlers log their own errors.
            .on_failure(()),
    )
}
