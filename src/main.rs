mod assets;
mod cli;
mod clients;
mod config;
mod handlers;
mod models;
mod pipeline;
mod routes;
mod store;
mod watch;
mod websocket;

use std::panic;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;
use clients::render_client::RenderClient;
use config::Config;
use store::DocStore;

/// Shared state handed to every request handler.
pub struct AppState {
    pub store: Arc<DocStore>,
    pub style: String,
    pub root: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "mdview=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    let args = Cli::parse();

    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    let root = std::env::current_dir()
        .and_then(|dir| dir.canonicalize())
        .unwrap_or_else(|e| panic!("Failed to resolve working directory: {e}"));

    let style = assets::fetch_style()
        .await
        .unwrap_or_else(|e| panic!("Failed to fetch stylesheet: {e}"));
    info!("Stylesheet fetched ({} bytes)", style.len());

    let renderer = RenderClient::new(config.github_token, args.context, args.api_url)
        .unwrap_or_else(|e| panic!("Failed to construct render client: {e}"));

    let store = Arc::new(DocStore::new());
    for path in &args.paths {
        // Directories show up in the navigation once files under them render.
        if path.is_file() {
            store.register(&watch::doc_id(path, &root)).await;
        }
    }

    let changes = match args.poll {
        Some(secs) => {
            info!("Polling modification times every {}s", secs);
            watch::poll::spawn(args.paths, Duration::from_secs(secs))
        }
        None => watch::notifier::spawn(args.paths)
            .unwrap_or_else(|e| panic!("Failed to start file watcher: {e}")),
    };

    tokio::spawn(pipeline::run(changes, renderer, store.clone(), root.clone()));

    let state = Arc::new(AppState { store, style, root });
    let app = routes::create_routes(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", addr));

    info!("🚀 Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
