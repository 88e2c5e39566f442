// ABOUTME: The formiq binary: HTTP server, standalone worker, and seed command

use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use clap::{Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::Config;
use formiq_ai::AiService;
use formiq_api::{create_router, AppState};
use formiq_projects::DbState;

#[derive(Parser)]
#[command(name = "formiq", about = "Goal-to-roadmap generation service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve,
    /// Run the workflow wiring without an HTTP listener
    Worker,
    /// Apply migrations and seed the development data, then exit
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Worker => worker(config).await,
        Commands::Seed => seed(config).await,
    }
}

async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let db = DbState::init(&config.database_url).await?;
    let service = AiService::new(config.require_api_key()?, config.openai_model.clone());
    Ok(AppState::with_ai_service(db, service))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = build_state(&config).await?;

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("FormIQ API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn worker(config: Config) -> anyhow::Result<()> {
    // Same wiring as serve; workflows started elsewhere against this database
    // would need a shared engine, so for now this validates config and waits.
    let _state = build_state(&config).await?;

    info!("FormIQ worker ready (in-process runtime); press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;
    info!("Worker shutting down");

    Ok(())
}

async fn seed(config: Config) -> anyhow::Result<()> {
    let pool = formiq_storage::connect(&config.database_url).await?;
    formiq_storage::seed(&pool).await?;

    info!(
        "Seeded test user and intake form '{}' into {}",
        formiq_storage::INTAKE_FORM_NAME, config.database_url
    );

    Ok(())
}
