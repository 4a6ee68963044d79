//! Clinica server binary.
//!
//! Resolves configuration from the environment once at startup, loads the
//! medication reference catalog into memory, and serves the REST API.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use clinica_core::{CoreConfig, MedicationCatalog, PrescriptionService};

/// Main entry point for the Clinica REST API server.
///
/// # Environment Variables
/// - `CLINICA_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `CLINICA_DATA_DIR`: prescription document directory (default: "clinica_data")
/// - `MEDICAMENTOS_PATH`: medication reference dataset (default: "medicamentos.csv")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the medication reference dataset cannot be read,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("clinica_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("clinica_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CLINICA_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("CLINICA_DATA_DIR").unwrap_or_else(|_| "clinica_data".into());
    let reference_path =
        std::env::var("MEDICAMENTOS_PATH").unwrap_or_else(|_| "medicamentos.csv".into());

    let cfg = Arc::new(CoreConfig::new(
        PathBuf::from(data_dir),
        PathBuf::from(reference_path),
    ));

    let catalog = Arc::new(MedicationCatalog::load(cfg.reference_path())?);
    tracing::info!(
        "-- Loaded {} medication reference rows from {}",
        catalog.len(),
        cfg.reference_path().display()
    );

    let service = Arc::new(PrescriptionService::new(&cfg, catalog.clone())?);

    let state = AppState { service, catalog };
    let app = api_rest::router(state);

    tracing::info!("-- Starting Clinica REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
