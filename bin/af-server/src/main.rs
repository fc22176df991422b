//! AdmitFlow Portal Server
//!
//! Production server for the portal REST APIs:
//! - BFF APIs: registration, profiles, catalogs, applications, documents, tickets
//! - Admin APIs: catalog management, application review, document verification, audit logs
//! - Monitoring APIs: health, readiness, metrics
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AF_API_PORT` | `8080` | HTTP API port |
//! | `AF_METRICS_PORT` | `9090` | Metrics/health port |
//! | `AF_DATABASE_URL` | `postgres://localhost:5432/admitflow` | Postgres connection URL |
//! | `AF_JWT_SECRET` | dev default | HMAC secret for session tokens |
//! | `AF_JWT_ISSUER` | `admitflow` | JWT issuer claim |
//! | `AF_STORAGE_DIR` | `./storage` | Root directory for uploaded documents |
//! | `AF_PUBLIC_BASE_URL` | `http://localhost:8080` | Base URL in returned document links |
//! | `AF_DEV_MODE` | `false` | Seed an admin account and sample catalog |
//! | `RUST_LOG` | `info` | Log level |

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::response::Json;
use axum::routing::get;
use axum::{Extension, Router};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use af_platform::api::middleware::AppState;
use af_platform::api::openapi::ApiDoc;
use af_platform::api::{admin_router, bff_router};
use af_platform::repository::{
    self, ApplicationDocumentRepository, ApplicationRepository, AuditLogRepository,
    DocumentTypeRepository, ProfileRepository, ProgramDocumentRepository, ProgramRepository,
    TicketMessageRepository, TicketRepository, UniversityRepository,
};
use af_platform::seed::DevDataSeeder;
use af_platform::service::{
    ApplicationService, AuditService, AuthConfig, AuthService, ChangeNotifier, DocumentService,
    LocalDocumentStore, TicketService,
};

// Uploads are capped well above the largest per-type limit so the size check
// in the document service produces the 4xx instead of the body limit layer.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Starting AdmitFlow Portal Server");

    // Configuration from environment
    let api_port: u16 = env_or_parse("AF_API_PORT", 8080);
    let metrics_port: u16 = env_or_parse("AF_METRICS_PORT", 9090);
    let database_url = env_or("AF_DATABASE_URL", "postgres://localhost:5432/admitflow");
    let storage_dir = env_or("AF_STORAGE_DIR", "./storage");
    let public_base_url = env_or("AF_PUBLIC_BASE_URL", "http://localhost:8080");

    let auth_config = AuthConfig {
        jwt_secret: env_or("AF_JWT_SECRET", &AuthConfig::default().jwt_secret),
        jwt_issuer: env_or("AF_JWT_ISSUER", "admitflow"),
        ..AuthConfig::default()
    };

    // Connect to Postgres and ensure the schema exists
    info!("Connecting to Postgres");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;
    repository::init_schema(&pool).await?;
    info!("Schema ready");

    // Repositories
    let profiles = ProfileRepository::new(pool.clone());
    let universities = UniversityRepository::new(pool.clone());
    let programs = ProgramRepository::new(pool.clone());
    let document_types = DocumentTypeRepository::new(pool.clone());
    let program_documents = ProgramDocumentRepository::new(pool.clone());
    let applications_repo = ApplicationRepository::new(pool.clone());
    let documents_repo = ApplicationDocumentRepository::new(pool.clone());
    let tickets_repo = TicketRepository::new(pool.clone());
    let messages_repo = TicketMessageRepository::new(pool.clone());
    let audit_repo = AuditLogRepository::new(pool.clone());
    info!("Repositories initialized");

    // Seed development data if in dev mode
    let dev_mode = std::env::var("AF_DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    if dev_mode {
        let seeder = DevDataSeeder::new(
            profiles.clone(),
            universities.clone(),
            programs.clone(),
            document_types.clone(),
            program_documents.clone(),
        );
        if let Err(e) = seeder.run("admin@admitflow.dev", "admin-dev-password").await {
            tracing::warn!("Dev data seeding skipped: {}", e);
        }
    }

    // Services
    let auth = AuthService::new(&auth_config);
    let audit = AuditService::new(audit_repo);
    let store = Arc::new(LocalDocumentStore::new(&storage_dir, public_base_url));
    let notifier = ChangeNotifier::default();
    let applications = ApplicationService::new(
        pool.clone(),
        applications_repo.clone(),
        profiles.clone(),
        programs.clone(),
        audit.clone(),
    );
    let documents = DocumentService::new(
        documents_repo,
        document_types.clone(),
        applications_repo,
        store,
        audit.clone(),
    );
    let tickets = TicketService::new(
        pool.clone(),
        tickets_repo,
        messages_repo,
        audit.clone(),
        notifier,
    );
    info!("Services initialized");

    let app_state = AppState {
        pool: pool.clone(),
        auth,
        profiles,
        universities,
        programs,
        document_types,
        program_documents,
        applications,
        documents,
        tickets,
        audit,
    };

    let app = Router::new()
        .nest("/bff", bff_router())
        .nest("/api/admin", admin_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(Extension(app_state))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // Start API server
    let api_addr = format!("0.0.0.0:{}", api_port);
    info!("API server listening on http://{}", api_addr);

    let api_listener = TcpListener::bind(&api_addr).await?;
    let api_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(api_listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    // Start metrics server
    let metrics_addr = format!("0.0.0.0:{}", metrics_port);
    info!("Metrics server listening on http://{}/metrics", metrics_addr);

    let metrics_app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(Extension(pool));

    let metrics_listener = TcpListener::bind(&metrics_addr).await?;
    let metrics_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(metrics_listener, metrics_app).await {
            tracing::error!("Metrics server error: {}", e);
        }
    });

    info!("AdmitFlow Portal Server started");
    info!("Press Ctrl+C to shutdown");

    shutdown_signal().await;
    info!("Shutdown signal received...");

    api_task.abort();
    metrics_task.abort();

    info!("AdmitFlow Portal Server shutdown complete");
    Ok(())
}

async fn metrics_handler() -> &'static str {
    "# HELP af_portal_up Portal is up\n# TYPE af_portal_up gauge\naf_portal_up 1\n"
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "UP",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Ready once the database answers.
async fn ready_handler(
    Extension(pool): Extension<PgPool>,
) -> (axum::http::StatusCode, Json<serde_json::Value>) {
    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(serde_json::json!({ "status": "READY" })),
        ),
        Err(_) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "NOT_READY" })),
        ),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::error!("failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
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
