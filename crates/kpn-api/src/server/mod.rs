//! Server setup and initialization
//!
//! Picks the storage backend, loads the catalog, builds the service
//! context and runs the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use kpn_common::{AppConfig, AppError, ConfigError, JwtService, StorageBackend};
use kpn_core::{Snowflake, SnowflakeGenerator};
use kpn_db::{create_pool, run_migrations, MemoryStore, PgCatalogRepository, PoolConfig};
use kpn_service::{ensure_president, load_catalog, ServiceContext};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_api_layers, apply_base_layers};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_api_layers(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;
    let health = apply_base_layers(health_routes());

    Ok(api.merge(health).with_state(state))
}

/// Initialize storage and services and create the AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = ServiceContext::builder()
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id)))
        .governance(config.governance.clone());

    let (builder, pool) = match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; state is lost on restart");
            let store = MemoryStore::new();
            // Nothing survives a restart, so the catalog is always seeded
            let catalog = load_catalog(&store, true).await.map_err(AppError::internal)?;
            (builder.memory(&store).catalog(catalog), None)
        }
        StorageBackend::Postgres => {
            let db = config
                .database
                .as_ref()
                .ok_or(ConfigError::MissingVar("DATABASE_URL"))?;

            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(db))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");

            if db.run_migrations {
                run_migrations(&pool)
                    .await
                    .map_err(|e| AppError::Migration(e.to_string()))?;
            }

            let catalog = load_catalog(
                &PgCatalogRepository::new(pool.clone()),
                config.governance.seed_on_startup,
            )
            .await
            .map_err(AppError::internal)?;
            (builder.postgres(&pool).catalog(catalog), Some(pool))
        }
    };

    let service_context = builder.build().map_err(AppError::internal)?;
    if let Some(name) = &config.governance.president_name {
        ensure_president(&service_context, name)
            .await
            .map_err(AppError::internal)?;
    }
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    Ok(AppState::new(service_context, jwt_service, config, pool))
}

/// Who an operator-issued token speaks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSubject {
    Member(Snowflake),
    /// Whoever holds the top seat
    President,
}

impl std::str::FromStr for TokenSubject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("president") {
            return Ok(Self::President);
        }
        s.parse()
            .map(Self::Member)
            .map_err(|e| format!("{s:?} is neither a member id nor \"president\": {e}"))
    }
}

/// Mint a bearer token for an existing member
///
/// The engine never logs anyone in; operators hand these out.
pub async fn issue_token(state: &AppState, subject: TokenSubject) -> Result<(Snowflake, String), AppError> {
    let ctx = state.service_context();
    let member_id = match subject {
        TokenSubject::Member(id) => id,
        TokenSubject::President => ctx
            .member_repo()
            .find_seat_holder(ctx.catalog().seats.top_seat().id, None)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| AppError::not_found("president"))?
            .id,
    };

    let member = ctx.member(member_id).await.map_err(|e| match e.status_code() {
        404 => AppError::not_found(format!("member {member_id}")),
        _ => AppError::internal(e),
    })?;
    let token = state.jwt_service().issue(member.id)?;
    info!(member_id = %member.id, "Operator token issued");
    Ok((member.id, token))
}

/// Serve until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|_| ConfigError::InvalidValue("API_HOST", config.api.address()))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn memory_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "API_PORT" => Some("0".into()),
            "JWT_SECRET" => Some("router-test-secret-of-decent-length".into()),
            "KPN_STORAGE" => Some("memory".into()),
            _ => None,
        })
        .unwrap()
    }

    fn bootstrapped_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "API_PORT" => Some("0".into()),
            "JWT_SECRET" => Some("router-test-secret-of-decent-length".into()),
            "KPN_STORAGE" => Some("memory".into()),
            "GOVERNANCE_PRESIDENT_NAME" => Some("Ngozi Adeyemi".into()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_president_is_seated_at_startup() {
        let state = create_app_state(bootstrapped_config()).await.unwrap();
        let (president_id, token) = issue_token(&state, TokenSubject::President).await.unwrap();
        assert_eq!(state.jwt_service().authenticate(&token).unwrap(), president_id);

        let president = state.service_context().member(president_id).await.unwrap();
        assert_eq!(president.full_name, "Ngozi Adeyemi");
        assert!(president.is_approved());

        // The issued token clears the auth gate on a guarded route
        let app = create_app(state).unwrap();
        let response = app
            .oneshot(
                Request::get("/api/v1/members/pending")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_token_needs_an_existing_member() {
        let state = create_app_state(memory_config()).await.unwrap();
        let err = issue_token(&state, TokenSubject::President).await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = issue_token(&state, TokenSubject::Member(Snowflake::new(42))).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn test_token_subject_parsing() {
        assert_eq!("President".parse::<TokenSubject>().unwrap(), TokenSubject::President);
        assert_eq!(
            "42".parse::<TokenSubject>().unwrap(),
            TokenSubject::Member(Snowflake::new(42))
        );
        assert!("chairman".parse::<TokenSubject>().is_err());
    }

    #[tokio::test]
    async fn test_memory_backend_is_ready() {
        let app = create_app(create_app_state(memory_config()).await.unwrap()).unwrap();
        let response = app
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let app = create_app(create_app_state(memory_config()).await.unwrap()).unwrap();
        let response = app
            .oneshot(Request::get("/api/v1/members/pending").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_catalog_is_public() {
        let app = create_app(create_app_state(memory_config()).await.unwrap()).unwrap();
        let response = app
            .oneshot(Request::get("/api/v1/seats?tier=ZONAL").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
