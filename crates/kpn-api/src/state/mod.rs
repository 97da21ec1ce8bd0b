//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! the token verifier and the configuration.

use std::sync::Arc;

use kpn_common::{AppConfig, JwtService};
use kpn_db::PgPool;
use kpn_service::ServiceContext;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    jwt_service: Arc<JwtService>,
    config: Arc<AppConfig>,
    /// Present only with the Postgres backend; used by the readiness check
    pool: Option<PgPool>,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        jwt_service: JwtService,
        config: AppConfig,
        pool: Option<PgPool>,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            jwt_service: Arc::new(jwt_service),
            config: Arc::new(config),
            pool,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("storage", &self.config.storage.backend)
            .field("pool", &self.pool.is_some())
            .finish()
    }
}
