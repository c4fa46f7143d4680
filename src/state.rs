use std::fmt;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use quill_config::{AppConfig, CorsConfig, DatabaseConfig, JwtConfig, QueryConfig};
use quill_core::{QueryTranslator, StoreError};
use quill_db::{DocumentStore, MongoStore};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DocumentStore>,
    pub app_config: AppConfig,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub query: QueryTranslator,
    /// Present when the Prometheus recorder is installed; serves `/metrics`.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Builds state around an existing store with every other setting read
    /// from the environment.
    pub fn with_store(db: Arc<dyn DocumentStore>) -> Self {
        Self {
            db,
            app_config: AppConfig::from_env(),
            jwt_config: JwtConfig::from_env(),
            cors_config: CorsConfig::from_env(),
            query: QueryTranslator::new(QueryConfig::from_env()),
            metrics: None,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("app_config", &self.app_config)
            .field("cors_config", &self.cors_config)
            .field("query", &self.query)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Connects to MongoDB and makes sure the unique indexes the user module
/// relies on exist.
pub async fn init_app_state() -> Result<AppState, StoreError> {
    let store = MongoStore::connect(&DatabaseConfig::from_env()).await?;
    store.ensure_unique("users", "email").await?;
    store.ensure_unique("users", "username").await?;

    Ok(AppState::with_store(Arc::new(store)))
}
