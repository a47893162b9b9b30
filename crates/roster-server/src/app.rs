//! Application assembly and lifecycle.

use crate::{
    di::{build_repository_module, RepositoryModule, RepositoryResolver},
    startup::{init_metrics, shutdown_signal},
};
use axum::Router;
use roster_cache::Sweeper;
use roster_config::{AppConfig, EnrichmentConfig};
use roster_core::{RosterError, RosterResult};
use roster_repository::create_pool;
use roster_rest::{create_router, AppState};
use roster_service::{
    CacheTtls, Enricher, HttpEnricher, NoopEnricher, PersonServiceImpl, ServiceCaches,
};
use std::sync::Arc;
use tracing::info;

/// A fully wired server, ready to accept connections.
pub struct Application {
    config: AppConfig,
    module: Arc<RepositoryModule>,
    router: Router,
    sweepers: Vec<Sweeper>,
}

impl Application {
    /// Connects the database and builds the service stack.
    ///
    /// Cache sweepers start running immediately.
    pub async fn build(config: AppConfig) -> RosterResult<Self> {
        let db_pool = Arc::new(create_pool(&config.database).await?);
        let module = build_repository_module(&db_pool);

        let caches = ServiceCaches::new();
        let sweepers = caches.spawn_sweepers(config.cache.sweep_interval());
        info!(
            "Started {} cache sweepers (every {:?})",
            sweepers.len(),
            config.cache.sweep_interval()
        );

        let person_service = Arc::new(PersonServiceImpl::new(
            module.person_repository(),
            build_enricher(&config.enrichment)?,
            &caches,
            CacheTtls::from(&config.cache),
        ));

        let mut state = AppState::new(person_service).with_health_check(db_pool);
        if config.observability.metrics_enabled {
            state = state.with_metrics(init_metrics()?);
        }
        let router = create_router(state, &config.server, &config.observability);

        Ok(Self {
            config,
            module,
            router,
            sweepers,
        })
    }

    /// Serves requests until SIGINT or SIGTERM, then shuts down in order:
    /// stop accepting requests, stop the sweepers, close the pool.
    pub async fn run(self) -> RosterResult<()> {
        let rest_addr = self.config.server.rest_addr();
        info!("Starting REST server on http://{}", rest_addr);

        let listener = tokio::net::TcpListener::bind(&rest_addr)
            .await
            .map_err(|e| RosterError::Internal(format!("Failed to bind REST: {}", e)))?;

        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RosterError::Internal(format!("REST server error: {}", e)));

        for sweeper in self.sweepers {
            sweeper.stop().await;
        }
        self.module.database_pool().close().await;

        served?;
        info!("Server shutdown complete");
        Ok(())
    }
}

/// Chooses the enrichment client for the configuration.
pub fn build_enricher(config: &EnrichmentConfig) -> RosterResult<Arc<dyn Enricher>> {
    if config.enabled {
        info!("Name enrichment enabled (timeout {:?})", config.timeout());
        Ok(Arc::new(HttpEnricher::new(config)?))
    } else {
        info!("Name enrichment disabled");
        Ok(Arc::new(NoopEnricher))
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("rest_addr", &self.config.server.rest_addr())
            .field("sweepers", &self.sweepers.len())
            .finish_non_exhaustive()
    }
}
