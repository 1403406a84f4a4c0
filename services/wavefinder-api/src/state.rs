//! Application state for the Wave Finder API.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

use griddap::{GriddapSource, HttpGriddapClient};

use crate::config::ApiConfig;
use crate::sites::{MySqlSiteStore, SiteStore};

/// Shared application state.
pub struct AppState {
    /// Wind data upstream.
    pub upstream: Arc<dyn GriddapSource>,

    /// Dive site and records store.
    pub sites: Arc<dyn SiteStore>,

    pub config: ApiConfig,

    /// Prometheus render handle, absent when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        upstream: Arc<dyn GriddapSource>,
        sites: Arc<dyn SiteStore>,
        config: ApiConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            upstream,
            sites,
            config,
            metrics,
        }
    }

    /// Build the HTTP upstream client and open the database pool.
    pub async fn connect(config: ApiConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        let database_url = config
            .database
            .url
            .clone()
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let upstream = HttpGriddapClient::new(config.upstream.endpoint(), config.upstream.timeout())
            .context("Failed to build griddap client")?;
        info!(
            base_url = %config.upstream.base_url,
            dataset = %config.upstream.dataset,
            "Griddap upstream configured"
        );

        let sites = MySqlSiteStore::connect(&database_url, config.database.max_connections)
            .await
            .context("Failed to connect to database")?;
        info!(
            max_connections = config.database.max_connections,
            "Database pool ready"
        );

        Ok(Self::new(
            Arc::new(upstream),
            Arc::new(sites),
            config,
            metrics,
        ))
    }
}
