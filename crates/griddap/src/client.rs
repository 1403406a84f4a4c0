//! Upstream access: the `GriddapSource` seam and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use wind_common::slice::TIME;
use wind_common::time::parse_iso;
use wind_common::{Slice, WindSlice};

use crate::error::{GriddapError, GriddapResult};
use crate::query::{GriddapEndpoint, SliceRequest};

/// Something that can serve wind slices and report its newest time step.
///
/// Every call is a single attempt; fallbacks are decided by the caller.
#[async_trait]
pub trait GriddapSource: Send + Sync {
    /// Fetch both wind components over one sub-box at one time.
    async fn fetch_slice(&self, request: &SliceRequest) -> GriddapResult<WindSlice>;

    /// Most recent time the upstream has published.
    async fn latest_time(&self) -> GriddapResult<DateTime<Utc>>;
}

/// Envelope around the table in a griddap `.json` response.
#[derive(Debug, Deserialize)]
struct TableResponse {
    table: Slice,
}

/// `reqwest`-backed griddap client.
pub struct HttpGriddapClient {
    client: Client,
    endpoint: GriddapEndpoint,
}

impl HttpGriddapClient {
    /// Build a client. Without a timeout the transport default applies.
    pub fn new(endpoint: GriddapEndpoint, timeout: Option<Duration>) -> GriddapResult<Self> {
        let mut builder = Client::builder().pool_max_idle_per_host(4).tcp_nodelay(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GriddapError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, endpoint })
    }

    async fn fetch_table(&self, url: &str) -> GriddapResult<Slice> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "Upstream returned error status");
            return Err(GriddapError::Upstream {
                status: status.as_u16(),
            });
        }

        let body: TableResponse = response
            .json()
            .await
            .map_err(|e| GriddapError::Malformed(e.to_string()))?;

        if body.table.rows.is_empty() {
            return Err(GriddapError::EmptyTable);
        }

        Ok(body.table)
    }
}

#[async_trait]
impl GriddapSource for HttpGriddapClient {
    #[instrument(skip(self), fields(dataset = %self.endpoint.dataset, time = %request.time))]
    async fn fetch_slice(&self, request: &SliceRequest) -> GriddapResult<WindSlice> {
        let url = self.endpoint.slice_url(request);
        debug!(url = %url, "Fetching wind slice");

        let table = self.fetch_table(&url).await?;
        let slice = WindSlice::from_slice(table, &self.endpoint.columns)?;

        debug!(rows = slice.len(), "Fetched wind slice");
        Ok(slice)
    }

    #[instrument(skip(self), fields(dataset = %self.endpoint.dataset))]
    async fn latest_time(&self) -> GriddapResult<DateTime<Utc>> {
        let url = self.endpoint.latest_time_url();
        let table = self.fetch_table(&url).await?;
        latest_from_table(&table)
    }
}

fn latest_from_table(table: &Slice) -> GriddapResult<DateTime<Utc>> {
    let idx = table.column(TIME).ok_or_else(|| GriddapError::Schema {
        column: TIME.to_string(),
    })?;

    let raw = table
        .rows
        .last()
        .and_then(|row| row.get(idx))
        .and_then(|v| v.as_str())
        .ok_or_else(|| GriddapError::Malformed("time value is not a string".to_string()))?;

    parse_iso(raw).map_err(|e| GriddapError::Malformed(e.to_string()))
}
