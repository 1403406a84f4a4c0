//! A scripted in-memory `GriddapSource`.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use griddap::{GriddapError, GriddapResult, GriddapSource, SliceRequest};
use wind_common::time::{format_iso, parse_iso};
use wind_common::{TimeExpr, WindSlice};

use crate::fixtures::times;
use crate::generators::{gradient_field, slice_for, WindField};

/// Serves synthetic slices and fails on demand.
///
/// By default every request succeeds. Requests for explicit instants can be
/// made to fail (the canonical time is not yet published), as can requests for
/// the latest step and the latest-time lookup.
pub struct ScriptedSource {
    field: WindField,
    latest: DateTime<Utc>,
    fail_explicit: Option<GriddapError>,
    fail_latest: Option<GriddapError>,
    fail_latest_time: bool,
    requests: Mutex<Vec<SliceRequest>>,
    latest_time_calls: Mutex<usize>,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            field: gradient_field,
            latest: parse_iso(times::LATEST).unwrap_or_else(|_| Utc::now()),
            fail_explicit: None,
            fail_latest: None,
            fail_latest_time: false,
            requests: Mutex::new(Vec::new()),
            latest_time_calls: Mutex::new(0),
        }
    }

    /// Serve values from `field` instead of the default gradient.
    pub fn with_field(mut self, field: WindField) -> Self {
        self.field = field;
        self
    }

    /// Explicit-time requests fail with HTTP 404.
    pub fn failing_primary(mut self) -> Self {
        self.fail_explicit = Some(GriddapError::Upstream { status: 404 });
        self
    }

    /// Explicit-time requests fail with a schema error.
    pub fn failing_primary_schema(mut self) -> Self {
        self.fail_explicit = Some(GriddapError::Schema {
            column: "vgrd10m".to_string(),
        });
        self
    }

    /// Every slice request fails.
    pub fn failing_all(mut self) -> Self {
        self.fail_explicit = Some(GriddapError::Upstream { status: 503 });
        self.fail_latest = Some(GriddapError::Upstream { status: 503 });
        self
    }

    /// The latest-time lookup fails while slices still succeed.
    pub fn failing_latest_time(mut self) -> Self {
        self.fail_latest_time = true;
        self
    }

    /// Slice requests seen so far, in arrival order.
    pub fn requests(&self) -> Vec<SliceRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn latest_time_calls(&self) -> usize {
        self.latest_time_calls.lock().map(|n| *n).unwrap_or_default()
    }
}

fn replay(err: &GriddapError) -> GriddapError {
    match err {
        GriddapError::Upstream { status } => GriddapError::Upstream { status: *status },
        GriddapError::Schema { column } => GriddapError::Schema {
            column: column.clone(),
        },
        GriddapError::Transport(msg) => GriddapError::Transport(msg.clone()),
        GriddapError::Malformed(msg) => GriddapError::Malformed(msg.clone()),
        GriddapError::EmptyTable => GriddapError::EmptyTable,
    }
}

#[async_trait]
impl GriddapSource for ScriptedSource {
    async fn fetch_slice(&self, request: &SliceRequest) -> GriddapResult<WindSlice> {
        if let Ok(mut seen) = self.requests.lock() {
            seen.push(*request);
        }

        let (failure, time) = match request.time {
            TimeExpr::At(at) => (&self.fail_explicit, at),
            TimeExpr::Latest => (&self.fail_latest, self.latest),
        };
        if let Some(err) = failure {
            return Err(replay(err));
        }

        Ok(slice_for(request, &format_iso(&time), self.field))
    }

    async fn latest_time(&self) -> GriddapResult<DateTime<Utc>> {
        if let Ok(mut calls) = self.latest_time_calls.lock() {
            *calls += 1;
        }
        if self.fail_latest_time {
            return Err(GriddapError::Upstream { status: 500 });
        }
        Ok(self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wind_common::LonRange;

    fn request(time: TimeExpr) -> SliceRequest {
        SliceRequest::new(0.0, 0.5, LonRange::new(0.0, 0.5), time)
    }

    #[tokio::test]
    async fn test_default_serves_everything() {
        let source = ScriptedSource::new();
        let slice = source
            .fetch_slice(&request(TimeExpr::At(Utc::now())))
            .await
            .unwrap();
        assert_eq!(slice.len(), 4);
        assert_eq!(source.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_primary_still_serves_latest() {
        let source = ScriptedSource::new().failing_primary();
        let err = source
            .fetch_slice(&request(TimeExpr::At(Utc::now())))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));

        let slice = source.fetch_slice(&request(TimeExpr::Latest)).await.unwrap();
        assert_eq!(slice.reference_time().as_deref(), Some(times::LATEST));
    }
}
