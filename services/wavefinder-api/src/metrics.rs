//! Prometheus counters for the wind endpoints.

use metrics::counter;

pub fn record_wind_request(endpoint: &'static str) {
    counter!("wind_requests_total", "endpoint" => endpoint).increment(1);
}

/// The canonical time was not served and the latest step was used instead.
pub fn record_fallback(endpoint: &'static str) {
    counter!("upstream_fallbacks_total", "endpoint" => endpoint).increment(1);
}

/// Both attempts failed and the caller got a 502.
pub fn record_upstream_failure(endpoint: &'static str) {
    counter!("upstream_failures_total", "endpoint" => endpoint).increment(1);
}

pub fn record_assembly_gaps(rows: usize) {
    counter!("assembly_gaps_total").increment(rows as u64);
}
