//! HTTP request handlers for the Wave Finder API.

pub mod health;
pub mod metrics;
pub mod spots;
pub mod wind;
