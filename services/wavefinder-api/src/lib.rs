//! Wave Finder API Service Library
//!
//! HTTP server for the Wave Finder map: regridded near-surface wind fields
//! from a griddap upstream, plus dive-site metadata and species records from
//! a MySQL/MariaDB store.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod sites;
pub mod state;
pub mod wind_field;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
