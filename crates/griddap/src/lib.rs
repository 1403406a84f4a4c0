//! Griddap upstream client.
//!
//! Fetches wind component slices and the newest published time from an
//! ERDDAP-style gridded data service. Each call is one attempt; the API
//! service decides when to fall back.

pub mod client;
pub mod error;
pub mod query;

pub use client::{GriddapSource, HttpGriddapClient};
pub use error::{GriddapError, GriddapResult};
pub use query::{GriddapEndpoint, SliceRequest};
