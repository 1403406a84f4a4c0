//! Griddap client error types.

use thiserror::Error;

use wind_common::MissingColumn;

pub type GriddapResult<T> = Result<T, GriddapError>;

/// Failures of a single upstream attempt. Retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum GriddapError {
    #[error("Upstream returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    #[error("Upstream table is missing column '{column}'")]
    Schema { column: String },

    #[error("Upstream table has no rows")]
    EmptyTable,
}

impl GriddapError {
    /// HTTP status reported by the upstream, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GriddapError::Upstream { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<MissingColumn> for GriddapError {
    fn from(err: MissingColumn) -> Self {
        GriddapError::Schema { column: err.0 }
    }
}

impl From<reqwest::Error> for GriddapError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => GriddapError::Upstream {
                status: status.as_u16(),
            },
            None => GriddapError::Transport(err.to_string()),
        }
    }
}
