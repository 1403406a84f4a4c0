//! Service configuration loading and types.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use griddap::GriddapEndpoint;
use wind_common::WindColumns;

/// Configuration loaded from a YAML file, then overridden from the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub cors: CorsConfig,
}

impl ApiConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &str) -> Result<Self> {
        let path = Path::new(path);

        // A missing file means defaults
        if !path.exists() {
            tracing::warn!("Config file {:?} does not exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;

        serde_yaml::from_str(&content).with_context(|| format!("Failed to parse: {:?}", path))
    }

    /// Apply `DATABASE_URL`, `DB_POOL`, `GRIDDAP_BASE_URL` and `GRIDDAP_DATASET`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(pool) = lookup("DB_POOL") {
            self.database.max_connections = pool
                .parse()
                .with_context(|| format!("DB_POOL is not a number: {}", pool))?;
        }
        if let Some(base_url) = lookup("GRIDDAP_BASE_URL") {
            self.upstream.base_url = base_url;
        }
        if let Some(dataset) = lookup("GRIDDAP_DATASET") {
            self.upstream.dataset = dataset;
        }
        Ok(())
    }
}

/// Upstream griddap service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_dataset")]
    pub dataset: String,

    #[serde(default = "default_u_variable")]
    pub u_variable: String,

    #[serde(default = "default_v_variable")]
    pub v_variable: String,

    /// Dataset latitude axis runs north to south.
    #[serde(default)]
    pub latitude_descending: bool,

    /// Per-request timeout; unset leaves the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dataset: default_dataset(),
            u_variable: default_u_variable(),
            v_variable: default_v_variable(),
            latitude_descending: false,
            timeout_secs: None,
        }
    }
}

impl UpstreamConfig {
    pub fn endpoint(&self) -> GriddapEndpoint {
        GriddapEndpoint {
            base_url: self.base_url.clone(),
            dataset: self.dataset.clone(),
            columns: WindColumns {
                u: self.u_variable.clone(),
                v: self.v_variable.clone(),
            },
            latitude_descending: self.latitude_descending,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_base_url() -> String {
    "https://coastwatch.pfeg.noaa.gov/erddap/griddap".to_string()
}

fn default_dataset() -> String {
    // NCEP GFS best time series, 0.5° global grid
    "NCEP_Global_Best".to_string()
}

fn default_u_variable() -> String {
    WindColumns::default().u
}

fn default_v_variable() -> String {
    WindColumns::default().v
}

/// Relational store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MySQL/MariaDB connection URL. Required at startup.
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

/// Cross-origin and source-notice settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Where the running source code is published.
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
        }
    }
}

impl CorsConfig {
    /// Value of the `Link` header advertising source and license.
    pub fn link_header(&self) -> String {
        format!(
            "<{}>; rel=\"source\", <https://www.gnu.org/licenses/agpl-3.0.html>; rel=\"license\"",
            self.source_url
        )
    }
}

fn default_source_url() -> String {
    "https://github.com/JoshuaVlantis/Wave-Finder".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.upstream.dataset, "NCEP_Global_Best");
        assert_eq!(config.upstream.u_variable, "ugrd10m");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.url.is_none());
        assert!(config.upstream.timeout().is_none());
    }

    #[test]
    fn test_config_yaml_parsing() {
        let yaml = r#"
upstream:
  base_url: "https://erddap.example.org/erddap/griddap"
  dataset: gfs_half_degree
  latitude_descending: true
  timeout_secs: 20
database:
  max_connections: 12
"#;

        let config: ApiConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.upstream.dataset, "gfs_half_degree");
        assert_eq!(config.upstream.v_variable, "vgrd10m");
        assert_eq!(config.upstream.timeout(), Some(Duration::from_secs(20)));
        assert_eq!(config.database.max_connections, 12);

        let endpoint = config.upstream.endpoint();
        assert!(endpoint.latitude_descending);
        assert_eq!(endpoint.columns.u, "ugrd10m");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cors:\n  source_url: https://git.example.org/wavefinder").unwrap();

        let config = ApiConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.cors.source_url, "https://git.example.org/wavefinder");
        assert!(config
            .cors
            .link_header()
            .starts_with("<https://git.example.org/wavefinder>; rel=\"source\""));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let config = ApiConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.upstream.dataset, "NCEP_Global_Best");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "mysql://wf:wf@db/wavefinder"),
            ("DB_POOL", "8"),
            ("GRIDDAP_DATASET", "other"),
        ]);

        let mut config = ApiConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database.url.as_deref(), Some("mysql://wf:wf@db/wavefinder"));
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.upstream.dataset, "other");
        assert_eq!(config.upstream.base_url, default_base_url());
    }

    #[test]
    fn test_bad_pool_size() {
        let mut config = ApiConfig::default();
        assert!(config
            .apply_overrides(|k| (k == "DB_POOL").then(|| "many".to_string()))
            .is_err());
    }
}
