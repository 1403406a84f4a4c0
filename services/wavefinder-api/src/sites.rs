//! Read-only access to dive sites and species records.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{mysql::MySqlPoolOptions, FromRow, MySqlPool};
use thiserror::Error;

/// Entries kept per species in the records listing.
pub const RECORDS_PER_SPECIES: usize = 3;

const ACTIVE_SITES_SQL: &str = r#"
    SELECT
        CAST(location_id AS SIGNED) AS location_id,
        name,
        CAST(latitude AS DOUBLE) AS latitude,
        CAST(longitude AS DOUBLE) AS longitude,
        description,
        CAST(min_depth AS DOUBLE) AS min_depth,
        CAST(max_depth AS DOUBLE) AS max_depth,
        site_type, entry_method, difficulty, wildlife, hazards, img
    FROM locations
    WHERE is_active = 1
"#;

const RECORDS_SQL: &str = r#"
    SELECT species, diver, CAST(weight AS DOUBLE) AS weight, CAST(`date` AS DATE) AS `date`
    FROM records
    ORDER BY species, weight DESC
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// A dive or surf site as stored.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Site {
    pub location_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    pub site_type: Option<String>,
    pub entry_method: Option<String>,
    pub difficulty: Option<String>,
    pub wildlife: Option<String>,
    pub hazards: Option<String>,
    pub img: Option<String>,
}

/// One catch as stored, ordered by species then weight descending.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RecordRow {
    pub species: String,
    pub diver: String,
    pub weight: f64,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEntry {
    pub diver: String,
    /// Kilograms to two decimals, e.g. `"12.40 kg"`.
    pub weight: String,
    /// `dd/mm/yyyy`.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesRecords {
    pub species: String,
    pub entries: Vec<RecordEntry>,
}

/// Keep the heaviest entries per species, preserving species order.
pub fn group_records(rows: Vec<RecordRow>) -> Vec<SpeciesRecords> {
    let mut groups: Vec<SpeciesRecords> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let idx = *index.entry(row.species.clone()).or_insert_with(|| {
            groups.push(SpeciesRecords {
                species: row.species.clone(),
                entries: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[idx];
        if group.entries.len() < RECORDS_PER_SPECIES {
            group.entries.push(RecordEntry {
                diver: row.diver,
                weight: format!("{:.2} kg", row.weight),
                date: row.date.format("%d/%m/%Y").to_string(),
            });
        }
    }

    groups
}

/// Fixed read-only queries against the site database.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn active_sites(&self) -> Result<Vec<Site>, StoreError>;

    /// All records, species ascending then weight descending.
    async fn records(&self) -> Result<Vec<RecordRow>, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// MySQL/MariaDB-backed store. Pooled connections are returned on drop, so
/// every exit path releases them.
pub struct MySqlSiteStore {
    pool: MySqlPool,
}

impl MySqlSiteStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl SiteStore for MySqlSiteStore {
    async fn active_sites(&self) -> Result<Vec<Site>, StoreError> {
        let sites = sqlx::query_as::<_, Site>(ACTIVE_SITES_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(sites)
    }

    async fn records(&self) -> Result<Vec<RecordRow>, StoreError> {
        let rows = sqlx::query_as::<_, RecordRow>(RECORDS_SQL)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
