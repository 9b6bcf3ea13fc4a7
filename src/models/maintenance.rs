// src/models/maintenance.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::IndexReport;

/// Dead tuples above which a table is considered for vacuum
pub const VACUUM_DEAD_TUPLE_THRESHOLD: i64 = 1000;
/// Dead/total ratio above which a table needs vacuum
pub const VACUUM_DEAD_RATIO_THRESHOLD: f64 = 0.1;

/// Vacuum/analyze state of one table (pg_stat_user_tables)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TableMaintenance {
    pub schema_name: String,
    pub table_name: String,
    pub live_tuples: i64,
    pub dead_tuples: i64,
    pub last_vacuum: Option<DateTime<Utc>>,
    pub last_autovacuum: Option<DateTime<Utc>>,
    pub last_analyze: Option<DateTime<Utc>>,
    pub last_autoanalyze: Option<DateTime<Utc>>,
}

impl TableMaintenance {
    pub fn dead_tuple_ratio(&self) -> f64 {
        let total = self.live_tuples + self.dead_tuples;
        if total <= 0 {
            0.0
        } else {
            self.dead_tuples as f64 / total as f64
        }
    }

    pub fn needs_vacuum(&self) -> bool {
        self.dead_tuples > VACUUM_DEAD_TUPLE_THRESHOLD
            && self.dead_tuple_ratio() > VACUUM_DEAD_RATIO_THRESHOLD
    }

    /// Most recent of manual and auto vacuum
    pub fn last_vacuumed(&self) -> Option<DateTime<Utc>> {
        self.last_vacuum.max(self.last_autovacuum)
    }

    pub fn last_analyzed(&self) -> Option<DateTime<Utc>> {
        self.last_analyze.max(self.last_autoanalyze)
    }
}

/// Input to the markdown maintenance report
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceSnapshot {
    pub generated_at: DateTime<Utc>,
    pub indexes: IndexReport,
    pub tables: Vec<TableMaintenance>,
}
