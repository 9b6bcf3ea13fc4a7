// src/models/index.rs
// DOCUMENTATION: Index analysis rows and aggregates
// PURPOSE: Shapes returned by /api/index-monitoring and used by the maintenance report

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Below this cache hit ratio index health degrades to "warning"
pub const MIN_INDEX_HIT_RATIO: f64 = 0.95;

/// Scan statistics for one index (pg_stat_user_indexes)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IndexUsage {
    pub schema_name: String,
    pub table_name: String,
    pub index_name: String,
    pub index_scans: i64,
    pub tuples_read: i64,
    pub tuples_fetched: i64,
}

/// Non-unique index that has never been scanned since stats reset
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UnusedIndex {
    pub schema_name: String,
    pub table_name: String,
    pub index_name: String,
    pub index_size_bytes: i64,
    pub index_size: String,
}

/// Table read mostly through sequential scans
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MissingIndexCandidate {
    pub schema_name: String,
    pub table_name: String,
    pub seq_scans: i64,
    pub seq_tuples_read: i64,
    pub index_scans: i64,
    pub live_tuples: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IndexSize {
    pub schema_name: String,
    pub table_name: String,
    pub index_name: String,
    pub index_size_bytes: i64,
    pub index_size: String,
    pub table_size_bytes: i64,
    pub table_size: String,
}

/// Index left invalid by a failed CREATE INDEX CONCURRENTLY
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InvalidIndex {
    pub schema_name: String,
    pub table_name: String,
    pub index_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Invalid indexes are critical; unused indexes or a poor hit ratio warn
    pub fn assess(invalid_indexes: usize, unused_indexes: i64, hit_ratio: Option<f64>) -> Self {
        if invalid_indexes > 0 {
            HealthStatus::Critical
        } else if unused_indexes > 0 || hit_ratio.is_some_and(|r| r < MIN_INDEX_HIT_RATIO) {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Warning => "warning",
            HealthStatus::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexHealth {
    pub status: HealthStatus,
    pub total_indexes: i64,
    pub total_index_size_bytes: i64,
    pub total_index_size: String,
    pub unused_indexes: i64,
    pub invalid_indexes: Vec<InvalidIndex>,
    /// Share of index block reads served from shared buffers; None before any reads
    pub cache_hit_ratio: Option<f64>,
}

/// Everything the other five analyses return, in one payload
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    pub generated_at: DateTime<Utc>,
    pub health: IndexHealth,
    pub usage: Vec<IndexUsage>,
    pub unused: Vec<UnusedIndex>,
    pub missing: Vec<MissingIndexCandidate>,
    pub sizes: Vec<IndexSize>,
}

/// Payload of a single index-monitoring action
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum IndexData {
    Usage(Vec<IndexUsage>),
    Unused(Vec<UnusedIndex>),
    Missing(Vec<MissingIndexCandidate>),
    Sizes(Vec<IndexSize>),
    Health(IndexHealth),
    Report(IndexReport),
}

/// Analyses selectable with ?action=
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexAction {
    Usage,
    Unused,
    Missing,
    Size,
    Health,
    #[default]
    Report,
}

impl IndexAction {
    /// Parse the query value. Unknown values fall back to `Report`.
    pub fn from_query(action: Option<&str>) -> Self {
        match action.map(str::trim) {
            None | Some("") | Some("report") => IndexAction::Report,
            Some("usage") => IndexAction::Usage,
            Some("unused") => IndexAction::Unused,
            Some("missing") => IndexAction::Missing,
            Some("size") => IndexAction::Size,
            Some("health") => IndexAction::Health,
            Some(other) => {
                log::warn!("Unknown index-monitoring action '{}', using report", other);
                IndexAction::Report
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexAction::Usage => "usage",
            IndexAction::Unused => "unused",
            IndexAction::Missing => "missing",
            IndexAction::Size => "size",
            IndexAction::Health => "health",
            IndexAction::Report => "report",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing() {
        assert_eq!(IndexAction::from_query(Some("usage")), IndexAction::Usage);
        assert_eq!(IndexAction::from_query(Some("unused")), IndexAction::Unused);
        assert_eq!(IndexAction::from_query(Some("missing")), IndexAction::Missing);
        assert_eq!(IndexAction::from_query(Some("size")), IndexAction::Size);
        assert_eq!(IndexAction::from_query(Some("health")), IndexAction::Health);
        assert_eq!(IndexAction::from_query(Some("report")), IndexAction::Report);
        assert_eq!(IndexAction::from_query(None), IndexAction::Report);
    }

    #[test]
    fn test_unknown_action_falls_back_to_report() {
        assert_eq!(IndexAction::from_query(Some("usgae")), IndexAction::Report);
        // Matching is case-sensitive
        assert_eq!(IndexAction::from_query(Some("USAGE")), IndexAction::Report);
    }

    #[test]
    fn test_health_assessment() {
        assert_eq!(HealthStatus::assess(0, 0, None), HealthStatus::Healthy);
        assert_eq!(HealthStatus::assess(0, 0, Some(0.99)), HealthStatus::Healthy);
        assert_eq!(HealthStatus::assess(0, 2, Some(0.99)), HealthStatus::Warning);
        assert_eq!(HealthStatus::assess(0, 0, Some(0.80)), HealthStatus::Warning);
        assert_eq!(HealthStatus::assess(1, 0, Some(0.99)), HealthStatus::Critical);
    }

    #[test]
    fn test_health_status_serializes_lowercase() {
        let json = serde_json::to_value(HealthStatus::Critical).unwrap();
        assert_eq!(json, "critical");
    }
}
