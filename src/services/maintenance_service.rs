// src/services/maintenance_service.rs
// DOCUMENTATION: Database maintenance and index monitoring
// PURPOSE: Collaborators behind /api/db-maintenance and /api/index-monitoring

use crate::db::{IndexRepository, TableRepository};
use crate::errors::MaintenanceError;
use crate::models::{
    HealthStatus, IndexAction, IndexData, IndexHealth, IndexReport, IndexSize, IndexUsage,
    MaintenanceSnapshot, MissingIndexCandidate, UnusedIndex,
};
use crate::services::report::render_markdown;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

/// Index analysis collaborator, one method per monitoring action
#[async_trait]
pub trait IndexMonitor: Send + Sync {
    async fn index_usage(&self) -> Result<Vec<IndexUsage>, MaintenanceError>;
    async fn unused_indexes(&self) -> Result<Vec<UnusedIndex>, MaintenanceError>;
    async fn missing_indexes(&self) -> Result<Vec<MissingIndexCandidate>, MaintenanceError>;
    async fn index_sizes(&self) -> Result<Vec<IndexSize>, MaintenanceError>;
    async fn index_health(&self) -> Result<IndexHealth, MaintenanceError>;
    async fn index_report(&self) -> Result<IndexReport, MaintenanceError>;
}

/// Run the analysis selected by `action`
pub async fn run_index_action(
    monitor: &dyn IndexMonitor,
    action: IndexAction,
) -> Result<IndexData, MaintenanceError> {
    let data = match action {
        IndexAction::Usage => IndexData::Usage(monitor.index_usage().await?),
        IndexAction::Unused => IndexData::Unused(monitor.unused_indexes().await?),
        IndexAction::Missing => IndexData::Missing(monitor.missing_indexes().await?),
        IndexAction::Size => IndexData::Sizes(monitor.index_sizes().await?),
        IndexAction::Health => IndexData::Health(monitor.index_health().await?),
        IndexAction::Report => IndexData::Report(monitor.index_report().await?),
    };

    Ok(data)
}

/// Maintenance report collaborator
#[async_trait]
pub trait MaintenanceReporter: Send + Sync {
    /// Full maintenance report as markdown
    async fn generate_report(&self) -> Result<String, MaintenanceError>;
}

/// PostgreSQL-backed implementation of both collaborators
pub struct PgMaintenanceService {
    pool: PgPool,
}

impl PgMaintenanceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn snapshot(&self) -> Result<MaintenanceSnapshot, MaintenanceError> {
        let indexes = self.index_report().await?;
        let tables = TableRepository::maintenance_stats(&self.pool).await?;

        Ok(MaintenanceSnapshot {
            generated_at: indexes.generated_at,
            indexes,
            tables,
        })
    }
}

#[async_trait]
impl IndexMonitor for PgMaintenanceService {
    async fn index_usage(&self) -> Result<Vec<IndexUsage>, MaintenanceError> {
        IndexRepository::usage(&self.pool).await
    }

    async fn unused_indexes(&self) -> Result<Vec<UnusedIndex>, MaintenanceError> {
        IndexRepository::unused(&self.pool).await
    }

    async fn missing_indexes(&self) -> Result<Vec<MissingIndexCandidate>, MaintenanceError> {
        IndexRepository::missing(&self.pool).await
    }

    async fn index_sizes(&self) -> Result<Vec<IndexSize>, MaintenanceError> {
        IndexRepository::sizes(&self.pool).await
    }

    async fn index_health(&self) -> Result<IndexHealth, MaintenanceError> {
        let (total_indexes, total_index_size_bytes, total_index_size) =
            IndexRepository::totals(&self.pool).await?;
        let invalid_indexes = IndexRepository::invalid(&self.pool).await?;
        let unused_indexes = IndexRepository::unused(&self.pool).await?.len() as i64;
        let cache_hit_ratio = IndexRepository::cache_hit_ratio(&self.pool).await?;

        let status = HealthStatus::assess(invalid_indexes.len(), unused_indexes, cache_hit_ratio);
        log::debug!(
            "Index health: {} ({} indexes, {} unused, {} invalid)",
            status.as_str(),
            total_indexes,
            unused_indexes,
            invalid_indexes.len()
        );

        Ok(IndexHealth {
            status,
            total_indexes,
            total_index_size_bytes,
            total_index_size,
            unused_indexes,
            invalid_indexes,
            cache_hit_ratio,
        })
    }

    async fn index_report(&self) -> Result<IndexReport, MaintenanceError> {
        Ok(IndexReport {
            generated_at: Utc::now(),
            health: self.index_health().await?,
            usage: self.index_usage().await?,
            unused: self.unused_indexes().await?,
            missing: self.missing_indexes().await?,
            sizes: self.index_sizes().await?,
        })
    }
}

#[async_trait]
impl MaintenanceReporter for PgMaintenanceService {
    async fn generate_report(&self) -> Result<String, MaintenanceError> {
        let snapshot = self.snapshot().await?;
        log::info!(
            "Generated maintenance report: {} indexes, {} tables",
            snapshot.indexes.health.total_indexes,
            snapshot.tables.len()
        );
        Ok(render_markdown(&snapshot))
    }
}
