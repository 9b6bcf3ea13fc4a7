// src/db/table_repository.rs
// DOCUMENTATION: Table-level vacuum/analyze statistics

use crate::errors::MaintenanceError;
use crate::models::TableMaintenance;
use sqlx::PgPool;

pub struct TableRepository;

impl TableRepository {
    /// Vacuum and analyze state per user table, most dead tuples first
    pub async fn maintenance_stats(
        pool: &PgPool,
    ) -> Result<Vec<TableMaintenance>, MaintenanceError> {
        let rows = sqlx::query_as::<_, TableMaintenance>(
            r#"
            SELECT
                schemaname::text AS schema_name,
                relname::text AS table_name,
                COALESCE(n_live_tup, 0) AS live_tuples,
                COALESCE(n_dead_tup, 0) AS dead_tuples,
                last_vacuum,
                last_autovacuum,
                last_analyze,
                last_autoanalyze
            FROM pg_stat_user_tables
            ORDER BY dead_tuples DESC, relname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
