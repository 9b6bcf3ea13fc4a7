// src/db/index_repository.rs
// DOCUMENTATION: Catalog queries for index analysis
// PURPOSE: Read-only access to pg_stat_user_indexes, pg_index and pg_statio_user_indexes

use crate::errors::MaintenanceError;
use crate::models::{IndexSize, IndexUsage, InvalidIndex, MissingIndexCandidate, UnusedIndex};
use sqlx::PgPool;

/// Tables smaller than this are not reported as missing an index
pub const MIN_ROWS_FOR_INDEX: i64 = 1000;
/// Cap on missing-index candidates returned
pub const MISSING_INDEX_LIMIT: i64 = 25;

pub struct IndexRepository;

impl IndexRepository {
    /// Scan counts for every user index, busiest first
    pub async fn usage(pool: &PgPool) -> Result<Vec<IndexUsage>, MaintenanceError> {
        let rows = sqlx::query_as::<_, IndexUsage>(
            r#"
            SELECT
                s.schemaname::text AS schema_name,
                s.relname::text AS table_name,
                s.indexrelname::text AS index_name,
                COALESCE(s.idx_scan, 0) AS index_scans,
                COALESCE(s.idx_tup_read, 0) AS tuples_read,
                COALESCE(s.idx_tup_fetch, 0) AS tuples_fetched
            FROM pg_stat_user_indexes s
            ORDER BY index_scans DESC, s.indexrelname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Never-scanned indexes that do not back a primary key or unique constraint
    pub async fn unused(pool: &PgPool) -> Result<Vec<UnusedIndex>, MaintenanceError> {
        let rows = sqlx::query_as::<_, UnusedIndex>(
            r#"
            SELECT
                s.schemaname::text AS schema_name,
                s.relname::text AS table_name,
                s.indexrelname::text AS index_name,
                pg_relation_size(s.indexrelid) AS index_size_bytes,
                pg_size_pretty(pg_relation_size(s.indexrelid)) AS index_size
            FROM pg_stat_user_indexes s
            JOIN pg_index i ON i.indexrelid = s.indexrelid
            WHERE COALESCE(s.idx_scan, 0) = 0
              AND NOT i.indisunique
              AND NOT i.indisprimary
            ORDER BY index_size_bytes DESC, s.indexrelname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Tables with more sequential than index scans, largest reads first
    pub async fn missing(pool: &PgPool) -> Result<Vec<MissingIndexCandidate>, MaintenanceError> {
        let rows = sqlx::query_as::<_, MissingIndexCandidate>(
            r#"
            SELECT
                schemaname::text AS schema_name,
                relname::text AS table_name,
                COALESCE(seq_scan, 0) AS seq_scans,
                COALESCE(seq_tup_read, 0) AS seq_tuples_read,
                COALESCE(idx_scan, 0) AS index_scans,
                COALESCE(n_live_tup, 0) AS live_tuples
            FROM pg_stat_user_tables
            WHERE COALESCE(seq_scan, 0) > COALESCE(idx_scan, 0)
              AND COALESCE(n_live_tup, 0) >= $1
            ORDER BY seq_tuples_read DESC
            LIMIT $2
            "#,
        )
        .bind(MIN_ROWS_FOR_INDEX)
        .bind(MISSING_INDEX_LIMIT)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// On-disk size of every user index next to its table
    pub async fn sizes(pool: &PgPool) -> Result<Vec<IndexSize>, MaintenanceError> {
        let rows = sqlx::query_as::<_, IndexSize>(
            r#"
            SELECT
                s.schemaname::text AS schema_name,
                s.relname::text AS table_name,
                s.indexrelname::text AS index_name,
                pg_relation_size(s.indexrelid) AS index_size_bytes,
                pg_size_pretty(pg_relation_size(s.indexrelid)) AS index_size,
                pg_relation_size(s.relid) AS table_size_bytes,
                pg_size_pretty(pg_relation_size(s.relid)) AS table_size
            FROM pg_stat_user_indexes s
            ORDER BY index_size_bytes DESC, s.indexrelname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    pub async fn invalid(pool: &PgPool) -> Result<Vec<InvalidIndex>, MaintenanceError> {
        let rows = sqlx::query_as::<_, InvalidIndex>(
            r#"
            SELECT
                n.nspname::text AS schema_name,
                t.relname::text AS table_name,
                c.relname::text AS index_name
            FROM pg_index i
            JOIN pg_class c ON c.oid = i.indexrelid
            JOIN pg_class t ON t.oid = i.indrelid
            JOIN pg_namespace n ON n.oid = c.relnamespace
            WHERE NOT i.indisvalid
              AND n.nspname NOT IN ('pg_catalog', 'information_schema')
            ORDER BY n.nspname, c.relname
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// (index count, total bytes, pretty total)
    pub async fn totals(pool: &PgPool) -> Result<(i64, i64, String), MaintenanceError> {
        let row: (i64, i64, String) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total_indexes,
                COALESCE(SUM(pg_relation_size(indexrelid)), 0)::bigint AS total_bytes,
                pg_size_pretty(COALESCE(SUM(pg_relation_size(indexrelid)), 0)::bigint) AS total_pretty
            FROM pg_stat_user_indexes
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    /// Buffer cache hit ratio over all user indexes; None when nothing was read yet
    pub async fn cache_hit_ratio(pool: &PgPool) -> Result<Option<f64>, MaintenanceError> {
        let row: (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT
                SUM(idx_blks_hit)::float8
                    / NULLIF(SUM(idx_blks_hit + idx_blks_read), 0)::float8 AS ratio
            FROM pg_statio_user_indexes
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }
}
