// src/services/report.rs
// DOCUMENTATION: Markdown rendering of the maintenance report
// PURPOSE: Pure function of a MaintenanceSnapshot so GET and POST share one text

use crate::models::{HealthStatus, MaintenanceSnapshot, MIN_INDEX_HIT_RATIO};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Largest indexes listed in the size section
const LARGEST_INDEXES_SHOWN: usize = 10;

pub fn render_markdown(snapshot: &MaintenanceSnapshot) -> String {
    let mut out = String::new();
    match write_report(&mut out, snapshot) {
        Ok(()) => out,
        Err(e) => {
            log::error!("Maintenance report rendering failed: {}", e);
            String::new()
        }
    }
}

fn write_report(out: &mut String, snapshot: &MaintenanceSnapshot) -> std::fmt::Result {
    let health = &snapshot.indexes.health;
    let tables_needing_vacuum: Vec<_> = snapshot
        .tables
        .iter()
        .filter(|t| t.needs_vacuum())
        .collect();

    writeln!(out, "# Database Maintenance Report")?;
    writeln!(out)?;
    writeln!(
        out,
        "Generated: {}",
        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "- Index health: **{}**", health.status.as_str())?;
    writeln!(out, "- Total indexes: {}", health.total_indexes)?;
    writeln!(out, "- Total index size: {}", health.total_index_size)?;
    writeln!(out, "- Unused indexes: {}", health.unused_indexes)?;
    writeln!(out, "- Invalid indexes: {}", health.invalid_indexes.len())?;
    writeln!(
        out,
        "- Index cache hit ratio: {}",
        format_ratio(health.cache_hit_ratio)
    )?;
    writeln!(out, "- Tables needing vacuum: {}", tables_needing_vacuum.len())?;
    writeln!(out)?;

    if !health.invalid_indexes.is_empty() {
        writeln!(out, "## Invalid Indexes")?;
        writeln!(out)?;
        writeln!(out, "| Schema | Table | Index |")?;
        writeln!(out, "|---|---|---|")?;
        for idx in &health.invalid_indexes {
            writeln!(
                out,
                "| {} | {} | {} |",
                idx.schema_name, idx.table_name, idx.index_name
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Unused Indexes")?;
    writeln!(out)?;
    if snapshot.indexes.unused.is_empty() {
        writeln!(out, "No unused indexes found.")?;
    } else {
        writeln!(out, "| Schema | Table | Index | Size |")?;
        writeln!(out, "|---|---|---|---|")?;
        for idx in &snapshot.indexes.unused {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                idx.schema_name, idx.table_name, idx.index_name, idx.index_size
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## Missing Index Candidates")?;
    writeln!(out)?;
    if snapshot.indexes.missing.is_empty() {
        writeln!(out, "No tables rely mainly on sequential scans.")?;
    } else {
        writeln!(
            out,
            "| Schema | Table | Seq scans | Seq tuples read | Index scans | Live rows |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|")?;
        for t in &snapshot.indexes.missing {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                t.schema_name,
                t.table_name,
                t.seq_scans,
                t.seq_tuples_read,
                t.index_scans,
                t.live_tuples
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## Largest Indexes")?;
    writeln!(out)?;
    if snapshot.indexes.sizes.is_empty() {
        writeln!(out, "No user indexes found.")?;
    } else {
        writeln!(out, "| Schema | Table | Index | Index size | Table size |")?;
        writeln!(out, "|---|---|---|---|---|")?;
        for idx in snapshot.indexes.sizes.iter().take(LARGEST_INDEXES_SHOWN) {
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                idx.schema_name, idx.table_name, idx.index_name, idx.index_size, idx.table_size
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## Table Maintenance")?;
    writeln!(out)?;
    if snapshot.tables.is_empty() {
        writeln!(out, "No user tables found.")?;
    } else {
        writeln!(
            out,
            "| Schema | Table | Live rows | Dead rows | Dead % | Last vacuum | Last analyze |"
        )?;
        writeln!(out, "|---|---|---|---|---|---|---|")?;
        for t in &snapshot.tables {
            writeln!(
                out,
                "| {} | {} | {} | {} | {:.1}% | {} | {} |",
                t.schema_name,
                t.table_name,
                t.live_tuples,
                t.dead_tuples,
                t.dead_tuple_ratio() * 100.0,
                format_time(t.last_vacuumed()),
                format_time(t.last_analyzed())
            )?;
        }
    }
    writeln!(out)?;

    writeln!(out, "## Recommendations")?;
    writeln!(out)?;
    let recommendations = recommendations(snapshot);
    if recommendations.is_empty() {
        writeln!(out, "No action needed.")?;
    } else {
        for r in recommendations {
            writeln!(out, "- {}", r)?;
        }
    }

    Ok(())
}

fn recommendations(snapshot: &MaintenanceSnapshot) -> Vec<String> {
    let health = &snapshot.indexes.health;
    let mut out = Vec::new();

    for idx in &health.invalid_indexes {
        out.push(format!(
            "Rebuild invalid index `{}.{}` with `REINDEX INDEX CONCURRENTLY`.",
            idx.schema_name, idx.index_name
        ));
    }

    for idx in &snapshot.indexes.unused {
        out.push(format!(
            "Consider dropping unused index `{}.{}` ({}).",
            idx.schema_name, idx.index_name, idx.index_size
        ));
    }

    for t in &snapshot.indexes.missing {
        out.push(format!(
            "Review query patterns on `{}.{}`: {} sequential scans vs {} index scans.",
            t.schema_name, t.table_name, t.seq_scans, t.index_scans
        ));
    }

    for t in snapshot.tables.iter().filter(|t| t.needs_vacuum()) {
        out.push(format!(
            "Run `VACUUM ANALYZE {}.{}` ({} dead rows).",
            t.schema_name, t.table_name, t.dead_tuples
        ));
    }

    if health.status != HealthStatus::Critical
        && health.cache_hit_ratio.is_some_and(|r| r < MIN_INDEX_HIT_RATIO)
    {
        out.push("Index cache hit ratio is low; check shared_buffers sizing.".to_string());
    }

    out
}

fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "n/a".to_string(),
    }
}

fn format_time(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string())
}
