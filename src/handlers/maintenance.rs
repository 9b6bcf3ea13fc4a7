// src/handlers/maintenance.rs
// DOCUMENTATION: Database maintenance report and index monitoring handlers
// PURPOSE: Dispatch to the maintenance collaborators and shape the envelopes

use crate::errors::ApiError;
use crate::handlers::query::FirstQuery;
use crate::models::IndexAction;
use crate::services::{run_index_action, IndexMonitor, MaintenanceReporter};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct IndexMonitoringParams {
    pub action: Option<String>,
}

/// Attachment name for a report generated on `date`
pub fn report_filename(date: chrono::NaiveDate) -> String {
    format!("db-maintenance-report-{}.md", date.format("%Y-%m-%d"))
}

async fn generate(reporter: &dyn MaintenanceReporter) -> Result<String, ApiError> {
    reporter.generate_report().await.map_err(|e| {
        log::error!("Maintenance report generation failed: {}", e);
        ApiError::Maintenance {
            message: "Failed to generate maintenance report",
            details: e.to_string(),
        }
    })
}

/// GET /api/db-maintenance
/// Markdown report as a file download
pub async fn download_report(
    reporter: web::Data<dyn MaintenanceReporter>,
) -> Result<impl Responder, ApiError> {
    let report = generate(reporter.get_ref()).await?;
    let filename = report_filename(Utc::now().date_naive());

    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(report))
}

/// POST /api/db-maintenance
/// Same report wrapped in the JSON envelope
pub async fn report_json(
    reporter: web::Data<dyn MaintenanceReporter>,
) -> Result<impl Responder, ApiError> {
    let report = generate(reporter.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "report": report,
        "timestamp": Utc::now().to_rfc3339()
    })))
}

/// GET /api/index-monitoring?action=
pub async fn index_monitoring(
    monitor: web::Data<dyn IndexMonitor>,
    params: FirstQuery<IndexMonitoringParams>,
) -> Result<impl Responder, ApiError> {
    let action = IndexAction::from_query(params.action.as_deref());
    log::debug!("Index monitoring action: {}", action.as_str());

    let data = run_index_action(monitor.get_ref(), action)
        .await
        .map_err(|e| {
            log::error!("Index monitoring '{}' failed: {}", action.as_str(), e);
            ApiError::Maintenance {
                message: "Failed to run index analysis",
                details: e.to_string(),
            }
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": data
    })))
}

/// Configuration for maintenance routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/db-maintenance")
            .route(web::get().to(download_report))
            .route(web::post().to(report_json)),
    )
    .route("/api/index-monitoring", web::get().to(index_monitoring));
}
