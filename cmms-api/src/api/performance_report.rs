//! API endpoints for stored performance reports. Report content is opaque
//! text supplied by the caller.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{PerformanceReport, PerformanceReportInput, PerformanceReportUpdate},
    orm::{
        DbConn,
        performance_report::{
            delete_performance_report, get_all_performance_reports,
            get_performance_report_by_id, insert_performance_report, update_performance_report,
        },
    },
};

#[post("/1/PerformanceReports", data = "<request>")]
pub async fn create_performance_report(
    db: DbConn,
    request: LoggedJson<PerformanceReportInput>,
) -> Result<status::Created<Json<PerformanceReport>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_performance_report(conn, request) {
        Ok(report) => {
            let uri = format!("/api/1/PerformanceReports/{}", report.id);
            Ok(status::Created::new(uri).body(Json(report)))
        }
        Err(e) => Err(db_error("PerformanceReport", e)),
    })
    .await
}

#[get("/1/PerformanceReports")]
pub async fn list_performance_reports(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_performance_reports(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("PerformanceReport", e)),
    })
    .await
}

#[get("/1/PerformanceReports/<report_id>")]
pub async fn get_performance_report(
    db: DbConn,
    report_id: i32,
) -> Result<Json<PerformanceReport>, ApiError> {
    db.run(move |conn| match get_performance_report_by_id(conn, report_id) {
        Ok(Some(report)) => Ok(Json(report)),
        Ok(None) => Err(not_found("PerformanceReport")),
        Err(e) => Err(db_error("PerformanceReport", e)),
    })
    .await
}

#[put("/1/PerformanceReports/<report_id>", data = "<request>")]
pub async fn update_performance_report_endpoint(
    db: DbConn,
    report_id: i32,
    request: LoggedJson<PerformanceReportUpdate>,
) -> Result<Json<PerformanceReport>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_performance_report(conn, report_id, request)
            .map(Json)
            .map_err(|e| db_error("PerformanceReport", e))
    })
    .await
}

#[delete("/1/PerformanceReports/<report_id>")]
pub async fn delete_performance_report_endpoint(
    db: DbConn,
    report_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_performance_report(conn, report_id) {
        Ok(0) => Err(not_found("PerformanceReport")),
        Ok(_) => Ok(Status::NoContent),
        Err(e) => Err(db_error("PerformanceReport", e)),
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_performance_report,
        list_performance_reports,
        get_performance_report,
        update_performance_report_endpoint,
        delete_performance_report_endpoint,
    ]
}
