//! Health check endpoint.

use rocket::{Route, serde::json::Json};
use serde::Serialize;
use ts_rs::TS;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct HealthStatus {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    built: &'static str,
    git_commit: Option<&'static str>,
}

/// Health Status endpoint.
///
/// - **URL:** `/api/1/status`
/// - **Method:** `GET`
///
/// Always answers `"running"` while the server is up, along with build
/// information.
///
/// ```json
/// {
///   "status": "running",
///   "service": "cmms-api",
///   "version": "0.1.0",
///   "built": "Mon, 01 Sep 2025 09:00:00 +0000",
///   "git_commit": null
/// }
/// ```
#[get("/1/status")]
pub fn health_status() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "running",
        service: built_info::PKG_NAME,
        version: built_info::PKG_VERSION,
        built: built_info::BUILT_TIME_UTC,
        git_commit: built_info::GIT_COMMIT_HASH,
    })
}

pub fn routes() -> Vec<Route> {
    routes![health_status]
}
