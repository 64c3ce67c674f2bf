use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{MaintenanceSchedule, MaintenanceScheduleInput, MaintenanceScheduleUpdate},
    orm::{
        DbConn,
        maintenance_schedule::{
            delete_maintenance_schedule, get_all_maintenance_schedules,
            get_maintenance_schedule_by_id, insert_maintenance_schedule,
            update_maintenance_schedule,
        },
    },
};

/// Create Maintenance Schedule endpoint.
///
/// - **URL:** `/api/1/MaintenanceSchedules`
/// - **Method:** `POST`
///
/// ```json
/// {
///   "equipment_id": 1,
///   "schedule_type": "preventive",
///   "frequency_days": 30,
///   "run_hours": null,
///   "next_due_date": "2025-03-01"
/// }
/// ```
#[post("/1/MaintenanceSchedules", data = "<request>")]
pub async fn create_maintenance_schedule(
    db: DbConn,
    request: LoggedJson<MaintenanceScheduleInput>,
) -> Result<status::Created<Json<MaintenanceSchedule>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_maintenance_schedule(conn, request) {
        Ok(schedule) => {
            let uri = format!("/api/1/MaintenanceSchedules/{}", schedule.id);
            Ok(status::Created::new(uri).body(Json(schedule)))
        }
        Err(e) => Err(db_error("MaintenanceSchedule", e)),
    })
    .await
}

#[get("/1/MaintenanceSchedules")]
pub async fn list_maintenance_schedules(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_maintenance_schedules(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("MaintenanceSchedule", e)),
    })
    .await
}

#[get("/1/MaintenanceSchedules/<schedule_id>")]
pub async fn get_maintenance_schedule(
    db: DbConn,
    schedule_id: i32,
) -> Result<Json<MaintenanceSchedule>, ApiError> {
    db.run(move |conn| match get_maintenance_schedule_by_id(conn, schedule_id) {
        Ok(Some(schedule)) => Ok(Json(schedule)),
        Ok(None) => Err(not_found("MaintenanceSchedule")),
        Err(e) => Err(db_error("MaintenanceSchedule", e)),
    })
    .await
}

#[put("/1/MaintenanceSchedules/<schedule_id>", data = "<request>")]
pub async fn update_maintenance_schedule_endpoint(
    db: DbConn,
    schedule_id: i32,
    request: LoggedJson<MaintenanceScheduleUpdate>,
) -> Result<Json<MaintenanceSchedule>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_maintenance_schedule(conn, schedule_id, request)
            .map(Json)
            .map_err(|e| db_error("MaintenanceSchedule", e))
    })
    .await
}

#[delete("/1/MaintenanceSchedules/<schedule_id>")]
pub async fn delete_maintenance_schedule_endpoint(
    db: DbConn,
    schedule_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_maintenance_schedule(conn, schedule_id) {
        Ok(0) => Err(not_found("MaintenanceSchedule")),
        Ok(_) => Ok(Status::NoContent),
        Err(e) => Err(db_error("MaintenanceSchedule", e)),
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_maintenance_schedule,
        list_maintenance_schedules,
        get_maintenance_schedule,
        update_maintenance_schedule_endpoint,
        delete_maintenance_schedule_endpoint,
    ]
}
