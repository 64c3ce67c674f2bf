//! API endpoints for equipment.
//!
//! Equipment is the hub of the maintenance model: schedules, work orders and
//! performance reports all hang off a single piece of equipment and are
//! deleted with it. Those children are reachable through navigation routes
//! below the equipment record.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{Equipment, EquipmentInput, EquipmentUpdate},
    orm::{
        DbConn,
        equipment::{
            delete_equipment, get_all_equipment, get_equipment_by_id, insert_equipment,
            update_equipment,
        },
        maintenance_schedule::get_schedules_by_equipment,
        performance_report::get_reports_by_equipment,
        work_order::get_work_orders_by_equipment,
    },
};

/// Create Equipment endpoint.
///
/// - **URL:** `/api/1/Equipment`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Cooling Pump",
///   "equipment_type": "Pump",
///   "serial_number": "SN-001",
///   "location": "Plant 1",
///   "install_date": "2024-03-15",
///   "status": "active"
/// }
/// ```
///
/// `install_date` defaults to today and `status` to `active`.
///
/// # Response
///
/// - **201 Created**: the stored record, with its URL in `Location`
/// - **409 Conflict**: serial number already in use
/// - **422 Unprocessable Entity**: invalid status or missing field
#[post("/1/Equipment", data = "<request>")]
pub async fn create_equipment(
    db: DbConn,
    request: LoggedJson<EquipmentInput>,
) -> Result<status::Created<Json<Equipment>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_equipment(conn, request) {
        Ok(item) => {
            info!("Created equipment {} ({})", item.id, item.serial_number);
            let uri = format!("/api/1/Equipment/{}", item.id);
            Ok(status::Created::new(uri).body(Json(item)))
        }
        Err(e) => Err(db_error("Equipment", e)),
    })
    .await
}

/// List Equipment endpoint.
///
/// - **URL:** `/api/1/Equipment`
/// - **Method:** `GET`
///
/// ```json
/// { "count": 1, "value": [ { "id": 1, "name": "Cooling Pump", ... } ] }
/// ```
#[get("/1/Equipment")]
pub async fn list_equipment(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_equipment(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("Equipment", e)),
    })
    .await
}

#[get("/1/Equipment/<equipment_id>")]
pub async fn get_equipment(db: DbConn, equipment_id: i32) -> Result<Json<Equipment>, ApiError> {
    db.run(move |conn| match get_equipment_by_id(conn, equipment_id) {
        Ok(Some(item)) => Ok(Json(item)),
        Ok(None) => Err(not_found("Equipment")),
        Err(e) => Err(db_error("Equipment", e)),
    })
    .await
}

/// Update Equipment endpoint.
///
/// - **URL:** `/api/1/Equipment/{id}`
/// - **Method:** `PUT`
///
/// Only the fields present in the body change. `equipment_type` may be set to
/// `null` to clear it.
#[put("/1/Equipment/<equipment_id>", data = "<request>")]
pub async fn update_equipment_endpoint(
    db: DbConn,
    equipment_id: i32,
    request: LoggedJson<EquipmentUpdate>,
) -> Result<Json<Equipment>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_equipment(conn, equipment_id, request)
            .map(Json)
            .map_err(|e| db_error("Equipment", e))
    })
    .await
}

/// Delete Equipment endpoint.
///
/// Deleting equipment also deletes its maintenance schedules, work orders
/// and performance reports.
#[delete("/1/Equipment/<equipment_id>")]
pub async fn delete_equipment_endpoint(db: DbConn, equipment_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_equipment(conn, equipment_id) {
        Ok(0) => Err(not_found("Equipment")),
        Ok(_) => {
            info!("Deleted equipment {}", equipment_id);
            Ok(Status::NoContent)
        }
        Err(e) => Err(db_error("Equipment", e)),
    })
    .await
}

/// Fails with 404 unless the equipment exists.
fn require_equipment(
    conn: &mut diesel::SqliteConnection,
    equipment_id: i32,
) -> Result<Equipment, ApiError> {
    match get_equipment_by_id(conn, equipment_id) {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(not_found("Equipment")),
        Err(e) => Err(db_error("Equipment", e)),
    }
}

/// Maintenance schedules for one piece of equipment, soonest due first.
#[get("/1/Equipment/<equipment_id>/MaintenanceSchedules")]
pub async fn list_equipment_schedules(
    db: DbConn,
    equipment_id: i32,
) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_equipment(conn, equipment_id)?;
        let items = get_schedules_by_equipment(conn, equipment_id)
            .map_err(|e| db_error("MaintenanceSchedule", e))?;
        Ok(Json(json!({ "count": items.len(), "value": items })))
    })
    .await
}

#[get("/1/Equipment/<equipment_id>/WorkOrders")]
pub async fn list_equipment_work_orders(
    db: DbConn,
    equipment_id: i32,
) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_equipment(conn, equipment_id)?;
        let items = get_work_orders_by_equipment(conn, equipment_id)
            .map_err(|e| db_error("WorkOrder", e))?;
        Ok(Json(json!({ "count": items.len(), "value": items })))
    })
    .await
}

/// Performance reports for one piece of equipment, newest first.
#[get("/1/Equipment/<equipment_id>/PerformanceReports")]
pub async fn list_equipment_reports(
    db: DbConn,
    equipment_id: i32,
) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_equipment(conn, equipment_id)?;
        let items = get_reports_by_equipment(conn, equipment_id)
            .map_err(|e| db_error("PerformanceReport", e))?;
        Ok(Json(json!({ "count": items.len(), "value": items })))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_equipment,
        list_equipment,
        get_equipment,
        update_equipment_endpoint,
        delete_equipment_endpoint,
        list_equipment_schedules,
        list_equipment_work_orders,
        list_equipment_reports,
    ]
}
