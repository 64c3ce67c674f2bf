//! API endpoints for work orders.
//!
//! A work order belongs to one piece of equipment and may name the user who
//! raised it and the team assigned to it. Deleting that user or team leaves
//! the work order in place with the reference cleared. Status updates are
//! free-form: any status may follow any other.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{WorkOrder, WorkOrderInput, WorkOrderUpdate},
    orm::{
        DbConn,
        work_order::{
            delete_work_order, get_all_work_orders, get_work_order_by_id, insert_work_order,
            update_work_order,
        },
    },
};

/// Create Work Order endpoint.
///
/// - **URL:** `/api/1/WorkOrders`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "number": "0001",
///   "equipment_id": 1,
///   "created_by_id": 2,
///   "assigned_team_id": null,
///   "description": "Replace gasket",
///   "status": "pending",
///   "priority": "high"
/// }
/// ```
///
/// # Response
///
/// - **201 Created**: the stored work order; `created_at` and `updated_at`
///   are set by the server
/// - **409 Conflict**: the number is already in use
/// - **422 Unprocessable Entity**: unknown equipment, user or team, a number
///   longer than 20 characters, or an invalid status or priority
#[post("/1/WorkOrders", data = "<request>")]
pub async fn create_work_order(
    db: DbConn,
    request: LoggedJson<WorkOrderInput>,
) -> Result<status::Created<Json<WorkOrder>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_work_order(conn, request) {
        Ok(wo) => {
            info!("Created work order WO-{} (id {})", wo.number, wo.id);
            let uri = format!("/api/1/WorkOrders/{}", wo.id);
            Ok(status::Created::new(uri).body(Json(wo)))
        }
        Err(e) => Err(db_error("WorkOrder", e)),
    })
    .await
}

#[get("/1/WorkOrders")]
pub async fn list_work_orders(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_work_orders(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("WorkOrder", e)),
    })
    .await
}

#[get("/1/WorkOrders/<order_id>")]
pub async fn get_work_order(db: DbConn, order_id: i32) -> Result<Json<WorkOrder>, ApiError> {
    db.run(move |conn| match get_work_order_by_id(conn, order_id) {
        Ok(Some(wo)) => Ok(Json(wo)),
        Ok(None) => Err(not_found("WorkOrder")),
        Err(e) => Err(db_error("WorkOrder", e)),
    })
    .await
}

/// Update Work Order endpoint.
///
/// - **URL:** `/api/1/WorkOrders/{id}`
/// - **Method:** `PUT`
///
/// Absent fields are left unchanged; `created_by_id` and `assigned_team_id`
/// accept `null` to clear the reference. `updated_at` is refreshed.
#[put("/1/WorkOrders/<order_id>", data = "<request>")]
pub async fn update_work_order_endpoint(
    db: DbConn,
    order_id: i32,
    request: LoggedJson<WorkOrderUpdate>,
) -> Result<Json<WorkOrder>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match update_work_order(conn, order_id, request) {
        Ok(wo) => {
            info!("Updated work order WO-{}: status {}", wo.number, wo.status);
            Ok(Json(wo))
        }
        Err(e) => Err(db_error("WorkOrder", e)),
    })
    .await
}

#[delete("/1/WorkOrders/<order_id>")]
pub async fn delete_work_order_endpoint(db: DbConn, order_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_work_order(conn, order_id) {
        Ok(0) => Err(not_found("WorkOrder")),
        Ok(_) => Ok(Status::NoContent),
        Err(e) => Err(db_error("WorkOrder", e)),
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_work_order,
        list_work_orders,
        get_work_order,
        update_work_order_endpoint,
        delete_work_order_endpoint,
    ]
}
