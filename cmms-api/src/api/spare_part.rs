//! API endpoints for spare parts inventory.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{SparePart, SparePartInput, SparePartUpdate},
    orm::{
        DbConn,
        purchase_request::get_purchase_requests_by_spare_part,
        spare_part::{
            delete_spare_part, get_all_spare_parts, get_spare_part_by_id, insert_spare_part,
            update_spare_part,
        },
        spare_transaction::get_transactions_by_spare_part,
    },
};

/// Create Spare Part endpoint.
///
/// - **URL:** `/api/1/SpareParts`
/// - **Method:** `POST`
///
/// ```json
/// {
///   "name": "Ball Bearing",
///   "code": "BB-6205",
///   "make": "SKF",
///   "model": "6205",
///   "description": null,
///   "stock_quantity": 10,
///   "location": "Store A",
///   "reorder_level": 5
/// }
/// ```
///
/// `stock_quantity` defaults to 0 and `reorder_level` to 5. Negative values
/// are rejected with 422; a duplicate `code` with 409.
#[post("/1/SpareParts", data = "<request>")]
pub async fn create_spare_part(
    db: DbConn,
    request: LoggedJson<SparePartInput>,
) -> Result<status::Created<Json<SparePart>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_spare_part(conn, request) {
        Ok(spare) => {
            info!("Created spare part {} ({})", spare.id, spare.code);
            let uri = format!("/api/1/SpareParts/{}", spare.id);
            Ok(status::Created::new(uri).body(Json(spare)))
        }
        Err(e) => Err(db_error("SparePart", e)),
    })
    .await
}

#[get("/1/SpareParts")]
pub async fn list_spare_parts(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_spare_parts(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("SparePart", e)),
    })
    .await
}

#[get("/1/SpareParts/<spare_id>")]
pub async fn get_spare_part(db: DbConn, spare_id: i32) -> Result<Json<SparePart>, ApiError> {
    db.run(move |conn| match get_spare_part_by_id(conn, spare_id) {
        Ok(Some(spare)) => Ok(Json(spare)),
        Ok(None) => Err(not_found("SparePart")),
        Err(e) => Err(db_error("SparePart", e)),
    })
    .await
}

#[put("/1/SpareParts/<spare_id>", data = "<request>")]
pub async fn update_spare_part_endpoint(
    db: DbConn,
    spare_id: i32,
    request: LoggedJson<SparePartUpdate>,
) -> Result<Json<SparePart>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_spare_part(conn, spare_id, request)
            .map(Json)
            .map_err(|e| db_error("SparePart", e))
    })
    .await
}

/// Delete Spare Part endpoint. Its transactions and purchase requests are
/// deleted with it.
#[delete("/1/SpareParts/<spare_id>")]
pub async fn delete_spare_part_endpoint(db: DbConn, spare_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_spare_part(conn, spare_id) {
        Ok(0) => Err(not_found("SparePart")),
        Ok(_) => {
            info!("Deleted spare part {}", spare_id);
            Ok(Status::NoContent)
        }
        Err(e) => Err(db_error("SparePart", e)),
    })
    .await
}

fn require_spare_part(
    conn: &mut diesel::SqliteConnection,
    spare_id: i32,
) -> Result<SparePart, ApiError> {
    match get_spare_part_by_id(conn, spare_id) {
        Ok(Some(spare)) => Ok(spare),
        Ok(None) => Err(not_found("SparePart")),
        Err(e) => Err(db_error("SparePart", e)),
    }
}

/// Inventory ledger of one spare part, oldest first.
#[get("/1/SpareParts/<spare_id>/SpareTransactions")]
pub async fn list_spare_part_transactions(
    db: DbConn,
    spare_id: i32,
) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_spare_part(conn, spare_id)?;
        let items = get_transactions_by_spare_part(conn, spare_id)
            .map_err(|e| db_error("SpareTransaction", e))?;
        Ok(Json(json!({ "count": items.len(), "value": items })))
    })
    .await
}

#[get("/1/SpareParts/<spare_id>/PurchaseRequests")]
pub async fn list_spare_part_purchase_requests(
    db: DbConn,
    spare_id: i32,
) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_spare_part(conn, spare_id)?;
        let items = get_purchase_requests_by_spare_part(conn, spare_id)
            .map_err(|e| db_error("PurchaseRequest", e))?;
        Ok(Json(json!({ "count": items.len(), "value": items })))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_spare_part,
        list_spare_parts,
        get_spare_part,
        update_spare_part_endpoint,
        delete_spare_part_endpoint,
        list_spare_part_transactions,
        list_spare_part_purchase_requests,
    ]
}
