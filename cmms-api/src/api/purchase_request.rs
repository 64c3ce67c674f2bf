use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{PurchaseRequest, PurchaseRequestInput, PurchaseRequestUpdate},
    orm::{
        DbConn,
        purchase_request::{
            delete_purchase_request, get_all_purchase_requests, get_purchase_request_by_id,
            insert_purchase_request, update_purchase_request,
        },
    },
};

/// Create Purchase Request endpoint.
///
/// - **URL:** `/api/1/PurchaseRequests`
/// - **Method:** `POST`
///
/// ```json
/// { "spare_part_id": 3, "quantity": 20, "status": "pending" }
/// ```
///
/// `status` defaults to `pending`.
#[post("/1/PurchaseRequests", data = "<request>")]
pub async fn create_purchase_request(
    db: DbConn,
    request: LoggedJson<PurchaseRequestInput>,
) -> Result<status::Created<Json<PurchaseRequest>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_purchase_request(conn, request) {
        Ok(pr) => {
            info!("Created purchase request PR-{} for part {}", pr.id, pr.spare_part_id);
            let uri = format!("/api/1/PurchaseRequests/{}", pr.id);
            Ok(status::Created::new(uri).body(Json(pr)))
        }
        Err(e) => Err(db_error("PurchaseRequest", e)),
    })
    .await
}

#[get("/1/PurchaseRequests")]
pub async fn list_purchase_requests(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_purchase_requests(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("PurchaseRequest", e)),
    })
    .await
}

#[get("/1/PurchaseRequests/<request_id>")]
pub async fn get_purchase_request(
    db: DbConn,
    request_id: i32,
) -> Result<Json<PurchaseRequest>, ApiError> {
    db.run(move |conn| match get_purchase_request_by_id(conn, request_id) {
        Ok(Some(pr)) => Ok(Json(pr)),
        Ok(None) => Err(not_found("PurchaseRequest")),
        Err(e) => Err(db_error("PurchaseRequest", e)),
    })
    .await
}

/// Update Purchase Request endpoint. Status may move to any value.
#[put("/1/PurchaseRequests/<request_id>", data = "<request>")]
pub async fn update_purchase_request_endpoint(
    db: DbConn,
    request_id: i32,
    request: LoggedJson<PurchaseRequestUpdate>,
) -> Result<Json<PurchaseRequest>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_purchase_request(conn, request_id, request)
            .map(Json)
            .map_err(|e| db_error("PurchaseRequest", e))
    })
    .await
}

#[delete("/1/PurchaseRequests/<request_id>")]
pub async fn delete_purchase_request_endpoint(
    db: DbConn,
    request_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_purchase_request(conn, request_id) {
        Ok(0) => Err(not_found("PurchaseRequest")),
        Ok(_) => Ok(Status::NoContent),
        Err(e) => Err(db_error("PurchaseRequest", e)),
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_purchase_request,
        list_purchase_requests,
        get_purchase_request,
        update_purchase_request_endpoint,
        delete_purchase_request_endpoint,
    ]
}
