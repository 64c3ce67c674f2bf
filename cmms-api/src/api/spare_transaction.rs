//! API endpoints for the spare parts ledger.
//!
//! Transactions can be recorded, read and deleted. There is no update
//! endpoint; a correction is recorded as a new transaction.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{SpareTransaction, SpareTransactionInput},
    orm::{
        DbConn,
        spare_transaction::{
            delete_spare_transaction, get_all_spare_transactions, get_spare_transaction_by_id,
            insert_spare_transaction,
        },
    },
};

/// Record Spare Transaction endpoint.
///
/// - **URL:** `/api/1/SpareTransactions`
/// - **Method:** `POST`
///
/// ```json
/// {
///   "spare_part_id": 3,
///   "quantity": 2,
///   "transaction_type": "issue",
///   "requested_by_id": 4,
///   "approved_by_id": null
/// }
/// ```
///
/// The timestamp is assigned by the server. An unknown spare part or user
/// reference is rejected with 422.
#[post("/1/SpareTransactions", data = "<request>")]
pub async fn create_spare_transaction(
    db: DbConn,
    request: LoggedJson<SpareTransactionInput>,
) -> Result<status::Created<Json<SpareTransaction>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_spare_transaction(conn, request) {
        Ok(tx) => {
            info!(
                "Recorded spare transaction {}: {} x{} of part {}",
                tx.id, tx.transaction_type, tx.quantity, tx.spare_part_id
            );
            let uri = format!("/api/1/SpareTransactions/{}", tx.id);
            Ok(status::Created::new(uri).body(Json(tx)))
        }
        Err(e) => Err(db_error("SpareTransaction", e)),
    })
    .await
}

#[get("/1/SpareTransactions")]
pub async fn list_spare_transactions(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_spare_transactions(conn) {
        Ok(items) => Ok(Json(json!({ "count": items.len(), "value": items }))),
        Err(e) => Err(db_error("SpareTransaction", e)),
    })
    .await
}

#[get("/1/SpareTransactions/<transaction_id>")]
pub async fn get_spare_transaction(
    db: DbConn,
    transaction_id: i32,
) -> Result<Json<SpareTransaction>, ApiError> {
    db.run(move |conn| match get_spare_transaction_by_id(conn, transaction_id) {
        Ok(Some(tx)) => Ok(Json(tx)),
        Ok(None) => Err(not_found("SpareTransaction")),
        Err(e) => Err(db_error("SpareTransaction", e)),
    })
    .await
}

#[delete("/1/SpareTransactions/<transaction_id>")]
pub async fn delete_spare_transaction_endpoint(
    db: DbConn,
    transaction_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_spare_transaction(conn, transaction_id) {
        Ok(0) => Err(not_found("SpareTransaction")),
        Ok(_) => Ok(Status::NoContent),
        Err(e) => Err(db_error("SpareTransaction", e)),
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_spare_transaction,
        list_spare_transactions,
        get_spare_transaction,
        delete_spare_transaction_endpoint,
    ]
}
