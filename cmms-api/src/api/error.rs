//! Error responses shared by every API module.

use diesel::result::{DatabaseErrorKind, Error};
use rocket::{http::Status, response::status, serde::json::Json};
use serde::Serialize;
use ts_rs::TS;

/// Error body returned by the API.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = status::Custom<Json<ErrorResponse>>;

pub fn error_response(status: Status, message: impl Into<String>) -> ApiError {
    status::Custom(status, Json(ErrorResponse { error: message.into() }))
}

pub fn not_found(entity: &str) -> ApiError {
    error_response(Status::NotFound, format!("{} not found", entity))
}

/// Maps a storage error onto an HTTP status.
///
/// Uniqueness violations are conflicts, other constraint violations are
/// unprocessable input, a missing row is 404. Errors raised by triggers come
/// back from SQLite without a constraint kind and are reported as 400.
pub fn db_error(entity: &str, e: Error) -> ApiError {
    match e {
        Error::NotFound => not_found(entity),
        Error::DatabaseError(kind, info) => {
            let message = info.message().to_string();
            match kind {
                DatabaseErrorKind::UniqueViolation => {
                    warn!("{}: uniqueness violation: {}", entity, message);
                    error_response(Status::Conflict, message)
                }
                DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation
                | DatabaseErrorKind::ForeignKeyViolation => {
                    warn!("{}: constraint violation: {}", entity, message);
                    error_response(Status::UnprocessableEntity, message)
                }
                _ => {
                    warn!("{}: database error: {}", entity, message);
                    error_response(Status::BadRequest, message)
                }
            }
        }
        other => {
            error!("{}: unexpected database error: {:?}", entity, other);
            error_response(
                Status::InternalServerError,
                format!("Database error while processing {}", entity),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = db_error("Equipment", Error::NotFound);
        assert_eq!(response.0, Status::NotFound);
        assert_eq!(response.1.error, "Equipment not found");
    }

    #[test]
    fn test_constraint_kinds() {
        use crate::models::EquipmentInput;
        use crate::orm::equipment::insert_equipment;
        use crate::orm::testing::setup_test_db;

        let mut conn = setup_test_db();
        let input = || EquipmentInput {
            name: "Fan".to_string(),
            equipment_type: None,
            serial_number: "F-1".to_string(),
            location: "Roof".to_string(),
            install_date: None,
            status: None,
        };
        insert_equipment(&mut conn, input()).expect("first");
        let err = insert_equipment(&mut conn, input()).expect_err("duplicate serial");

        assert_eq!(db_error("Equipment", err).0, Status::Conflict);
    }
}
