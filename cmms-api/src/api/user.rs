//! API endpoints for user management.
//!
//! Passwords are accepted on create and update, stored as argon2 hashes and
//! never returned.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde_json::{Value, json};

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{User, UserInput, UserUpdate},
    orm::{
        DbConn,
        user::{
            delete_user, get_all_users, get_teams_for_user, get_user_by_id, insert_user,
            update_user,
        },
    },
};

/// Create User endpoint.
///
/// - **URL:** `/api/1/Users`
/// - **Method:** `POST`
///
/// # Request Format
///
/// ```json
/// {
///   "username": "jdoe",
///   "email": "jdoe@example.com",
///   "first_name": "Jane",
///   "last_name": "Doe",
///   "password": "secret",
///   "role": "technician"
/// }
/// ```
///
/// `role` defaults to `viewer`, `is_active` to true and `is_staff` to false.
///
/// # Response
///
/// - **201 Created**: the stored user, without password
/// - **409 Conflict**: username already taken
/// - **422 Unprocessable Entity**: unknown role or missing username
#[post("/1/Users", data = "<request>")]
pub async fn create_user(
    db: DbConn,
    request: LoggedJson<UserInput>,
) -> Result<status::Created<Json<User>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_user(conn, request) {
        Ok(user) => {
            info!("Created user '{}' with role {}", user.username, user.role);
            let uri = format!("/api/1/Users/{}", user.id);
            Ok(status::Created::new(uri).body(Json(user)))
        }
        Err(e) => Err(db_error("User", e)),
    })
    .await
}

#[get("/1/Users")]
pub async fn list_users(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_users(conn) {
        Ok(users) => Ok(Json(json!({ "count": users.len(), "value": users }))),
        Err(e) => Err(db_error("User", e)),
    })
    .await
}

#[get("/1/Users/<user_id>")]
pub async fn get_user(db: DbConn, user_id: i32) -> Result<Json<User>, ApiError> {
    db.run(move |conn| match get_user_by_id(conn, user_id) {
        Ok(Some(user)) => Ok(Json(user)),
        Ok(None) => Err(not_found("User")),
        Err(e) => Err(db_error("User", e)),
    })
    .await
}

/// Update User endpoint. A `password` in the body replaces the stored hash.
#[put("/1/Users/<user_id>", data = "<request>")]
pub async fn update_user_endpoint(
    db: DbConn,
    user_id: i32,
    request: LoggedJson<UserUpdate>,
) -> Result<Json<User>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_user(conn, user_id, request)
            .map(Json)
            .map_err(|e| db_error("User", e))
    })
    .await
}

/// Delete User endpoint.
///
/// Team memberships are removed. Work orders and spare transactions that
/// reference the user are kept with the reference cleared.
#[delete("/1/Users/<user_id>")]
pub async fn delete_user_endpoint(db: DbConn, user_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_user(conn, user_id) {
        Ok(0) => Err(not_found("User")),
        Ok(_) => {
            info!("Deleted user {}", user_id);
            Ok(Status::NoContent)
        }
        Err(e) => Err(db_error("User", e)),
    })
    .await
}

/// Teams the user is a member of.
#[get("/1/Users/<user_id>/Teams")]
pub async fn list_user_teams(db: DbConn, user_id: i32) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        match get_user_by_id(conn, user_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(not_found("User")),
            Err(e) => return Err(db_error("User", e)),
        }
        let teams = get_teams_for_user(conn, user_id).map_err(|e| db_error("Team", e))?;
        Ok(Json(json!({ "count": teams.len(), "value": teams })))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_user,
        list_users,
        get_user,
        update_user_endpoint,
        delete_user_endpoint,
        list_user_teams,
    ]
}
