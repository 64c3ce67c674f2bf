//! API endpoints for maintenance teams and their membership.

use rocket::{Route, http::Status, response::status, serde::json::Json};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use ts_rs::TS;

use crate::{
    api::error::{ApiError, db_error, not_found},
    logged_json::LoggedJson,
    models::{Team, TeamInput, TeamMember, TeamUpdate},
    orm::{
        DbConn,
        team::{
            add_team_member, delete_team, get_all_teams, get_team_by_id, get_team_members,
            insert_team, remove_team_member, update_team,
        },
        work_order::get_work_orders_by_team,
    },
};

/// Request payload for adding a member to a team
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct AddMemberRequest {
    pub user_id: i32,
}

/// Create Team endpoint.
///
/// - **URL:** `/api/1/Teams`
/// - **Method:** `POST`
///
/// ```json
/// { "name": "Mechanical", "description": "Day shift", "member_ids": [2, 3] }
/// ```
///
/// Members are enrolled in the same transaction; an unknown user id rejects
/// the whole request with 422.
#[post("/1/Teams", data = "<request>")]
pub async fn create_team(
    db: DbConn,
    request: LoggedJson<TeamInput>,
) -> Result<status::Created<Json<Team>>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| match insert_team(conn, request) {
        Ok(team) => {
            info!("Created team '{}'", team.name);
            let uri = format!("/api/1/Teams/{}", team.id);
            Ok(status::Created::new(uri).body(Json(team)))
        }
        Err(e) => Err(db_error("Team", e)),
    })
    .await
}

#[get("/1/Teams")]
pub async fn list_teams(db: DbConn) -> Result<Json<Value>, ApiError> {
    db.run(|conn| match get_all_teams(conn) {
        Ok(teams) => Ok(Json(json!({ "count": teams.len(), "value": teams }))),
        Err(e) => Err(db_error("Team", e)),
    })
    .await
}

#[get("/1/Teams/<team_id>")]
pub async fn get_team(db: DbConn, team_id: i32) -> Result<Json<Team>, ApiError> {
    db.run(move |conn| match get_team_by_id(conn, team_id) {
        Ok(Some(team)) => Ok(Json(team)),
        Ok(None) => Err(not_found("Team")),
        Err(e) => Err(db_error("Team", e)),
    })
    .await
}

#[put("/1/Teams/<team_id>", data = "<request>")]
pub async fn update_team_endpoint(
    db: DbConn,
    team_id: i32,
    request: LoggedJson<TeamUpdate>,
) -> Result<Json<Team>, ApiError> {
    let request = request.into_inner();

    db.run(move |conn| {
        update_team(conn, team_id, request)
            .map(Json)
            .map_err(|e| db_error("Team", e))
    })
    .await
}

/// Delete Team endpoint. Work orders assigned to the team become unassigned.
#[delete("/1/Teams/<team_id>")]
pub async fn delete_team_endpoint(db: DbConn, team_id: i32) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_team(conn, team_id) {
        Ok(0) => Err(not_found("Team")),
        Ok(_) => {
            info!("Deleted team {}", team_id);
            Ok(Status::NoContent)
        }
        Err(e) => Err(db_error("Team", e)),
    })
    .await
}

fn require_team(conn: &mut diesel::SqliteConnection, team_id: i32) -> Result<Team, ApiError> {
    match get_team_by_id(conn, team_id) {
        Ok(Some(team)) => Ok(team),
        Ok(None) => Err(not_found("Team")),
        Err(e) => Err(db_error("Team", e)),
    }
}

#[get("/1/Teams/<team_id>/Members")]
pub async fn list_team_members(db: DbConn, team_id: i32) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_team(conn, team_id)?;
        let members = get_team_members(conn, team_id).map_err(|e| db_error("User", e))?;
        Ok(Json(json!({ "count": members.len(), "value": members })))
    })
    .await
}

/// Add Team Member endpoint.
///
/// - **URL:** `/api/1/Teams/{id}/Members`
/// - **Method:** `POST`
///
/// ```json
/// { "user_id": 4 }
/// ```
///
/// - **201 Created**: membership added
/// - **404 Not Found**: team does not exist
/// - **409 Conflict**: user is already a member
/// - **422 Unprocessable Entity**: user does not exist
#[post("/1/Teams/<team_id>/Members", data = "<request>")]
pub async fn add_team_member_endpoint(
    db: DbConn,
    team_id: i32,
    request: LoggedJson<AddMemberRequest>,
) -> Result<status::Created<Json<TeamMember>>, ApiError> {
    let user_id = request.into_inner().user_id;

    db.run(move |conn| {
        require_team(conn, team_id)?;
        let member = add_team_member(conn, team_id, user_id).map_err(|e| db_error("TeamMember", e))?;
        info!("Added user {} to team {}", user_id, team_id);
        let uri = format!("/api/1/Teams/{}/Members/{}", team_id, user_id);
        Ok(status::Created::new(uri).body(Json(member)))
    })
    .await
}

#[delete("/1/Teams/<team_id>/Members/<user_id>")]
pub async fn remove_team_member_endpoint(
    db: DbConn,
    team_id: i32,
    user_id: i32,
) -> Result<Status, ApiError> {
    db.run(move |conn| match remove_team_member(conn, team_id, user_id) {
        Ok(0) => Err(not_found("TeamMember")),
        Ok(_) => {
            info!("Removed user {} from team {}", user_id, team_id);
            Ok(Status::NoContent)
        }
        Err(e) => Err(db_error("TeamMember", e)),
    })
    .await
}

/// Work orders currently assigned to the team.
#[get("/1/Teams/<team_id>/WorkOrders")]
pub async fn list_team_work_orders(db: DbConn, team_id: i32) -> Result<Json<Value>, ApiError> {
    db.run(move |conn| {
        require_team(conn, team_id)?;
        let orders = get_work_orders_by_team(conn, team_id).map_err(|e| db_error("WorkOrder", e))?;
        Ok(Json(json!({ "count": orders.len(), "value": orders })))
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![
        create_team,
        list_teams,
        get_team,
        update_team_endpoint,
        delete_team_endpoint,
        list_team_members,
        add_team_member_endpoint,
        remove_team_member_endpoint,
        list_team_work_orders,
    ]
}
