//! Admin registry endpoints.
//!
//! - `GET /api/1/admin` lists every managed entity with its field metadata.
//! - `GET /api/1/admin/<Path>` adds the entity's change list.

use rocket::{Route, serde::json::Json};

use crate::{
    admin_registry::{ChangeList, EntityDescriptor, changelist, find_entity, registry},
    api::error::{ApiError, db_error, not_found},
    orm::DbConn,
};

#[get("/1/admin")]
pub fn list_entities() -> Json<Vec<EntityDescriptor>> {
    Json(registry())
}

#[get("/1/admin/<path>")]
pub async fn entity_changelist(db: DbConn, path: String) -> Result<Json<ChangeList>, ApiError> {
    let Some(entity) = find_entity(&path) else {
        return Err(not_found("Admin entity"));
    };

    db.run(move |conn| match changelist(conn, &path) {
        Ok(Some(rows)) => Ok(Json(ChangeList { entity, count: rows.len(), rows })),
        Ok(None) => Err(not_found("Admin entity")),
        Err(e) => Err(db_error(entity.name, e)),
    })
    .await
}

pub fn routes() -> Vec<Route> {
    routes![list_entities, entity_changelist]
}
