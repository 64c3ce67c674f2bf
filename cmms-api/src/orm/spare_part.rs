use diesel::prelude::*;

use crate::models::{DEFAULT_REORDER_LEVEL, NewSparePart, SparePart, SparePartInput, SparePartUpdate};
use crate::orm::db::last_insert_rowid;

/// Creates a new spare part. Stock defaults to 0 and the reorder level to 5.
/// Negative quantities are rejected by the store.
pub fn insert_spare_part(
    conn: &mut SqliteConnection,
    spare_input: SparePartInput,
) -> Result<SparePart, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;

    let new_spare = NewSparePart {
        name: spare_input.name,
        code: spare_input.code,
        make: spare_input.make,
        model: spare_input.model,
        description: spare_input.description,
        stock_quantity: spare_input.stock_quantity.unwrap_or(0),
        location: spare_input.location,
        reorder_level: spare_input.reorder_level.unwrap_or(DEFAULT_REORDER_LEVEL),
    };

    diesel::insert_into(spare_parts).values(&new_spare).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    spare_parts.filter(id.eq(last_id)).select(SparePart::as_select()).first(conn)
}

pub fn get_spare_part_by_id(
    conn: &mut SqliteConnection,
    spare_id: i32,
) -> Result<Option<SparePart>, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;
    spare_parts
        .filter(id.eq(spare_id))
        .select(SparePart::as_select())
        .first(conn)
        .optional()
}

/// Gets a spare part by its unique code.
pub fn get_spare_part_by_code(
    conn: &mut SqliteConnection,
    spare_code: &str,
) -> Result<Option<SparePart>, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;
    spare_parts
        .filter(code.eq(spare_code))
        .select(SparePart::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_spare_parts(
    conn: &mut SqliteConnection,
) -> Result<Vec<SparePart>, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;
    spare_parts.order(id.asc()).select(SparePart::as_select()).load(conn)
}

pub fn update_spare_part(
    conn: &mut SqliteConnection,
    spare_id: i32,
    changes: SparePartUpdate,
) -> Result<SparePart, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;

    let current = spare_parts
        .filter(id.eq(spare_id))
        .select(SparePart::as_select())
        .first(conn)?;

    diesel::update(spare_parts.filter(id.eq(spare_id)))
        .set((
            name.eq(changes.name.unwrap_or(current.name)),
            code.eq(changes.code.unwrap_or(current.code)),
            make.eq(changes.make.unwrap_or(current.make)),
            model.eq(changes.model.unwrap_or(current.model)),
            description.eq(changes.description.unwrap_or(current.description)),
            stock_quantity.eq(changes.stock_quantity.unwrap_or(current.stock_quantity)),
            location.eq(changes.location.unwrap_or(current.location)),
            reorder_level.eq(changes.reorder_level.unwrap_or(current.reorder_level)),
        ))
        .execute(conn)?;

    spare_parts.filter(id.eq(spare_id)).select(SparePart::as_select()).first(conn)
}

/// Deletes a spare part along with its transactions and purchase requests.
pub fn delete_spare_part(
    conn: &mut SqliteConnection,
    spare_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::spare_parts::dsl::*;
    diesel::delete(spare_parts.filter(id.eq(spare_id))).execute(conn)
}
