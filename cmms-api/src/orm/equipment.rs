use chrono::Utc;
use diesel::prelude::*;

use crate::models::{Equipment, EquipmentInput, EquipmentUpdate, NewEquipment};
use crate::orm::db::last_insert_rowid;

/// Creates a new piece of equipment.
/// The install date defaults to today (UTC) and the status to `active`.
pub fn insert_equipment(
    conn: &mut SqliteConnection,
    equipment_input: EquipmentInput,
) -> Result<Equipment, diesel::result::Error> {
    use crate::schema::equipment::dsl::*;

    let new_equipment = NewEquipment {
        name: equipment_input.name,
        equipment_type: equipment_input.equipment_type,
        serial_number: equipment_input.serial_number,
        location: equipment_input.location,
        install_date: equipment_input
            .install_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        status: equipment_input.status.unwrap_or_default(),
    };

    diesel::insert_into(equipment).values(&new_equipment).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    equipment.filter(id.eq(last_id)).select(Equipment::as_select()).first(conn)
}

/// Gets a piece of equipment by its ID.
pub fn get_equipment_by_id(
    conn: &mut SqliteConnection,
    equipment_id: i32,
) -> Result<Option<Equipment>, diesel::result::Error> {
    use crate::schema::equipment::dsl::*;
    equipment
        .filter(id.eq(equipment_id))
        .select(Equipment::as_select())
        .first(conn)
        .optional()
}

/// Gets a piece of equipment by serial number.
pub fn get_equipment_by_serial_number(
    conn: &mut SqliteConnection,
    serial: &str,
) -> Result<Option<Equipment>, diesel::result::Error> {
    use crate::schema::equipment::dsl::*;
    equipment
        .filter(serial_number.eq(serial))
        .select(Equipment::as_select())
        .first(conn)
        .optional()
}

/// Gets all equipment in the system.
pub fn get_all_equipment(
    conn: &mut SqliteConnection,
) -> Result<Vec<Equipment>, diesel::result::Error> {
    use crate::schema::equipment::dsl::*;
    equipment.order(id.asc()).select(Equipment::as_select()).load(conn)
}

/// Updates a piece of equipment, keeping existing values for absent fields.
pub fn update_equipment(
    conn: &mut SqliteConnection,
    equipment_id: i32,
    changes: EquipmentUpdate,
) -> Result<Equipment, diesel::result::Error> {
    use crate::schema::equipment::dsl::*;

    // First, get the current equipment to preserve existing values
    let current = equipment
        .filter(id.eq(equipment_id))
        .select(Equipment::as_select())
        .first(conn)?;

    diesel::update(equipment.filter(id.eq(equipment_id)))
        .set((
            name.eq(changes.name.unwrap_or(current.name)),
            equipment_type.eq(changes.equipment_type.unwrap_or(current.equipment_type)),
            serial_number.eq(changes.serial_number.unwrap_or(current.serial_number)),
            location.eq(changes.location.unwrap_or(current.location)),
            install_date.eq(changes.install_date.unwrap_or(current.install_date)),
            status.eq(changes.status.unwrap_or(current.status)),
        ))
        .execute(conn)?;

    equipment.filter(id.eq(equipment_id)).select(Equipment::as_select()).first(conn)
}

/// Deletes a piece of equipment together with its maintenance schedules,
/// work orders and performance reports.
pub fn delete_equipment(
    conn: &mut SqliteConnection,
    equipment_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::equipment::dsl::*;
    diesel::delete(equipment.filter(id.eq(equipment_id))).execute(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EquipmentStatus;
    use crate::orm::testing::setup_test_db;
    use diesel::result::{DatabaseErrorKind, Error};

    fn pump(serial: &str) -> EquipmentInput {
        EquipmentInput {
            name: "Cooling Pump".to_string(),
            equipment_type: Some("Pump".to_string()),
            serial_number: serial.to_string(),
            location: "Plant 1".to_string(),
            install_date: None,
            status: None,
        }
    }

    #[test]
    fn test_insert_equipment_defaults() {
        let mut conn = setup_test_db();

        let today = Utc::now().date_naive();
        let item = insert_equipment(&mut conn, pump("SN-001")).expect("Failed to insert equipment");

        assert!(item.id > 0);
        assert_eq!(item.status, EquipmentStatus::Active);
        assert!(item.install_date == today || item.install_date == Utc::now().date_naive());
        assert_eq!(item.to_string(), "Cooling Pump (SN-001) - active : Plant 1");
    }

    #[test]
    fn test_duplicate_serial_number_rejected() {
        let mut conn = setup_test_db();
        insert_equipment(&mut conn, pump("SN-DUP")).expect("first insert");

        let result = insert_equipment(&mut conn, pump("SN-DUP"));
        assert!(matches!(
            result,
            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        ));
    }

    #[test]
    fn test_update_equipment_status_and_clear_type() {
        let mut conn = setup_test_db();
        let item = insert_equipment(&mut conn, pump("SN-002")).expect("insert");

        let updated = update_equipment(
            &mut conn,
            item.id,
            EquipmentUpdate {
                status: Some(EquipmentStatus::UnderMaintenance),
                equipment_type: Some(None),
                ..Default::default()
            },
        )
        .expect("update");

        assert_eq!(updated.status, EquipmentStatus::UnderMaintenance);
        assert_eq!(updated.equipment_type, None);
        assert_eq!(updated.serial_number, "SN-002");
        assert_eq!(
            updated.to_string(),
            "Cooling Pump (SN-002) - under_maintenance : Plant 1"
        );
    }

    #[test]
    fn test_update_to_existing_serial_number_rejected() {
        let mut conn = setup_test_db();
        insert_equipment(&mut conn, pump("SN-A")).expect("a");
        let b = insert_equipment(&mut conn, pump("SN-B")).expect("b");

        let result = update_equipment(
            &mut conn,
            b.id,
            EquipmentUpdate { serial_number: Some("SN-A".to_string()), ..Default::default() },
        );
        assert!(matches!(
            result,
            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        ));
    }

    #[test]
    fn test_lookup_by_serial_and_delete() {
        let mut conn = setup_test_db();
        let item = insert_equipment(&mut conn, pump("SN-003")).expect("insert");

        let found = get_equipment_by_serial_number(&mut conn, "SN-003").expect("query");
        assert_eq!(found, Some(item.clone()));

        assert_eq!(delete_equipment(&mut conn, item.id).expect("delete"), 1);
        assert!(get_equipment_by_id(&mut conn, item.id).expect("query").is_none());
        assert!(get_all_equipment(&mut conn).expect("list").is_empty());
    }
}
