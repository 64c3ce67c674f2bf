use diesel::prelude::*;

use crate::models::{
    MaintenanceSchedule, MaintenanceScheduleInput, MaintenanceScheduleUpdate,
    NewMaintenanceSchedule,
};
use crate::orm::db::last_insert_rowid;

pub fn insert_maintenance_schedule(
    conn: &mut SqliteConnection,
    schedule_input: MaintenanceScheduleInput,
) -> Result<MaintenanceSchedule, diesel::result::Error> {
    use crate::schema::maintenance_schedules::dsl::*;

    let new_schedule = NewMaintenanceSchedule {
        equipment_id: schedule_input.equipment_id,
        schedule_type: schedule_input.schedule_type,
        frequency_days: schedule_input.frequency_days,
        run_hours: schedule_input.run_hours,
        next_due_date: schedule_input.next_due_date,
    };

    diesel::insert_into(maintenance_schedules)
        .values(&new_schedule)
        .execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    maintenance_schedules
        .filter(id.eq(last_id))
        .select(MaintenanceSchedule::as_select())
        .first(conn)
}

pub fn get_maintenance_schedule_by_id(
    conn: &mut SqliteConnection,
    schedule_id: i32,
) -> Result<Option<MaintenanceSchedule>, diesel::result::Error> {
    use crate::schema::maintenance_schedules::dsl::*;
    maintenance_schedules
        .filter(id.eq(schedule_id))
        .select(MaintenanceSchedule::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_maintenance_schedules(
    conn: &mut SqliteConnection,
) -> Result<Vec<MaintenanceSchedule>, diesel::result::Error> {
    use crate::schema::maintenance_schedules::dsl::*;
    maintenance_schedules
        .order(id.asc())
        .select(MaintenanceSchedule::as_select())
        .load(conn)
}

/// Schedules for one piece of equipment, soonest due first.
pub fn get_schedules_by_equipment(
    conn: &mut SqliteConnection,
    equipment: i32,
) -> Result<Vec<MaintenanceSchedule>, diesel::result::Error> {
    use crate::schema::maintenance_schedules::dsl::*;
    maintenance_schedules
        .filter(equipment_id.eq(equipment))
        .order((next_due_date.asc(), id.asc()))
        .select(MaintenanceSchedule::as_select())
        .load(conn)
}

pub fn update_maintenance_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
    changes: MaintenanceScheduleUpdate,
) -> Result<MaintenanceSchedule, diesel::result::Error> {
    use crate::schema::maintenance_schedules::dsl::*;

    let current = maintenance_schedules
        .filter(id.eq(schedule_id))
        .select(MaintenanceSchedule::as_select())
        .first(conn)?;

    diesel::update(maintenance_schedules.filter(id.eq(schedule_id)))
        .set((
            equipment_id.eq(changes.equipment_id.unwrap_or(current.equipment_id)),
            schedule_type.eq(changes.schedule_type.unwrap_or(current.schedule_type)),
            frequency_days.eq(changes.frequency_days.unwrap_or(current.frequency_days)),
            run_hours.eq(changes.run_hours.unwrap_or(current.run_hours)),
            next_due_date.eq(changes.next_due_date.unwrap_or(current.next_due_date)),
        ))
        .execute(conn)?;

    maintenance_schedules
        .filter(id.eq(schedule_id))
        .select(MaintenanceSchedule::as_select())
        .first(conn)
}

pub fn delete_maintenance_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::maintenance_schedules::dsl::*;
    diesel::delete(maintenance_schedules.filter(id.eq(schedule_id))).execute(conn)
}
