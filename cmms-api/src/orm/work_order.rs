use chrono::Utc;
use diesel::prelude::*;

use crate::models::{NewWorkOrder, WorkOrder, WorkOrderInput, WorkOrderUpdate};
use crate::orm::db::last_insert_rowid;

/// Opens a work order. Status defaults to `pending` and priority to `medium`;
/// both timestamps are set by the database.
pub fn insert_work_order(
    conn: &mut SqliteConnection,
    order_input: WorkOrderInput,
) -> Result<WorkOrder, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    let new_order = NewWorkOrder {
        number: order_input.number,
        equipment_id: order_input.equipment_id,
        created_by_id: order_input.created_by_id,
        assigned_team_id: order_input.assigned_team_id,
        description: order_input.description,
        status: order_input.status.unwrap_or_default(),
        priority: order_input.priority.unwrap_or_default(),
    };

    diesel::insert_into(work_orders).values(&new_order).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    work_orders.filter(id.eq(last_id)).select(WorkOrder::as_select()).first(conn)
}

pub fn get_work_order_by_id(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<Option<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(id.eq(order_id))
        .select(WorkOrder::as_select())
        .first(conn)
        .optional()
}

/// Gets a work order by its unique number.
pub fn get_work_order_by_number(
    conn: &mut SqliteConnection,
    order_number: &str,
) -> Result<Option<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(number.eq(order_number))
        .select(WorkOrder::as_select())
        .first(conn)
        .optional()
}

pub fn get_all_work_orders(
    conn: &mut SqliteConnection,
) -> Result<Vec<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders.order(id.asc()).select(WorkOrder::as_select()).load(conn)
}

pub fn get_work_orders_by_equipment(
    conn: &mut SqliteConnection,
    equipment: i32,
) -> Result<Vec<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(equipment_id.eq(equipment))
        .order(id.asc())
        .select(WorkOrder::as_select())
        .load(conn)
}

/// Work orders currently assigned to a team.
pub fn get_work_orders_by_team(
    conn: &mut SqliteConnection,
    team_id: i32,
) -> Result<Vec<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(assigned_team_id.eq(team_id))
        .order(id.asc())
        .select(WorkOrder::as_select())
        .load(conn)
}

pub fn get_work_orders_created_by(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Vec<WorkOrder>, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    work_orders
        .filter(created_by_id.eq(user_id))
        .order(id.asc())
        .select(WorkOrder::as_select())
        .load(conn)
}

/// Updates a work order and refreshes `updated_at`. Status changes are not
/// restricted to any particular order.
pub fn update_work_order(
    conn: &mut SqliteConnection,
    order_id: i32,
    changes: WorkOrderUpdate,
) -> Result<WorkOrder, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;

    let current = work_orders
        .filter(id.eq(order_id))
        .select(WorkOrder::as_select())
        .first(conn)?;

    diesel::update(work_orders.filter(id.eq(order_id)))
        .set((
            number.eq(changes.number.unwrap_or(current.number)),
            equipment_id.eq(changes.equipment_id.unwrap_or(current.equipment_id)),
            created_by_id.eq(changes.created_by_id.unwrap_or(current.created_by_id)),
            assigned_team_id.eq(changes.assigned_team_id.unwrap_or(current.assigned_team_id)),
            description.eq(changes.description.unwrap_or(current.description)),
            status.eq(changes.status.unwrap_or(current.status)),
            priority.eq(changes.priority.unwrap_or(current.priority)),
            updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(conn)?;

    work_orders.filter(id.eq(order_id)).select(WorkOrder::as_select()).first(conn)
}

pub fn delete_work_order(
    conn: &mut SqliteConnection,
    order_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::work_orders::dsl::*;
    diesel::delete(work_orders.filter(id.eq(order_id))).execute(conn)
}
