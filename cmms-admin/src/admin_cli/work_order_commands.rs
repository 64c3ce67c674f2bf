use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use cmms_api::models::{Priority, WorkOrder, WorkOrderInput, WorkOrderStatus, WorkOrderUpdate};
use cmms_api::orm::work_order::{
    delete_work_order, get_all_work_orders, get_work_order_by_id, get_work_order_by_number,
    insert_work_order, update_work_order,
};

use crate::admin_cli::utils::{
    confirm, filter_matching, resolve_equipment_id, resolve_team_id, resolve_user_id,
};

#[derive(Subcommand)]
pub enum WorkOrderAction {
    #[command(about = "Open a new work order")]
    Add {
        #[arg(short, long, help = "Work order number (must be unique)")]
        number: String,
        #[arg(short, long, help = "Equipment ID or serial number")]
        equipment: String,
        #[arg(short, long, help = "Description of the work")]
        description: String,
        #[arg(long, help = "Creating user ID or username")]
        created_by: Option<String>,
        #[arg(short, long, help = "Assigned team ID or name")]
        team: Option<String>,
        #[arg(short, long, help = "Priority: low, medium or high")]
        priority: Option<Priority>,
        #[arg(short, long, help = "Status: pending, in_progress, completed or closed")]
        status: Option<WorkOrderStatus>,
    },
    #[command(about = "List work orders, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term matched against the number (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short, long, help = "Only work orders with this status")]
        status: Option<WorkOrderStatus>,
    },
    #[command(about = "Remove work orders matching search term")]
    Rm {
        #[arg(help = "Search term matched against the number (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Edit work order fields")]
    Edit {
        #[arg(help = "Work order ID or number")]
        work_order: String,
        #[arg(long, help = "New description")]
        description: Option<String>,
        #[arg(long, help = "Assign to team ID or name")]
        team: Option<String>,
        #[arg(long, help = "Clear the team assignment", conflicts_with = "team")]
        unassign: bool,
        #[arg(long, help = "New priority")]
        priority: Option<Priority>,
        #[arg(long, help = "New status")]
        status: Option<WorkOrderStatus>,
    },
}

pub fn handle_work_order_command_with_conn(
    conn: &mut SqliteConnection,
    action: WorkOrderAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WorkOrderAction::Add { number, equipment, description, created_by, team, priority, status } => {
            let input = WorkOrderInput {
                number,
                equipment_id: resolve_equipment_id(conn, &equipment)?,
                created_by_id: created_by.map(|u| resolve_user_id(conn, &u)).transpose()?,
                assigned_team_id: team.map(|t| resolve_team_id(conn, &t)).transpose()?,
                description,
                status,
                priority,
            };
            add_work_order_impl(conn, input)?;
        }
        WorkOrderAction::Ls { search_term, fixed_string, status } => {
            list_work_orders_impl(conn, search_term, fixed_string, status)?;
        }
        WorkOrderAction::Rm { search_term, fixed_string, yes } => {
            remove_work_orders_impl(conn, search_term, fixed_string, yes)?;
        }
        WorkOrderAction::Edit { work_order, description, team, unassign, priority, status } => {
            let assigned_team_id = match (team, unassign) {
                (_, true) => Some(None),
                (Some(t), false) => Some(Some(resolve_team_id(conn, &t)?)),
                (None, false) => None,
            };
            let changes = WorkOrderUpdate {
                description,
                assigned_team_id,
                priority,
                status,
                ..Default::default()
            };
            work_order_edit_impl(conn, &work_order, changes)?;
        }
    }
    Ok(())
}

pub fn add_work_order_impl(
    conn: &mut SqliteConnection,
    input: WorkOrderInput,
) -> Result<WorkOrder, Box<dyn std::error::Error>> {
    let order = insert_work_order(conn, input)?;

    println!("Work order created successfully!");
    println!("ID: {}", order.id);
    println!("Number: {}", order.number);
    println!("Status: {}", order.status.label());
    println!("Priority: {}", order.priority.label());

    Ok(order)
}

pub fn list_work_orders_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
    status: Option<WorkOrderStatus>,
) -> Result<Vec<WorkOrder>, Box<dyn std::error::Error>> {
    let mut orders =
        filter_matching(get_all_work_orders(conn)?, search_term.as_deref(), fixed_string, |o| {
            o.number.clone()
        })?;
    if let Some(status) = status {
        orders.retain(|o| o.status == status);
    }

    if orders.is_empty() {
        println!("No work orders found.");
    } else {
        println!("Work orders:");
        for order in &orders {
            println!(
                "  ID: {}, Number: {}, Equipment ID: {}, Team ID: {}, Status: {}, Priority: {}, Updated: {}",
                order.id,
                order.number,
                order.equipment_id,
                order.assigned_team_id.map_or("-".to_string(), |t| t.to_string()),
                order.status,
                order.priority,
                order.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
    }

    Ok(orders)
}

pub fn remove_work_orders_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let matching =
        filter_matching(get_all_work_orders(conn)?, Some(&search_term), fixed_string, |o| {
            o.number.clone()
        })?;

    if matching.is_empty() {
        println!("No work orders found matching the search term.");
        return Ok(0);
    }

    println!("Found {} work order(s) matching the search term:", matching.len());
    for order in &matching {
        println!("  ID: {}, Number: {}, Status: {}", order.id, order.number, order.status);
    }

    if !yes && !confirm(&format!("Are you sure you want to delete these {} work order(s)?", matching.len()))? {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    for order in matching {
        if delete_work_order(conn, order.id)? > 0 {
            deleted_count += 1;
            println!("Deleted work order: {} (ID: {})", order.number, order.id);
        }
    }

    println!("Successfully deleted {} work order(s).", deleted_count);
    Ok(deleted_count)
}

/// Work orders are addressed by number first; a bare integer that is not a
/// number on file is taken as an ID.
fn resolve_work_order_id(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Some(order) = get_work_order_by_number(conn, identifier)? {
        return Ok(order.id);
    }
    if let Ok(id) = identifier.parse::<i32>() {
        if get_work_order_by_id(conn, id)?.is_some() {
            return Ok(id);
        }
    }
    Err(format!("Work order '{}' does not exist", identifier).into())
}

pub fn work_order_edit_impl(
    conn: &mut SqliteConnection,
    work_order: &str,
    changes: WorkOrderUpdate,
) -> Result<WorkOrder, Box<dyn std::error::Error>> {
    let order_id = resolve_work_order_id(conn, work_order)?;
    let updated = update_work_order(conn, order_id, changes)?;

    println!("Work order updated successfully!");
    println!("Number: {}", updated.number);
    println!("Status: {}", updated.status.label());
    println!("Priority: {}", updated.priority.label());
    println!(
        "Team ID: {}",
        updated.assigned_team_id.map_or("-".to_string(), |t| t.to_string())
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmms_api::models::{EquipmentInput, TeamInput};
    use cmms_api::orm::{equipment::insert_equipment, team::insert_team, testing::setup_test_db};

    fn setup() -> (SqliteConnection, i32) {
        let mut conn = setup_test_db();
        let item = insert_equipment(
            &mut conn,
            EquipmentInput {
                name: "Conveyor".to_string(),
                equipment_type: None,
                serial_number: "CV-1".to_string(),
                location: "Line 2".to_string(),
                install_date: None,
                status: None,
            },
        )
        .expect("equipment");
        (conn, item.id)
    }

    fn input(number: &str, equipment_id: i32) -> WorkOrderInput {
        WorkOrderInput {
            number: number.to_string(),
            equipment_id,
            created_by_id: None,
            assigned_team_id: None,
            description: "Belt tension".to_string(),
            status: None,
            priority: None,
        }
    }

    #[test]
    fn test_list_filters_by_status() {
        let (mut conn, equipment_id) = setup();
        add_work_order_impl(&mut conn, input("WO-1", equipment_id)).expect("add");
        let mut closed = input("WO-2", equipment_id);
        closed.status = Some(WorkOrderStatus::Closed);
        add_work_order_impl(&mut conn, closed).expect("add");

        let pending = list_work_orders_impl(&mut conn, None, false, Some(WorkOrderStatus::Pending))
            .expect("ls");
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].number, "WO-1");
    }

    #[test]
    fn test_edit_assigns_and_unassigns_team() {
        let (mut conn, equipment_id) = setup();
        let team = insert_team(
            &mut conn,
            TeamInput { name: "Line crew".to_string(), description: None, member_ids: vec![] },
        )
        .expect("team");
        add_work_order_impl(&mut conn, input("WO-3", equipment_id)).expect("add");

        let assign = WorkOrderUpdate {
            assigned_team_id: Some(Some(team.id)),
            status: Some(WorkOrderStatus::InProgress),
            ..Default::default()
        };
        let updated = work_order_edit_impl(&mut conn, "WO-3", assign).expect("edit");
        assert_eq!(updated.assigned_team_id, Some(team.id));
        assert_eq!(updated.status, WorkOrderStatus::InProgress);

        let unassign = WorkOrderUpdate { assigned_team_id: Some(None), ..Default::default() };
        let updated = work_order_edit_impl(&mut conn, "WO-3", unassign).expect("edit");
        assert_eq!(updated.assigned_team_id, None);
        assert_eq!(updated.status, WorkOrderStatus::InProgress);
    }

    #[test]
    fn test_edit_unknown_work_order() {
        let (mut conn, _) = setup();
        assert!(work_order_edit_impl(&mut conn, "WO-404", WorkOrderUpdate::default()).is_err());
    }

    #[test]
    fn test_remove_work_orders() {
        let (mut conn, equipment_id) = setup();
        add_work_order_impl(&mut conn, input("TMP-1", equipment_id)).expect("add");
        add_work_order_impl(&mut conn, input("TMP-2", equipment_id)).expect("add");

        let removed = remove_work_orders_impl(&mut conn, r"^TMP-\d$".to_string(), false, true)
            .expect("rm");
        assert_eq!(removed, 2);
        assert!(get_all_work_orders(&mut conn).expect("orders").is_empty());
    }
}
