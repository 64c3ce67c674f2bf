use chrono::NaiveDate;
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use cmms_api::models::{Equipment, EquipmentInput, EquipmentStatus, EquipmentUpdate};
use cmms_api::orm::{
    equipment::{delete_equipment, get_all_equipment, insert_equipment, update_equipment},
    maintenance_schedule::get_schedules_by_equipment,
    work_order::get_work_orders_by_equipment,
};

use crate::admin_cli::utils::{confirm, filter_matching, resolve_equipment_id};

#[derive(Subcommand)]
pub enum EquipmentAction {
    #[command(about = "Register a new piece of equipment")]
    Add {
        #[arg(short, long, help = "Equipment name")]
        name: String,
        #[arg(short, long, help = "Serial number (must be unique)")]
        serial_number: String,
        #[arg(short, long, help = "Location")]
        location: String,
        #[arg(short = 't', long, help = "Equipment type")]
        equipment_type: Option<String>,
        #[arg(long, help = "Install date, YYYY-MM-DD (defaults to today)")]
        install_date: Option<NaiveDate>,
        #[arg(long, help = "Status: active, inactive or under_maintenance")]
        status: Option<EquipmentStatus>,
    },
    #[command(about = "List equipment, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term matched against name and serial number (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
    },
    #[command(about = "Remove equipment matching search term")]
    Rm {
        #[arg(help = "Search term matched against name and serial number (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Edit equipment fields")]
    Edit {
        #[arg(help = "Equipment ID or serial number")]
        equipment: String,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New serial number")]
        serial_number: Option<String>,
        #[arg(long, help = "New location")]
        location: Option<String>,
        #[arg(long, help = "New equipment type")]
        equipment_type: Option<String>,
        #[arg(long, help = "New install date, YYYY-MM-DD")]
        install_date: Option<NaiveDate>,
        #[arg(long, help = "New status")]
        status: Option<EquipmentStatus>,
    },
}

pub fn handle_equipment_command_with_conn(
    conn: &mut SqliteConnection,
    action: EquipmentAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        EquipmentAction::Add { name, serial_number, location, equipment_type, install_date, status } => {
            let input = EquipmentInput {
                name,
                equipment_type,
                serial_number,
                location,
                install_date,
                status,
            };
            add_equipment_impl(conn, input)?;
        }
        EquipmentAction::Ls { search_term, fixed_string } => {
            list_equipment_impl(conn, search_term, fixed_string)?;
        }
        EquipmentAction::Rm { search_term, fixed_string, yes } => {
            remove_equipment_impl(conn, search_term, fixed_string, yes)?;
        }
        EquipmentAction::Edit {
            equipment,
            name,
            serial_number,
            location,
            equipment_type,
            install_date,
            status,
        } => {
            let changes = EquipmentUpdate {
                name,
                equipment_type: equipment_type.map(Some),
                serial_number,
                location,
                install_date,
                status,
            };
            equipment_edit_impl(conn, &equipment, changes)?;
        }
    }
    Ok(())
}

pub fn add_equipment_impl(
    conn: &mut SqliteConnection,
    input: EquipmentInput,
) -> Result<Equipment, Box<dyn std::error::Error>> {
    let item = insert_equipment(conn, input)?;

    println!("Equipment created successfully!");
    println!("ID: {}", item.id);
    println!("{}", item);
    println!("Installed: {}", item.install_date);

    Ok(item)
}

fn search_key(item: &Equipment) -> String {
    format!("{} {}", item.name, item.serial_number)
}

pub fn list_equipment_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<Vec<Equipment>, Box<dyn std::error::Error>> {
    let items =
        filter_matching(get_all_equipment(conn)?, search_term.as_deref(), fixed_string, search_key)?;

    if items.is_empty() {
        println!("No equipment found.");
    } else {
        println!("Equipment:");
        for item in &items {
            println!("  ID: {}, {}", item.id, item);
        }
    }

    Ok(items)
}

pub fn remove_equipment_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let matching =
        filter_matching(get_all_equipment(conn)?, Some(&search_term), fixed_string, search_key)?;

    if matching.is_empty() {
        println!("No equipment found matching the search term.");
        return Ok(0);
    }

    println!("Found {} equipment record(s) matching the search term:", matching.len());
    for item in &matching {
        let schedules = get_schedules_by_equipment(conn, item.id)?.len();
        let orders = get_work_orders_by_equipment(conn, item.id)?.len();
        println!(
            "  ID: {}, {} ({} schedule(s), {} work order(s) will also be deleted)",
            item.id, item, schedules, orders
        );
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} equipment record(s) and everything attached to them?",
            matching.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    for item in matching {
        if delete_equipment(conn, item.id)? > 0 {
            deleted_count += 1;
            println!("Deleted equipment: {} (ID: {})", item.serial_number, item.id);
        }
    }

    println!("Successfully deleted {} equipment record(s).", deleted_count);
    Ok(deleted_count)
}

pub fn equipment_edit_impl(
    conn: &mut SqliteConnection,
    equipment: &str,
    changes: EquipmentUpdate,
) -> Result<Equipment, Box<dyn std::error::Error>> {
    let equipment_id = resolve_equipment_id(conn, equipment)?;
    let updated = update_equipment(conn, equipment_id, changes)?;

    println!("Equipment updated successfully!");
    println!("ID: {}", updated.id);
    println!("{}", updated);

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmms_api::models::WorkOrderInput;
    use cmms_api::orm::{testing::setup_test_db, work_order::insert_work_order};

    fn input(name: &str, serial: &str) -> EquipmentInput {
        EquipmentInput {
            name: name.to_string(),
            equipment_type: None,
            serial_number: serial.to_string(),
            location: "Hall A".to_string(),
            install_date: NaiveDate::from_ymd_opt(2022, 3, 14),
            status: None,
        }
    }

    #[test]
    fn test_add_and_search_by_serial() {
        let mut conn = setup_test_db();
        add_equipment_impl(&mut conn, input("Pump", "P-100")).expect("add");
        add_equipment_impl(&mut conn, input("Pump", "P-200")).expect("add");
        add_equipment_impl(&mut conn, input("Fan", "F-100")).expect("add");

        let found = list_equipment_impl(&mut conn, Some("P-1".to_string()), true).expect("ls");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].serial_number, "P-100");

        let pumps = list_equipment_impl(&mut conn, Some("^Pump".to_string()), false).expect("ls");
        assert_eq!(pumps.len(), 2);
    }

    #[test]
    fn test_edit_status_by_serial() {
        let mut conn = setup_test_db();
        add_equipment_impl(&mut conn, input("Boiler", "B-1")).expect("add");

        let changes = EquipmentUpdate {
            status: Some(EquipmentStatus::UnderMaintenance),
            ..Default::default()
        };
        let updated = equipment_edit_impl(&mut conn, "B-1", changes).expect("edit");
        assert_eq!(updated.status, EquipmentStatus::UnderMaintenance);
        assert_eq!(updated.install_date, NaiveDate::from_ymd_opt(2022, 3, 14).expect("date"));
    }

    #[test]
    fn test_remove_cascades_work_orders() {
        let mut conn = setup_test_db();
        let item = add_equipment_impl(&mut conn, input("Lift", "L-1")).expect("add");
        insert_work_order(
            &mut conn,
            WorkOrderInput {
                number: "WO-9".to_string(),
                equipment_id: item.id,
                created_by_id: None,
                assigned_team_id: None,
                description: "Cable check".to_string(),
                status: None,
                priority: None,
            },
        )
        .expect("work order");

        let removed = remove_equipment_impl(&mut conn, "L-1".to_string(), true, true).expect("rm");
        assert_eq!(removed, 1);
        assert!(get_work_orders_by_equipment(&mut conn, item.id).expect("orders").is_empty());
    }
}
