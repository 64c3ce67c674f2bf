use clap::{Args, Subcommand};
use diesel::sqlite::SqliteConnection;

use cmms_api::models::{
    SparePart, SparePartInput, SparePartUpdate, SpareTransaction, SpareTransactionInput,
    TransactionType,
};
use cmms_api::orm::{
    spare_part::{delete_spare_part, get_all_spare_parts, insert_spare_part, update_spare_part},
    spare_transaction::{get_transactions_by_spare_part, insert_spare_transaction},
};

use crate::admin_cli::utils::{confirm, filter_matching, resolve_spare_part_id, resolve_user_id};

/// Arguments shared by `issue`, `receive` and `transfer`.
#[derive(Args)]
pub struct MovementArgs {
    #[arg(help = "Spare part ID or code")]
    spare: String,
    #[arg(help = "Quantity moved")]
    quantity: i32,
    #[arg(long, help = "Requesting user ID or username")]
    requested_by: Option<String>,
    #[arg(long, help = "Approving user ID or username")]
    approved_by: Option<String>,
}

#[derive(Subcommand)]
pub enum SpareAction {
    #[command(about = "Add a new spare part")]
    Add {
        #[arg(short, long, help = "Part name")]
        name: String,
        #[arg(short, long, help = "Part code (must be unique)")]
        code: String,
        #[arg(short, long, help = "Storage location")]
        location: String,
        #[arg(long, help = "Manufacturer")]
        make: Option<String>,
        #[arg(long, help = "Model")]
        model: Option<String>,
        #[arg(long, help = "Description")]
        description: Option<String>,
        #[arg(long, help = "Units in stock (defaults to 0)")]
        stock: Option<i32>,
        #[arg(long, help = "Reorder level (defaults to 5)")]
        reorder_level: Option<i32>,
    },
    #[command(about = "List spare parts, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term matched against name and code (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(long, help = "Only parts at or below their reorder level")]
        low_stock: bool,
    },
    #[command(about = "Remove spare parts matching search term")]
    Rm {
        #[arg(help = "Search term matched against name and code (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Edit spare part fields")]
    Edit {
        #[arg(help = "Spare part ID or code")]
        spare: String,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New code")]
        code: Option<String>,
        #[arg(long, help = "New location")]
        location: Option<String>,
        #[arg(long, help = "New description")]
        description: Option<String>,
        #[arg(long, help = "New stock quantity")]
        stock: Option<i32>,
        #[arg(long, help = "New reorder level")]
        reorder_level: Option<i32>,
    },
    #[command(about = "Record parts issued from stores")]
    Issue(MovementArgs),
    #[command(about = "Record parts received into stores")]
    Receive(MovementArgs),
    #[command(about = "Record parts transferred between locations")]
    Transfer(MovementArgs),
}

pub fn handle_spare_command_with_conn(
    conn: &mut SqliteConnection,
    action: SpareAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SpareAction::Add { name, code, location, make, model, description, stock, reorder_level } => {
            let input = SparePartInput {
                name,
                code,
                make,
                model,
                description,
                stock_quantity: stock,
                location,
                reorder_level,
            };
            add_spare_impl(conn, input)?;
        }
        SpareAction::Ls { search_term, fixed_string, low_stock } => {
            list_spares_impl(conn, search_term, fixed_string, low_stock)?;
        }
        SpareAction::Rm { search_term, fixed_string, yes } => {
            remove_spares_impl(conn, search_term, fixed_string, yes)?;
        }
        SpareAction::Edit { spare, name, code, location, description, stock, reorder_level } => {
            let changes = SparePartUpdate {
                name,
                code,
                description: description.map(Some),
                stock_quantity: stock,
                location,
                reorder_level,
                ..Default::default()
            };
            spare_edit_impl(conn, &spare, changes)?;
        }
        SpareAction::Issue(args) => {
            record_movement_impl(conn, TransactionType::Issue, args)?;
        }
        SpareAction::Receive(args) => {
            record_movement_impl(conn, TransactionType::Receive, args)?;
        }
        SpareAction::Transfer(args) => {
            record_movement_impl(conn, TransactionType::Transfer, args)?;
        }
    }
    Ok(())
}

pub fn add_spare_impl(
    conn: &mut SqliteConnection,
    input: SparePartInput,
) -> Result<SparePart, Box<dyn std::error::Error>> {
    let spare = insert_spare_part(conn, input)?;

    println!("Spare part created successfully!");
    println!("ID: {}", spare.id);
    println!("{}", spare);
    println!("Reorder level: {}", spare.reorder_level);

    Ok(spare)
}

fn search_key(spare: &SparePart) -> String {
    format!("{} {}", spare.name, spare.code)
}

pub fn list_spares_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
    low_stock: bool,
) -> Result<Vec<SparePart>, Box<dyn std::error::Error>> {
    let mut spares =
        filter_matching(get_all_spare_parts(conn)?, search_term.as_deref(), fixed_string, search_key)?;
    if low_stock {
        spares.retain(|s| s.stock_quantity <= s.reorder_level);
    }

    if spares.is_empty() {
        println!("No spare parts found.");
    } else {
        println!("Spare parts:");
        for spare in &spares {
            let flag = if spare.stock_quantity <= spare.reorder_level { " [reorder]" } else { "" };
            println!("  ID: {}, {} @ {}{}", spare.id, spare, spare.location, flag);
        }
    }

    Ok(spares)
}

pub fn remove_spares_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let matching =
        filter_matching(get_all_spare_parts(conn)?, Some(&search_term), fixed_string, search_key)?;

    if matching.is_empty() {
        println!("No spare parts found matching the search term.");
        return Ok(0);
    }

    println!("Found {} spare part(s) matching the search term:", matching.len());
    for spare in &matching {
        let history = get_transactions_by_spare_part(conn, spare.id)?.len();
        println!("  ID: {}, {} ({} transaction(s))", spare.id, spare, history);
    }

    if !yes
        && !confirm(&format!(
            "Delete these {} spare part(s) with their transactions and purchase requests?",
            matching.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    for spare in matching {
        if delete_spare_part(conn, spare.id)? > 0 {
            deleted_count += 1;
            println!("Deleted spare part: {} (ID: {})", spare.code, spare.id);
        }
    }

    println!("Successfully deleted {} spare part(s).", deleted_count);
    Ok(deleted_count)
}

pub fn spare_edit_impl(
    conn: &mut SqliteConnection,
    spare: &str,
    changes: SparePartUpdate,
) -> Result<SparePart, Box<dyn std::error::Error>> {
    let spare_id = resolve_spare_part_id(conn, spare)?;
    let updated = update_spare_part(conn, spare_id, changes)?;

    println!("Spare part updated successfully!");
    println!("ID: {}", updated.id);
    println!("{}", updated);

    Ok(updated)
}

/// Appends a ledger entry. Stock levels are maintained separately with
/// `spare edit --stock`.
pub fn record_movement_impl(
    conn: &mut SqliteConnection,
    transaction_type: TransactionType,
    args: MovementArgs,
) -> Result<SpareTransaction, Box<dyn std::error::Error>> {
    let spare_part_id = resolve_spare_part_id(conn, &args.spare)?;
    let requested_by_id = args.requested_by.map(|u| resolve_user_id(conn, &u)).transpose()?;
    let approved_by_id = args.approved_by.map(|u| resolve_user_id(conn, &u)).transpose()?;

    let tx = insert_spare_transaction(
        conn,
        SpareTransactionInput {
            spare_part_id,
            quantity: args.quantity,
            transaction_type,
            requested_by_id,
            approved_by_id,
        },
    )?;

    println!(
        "Recorded {} of {} unit(s) for spare part '{}' at {}",
        tx.transaction_type.label().to_lowercase(),
        tx.quantity,
        args.spare,
        tx.timestamp.format("%Y-%m-%d %H:%M")
    );

    Ok(tx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmms_api::orm::testing::setup_test_db;

    fn input(code: &str, stock: i32) -> SparePartInput {
        SparePartInput {
            name: "Filter".to_string(),
            code: code.to_string(),
            make: None,
            model: None,
            description: None,
            stock_quantity: Some(stock),
            location: "Shelf 3".to_string(),
            reorder_level: None,
        }
    }

    fn movement(spare: &str, quantity: i32) -> MovementArgs {
        MovementArgs { spare: spare.to_string(), quantity, requested_by: None, approved_by: None }
    }

    #[test]
    fn test_low_stock_listing() {
        let mut conn = setup_test_db();
        add_spare_impl(&mut conn, input("F-1", 2)).expect("add");
        add_spare_impl(&mut conn, input("F-2", 50)).expect("add");

        let low = list_spares_impl(&mut conn, None, false, true).expect("ls");
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].code, "F-1");
    }

    #[test]
    fn test_negative_stock_edit_rejected() {
        let mut conn = setup_test_db();
        add_spare_impl(&mut conn, input("F-3", 1)).expect("add");

        let changes = SparePartUpdate { stock_quantity: Some(-1), ..Default::default() };
        assert!(spare_edit_impl(&mut conn, "F-3", changes).is_err());
    }

    #[test]
    fn test_record_movements_by_code() {
        let mut conn = setup_test_db();
        let spare = add_spare_impl(&mut conn, input("F-4", 10)).expect("add");

        record_movement_impl(&mut conn, TransactionType::Receive, movement("F-4", 6)).expect("receive");
        let issued =
            record_movement_impl(&mut conn, TransactionType::Issue, movement("F-4", 2)).expect("issue");
        assert_eq!(issued.transaction_type, TransactionType::Issue);
        assert_eq!(issued.spare_part_id, spare.id);

        let history = get_transactions_by_spare_part(&mut conn, spare.id).expect("history");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_movement_requires_known_references() {
        let mut conn = setup_test_db();
        add_spare_impl(&mut conn, input("F-5", 0)).expect("add");

        assert!(record_movement_impl(&mut conn, TransactionType::Issue, movement("F-404", 1)).is_err());

        let mut args = movement("F-5", 1);
        args.requested_by = Some("ghost".to_string());
        assert!(record_movement_impl(&mut conn, TransactionType::Transfer, args).is_err());
    }

    #[test]
    fn test_remove_spares() {
        let mut conn = setup_test_db();
        add_spare_impl(&mut conn, input("GONE-1", 0)).expect("add");
        add_spare_impl(&mut conn, input("KEEP-1", 0)).expect("add");

        assert_eq!(remove_spares_impl(&mut conn, "GONE".to_string(), true, true).expect("rm"), 1);
        assert_eq!(get_all_spare_parts(&mut conn).expect("spares").len(), 1);
    }
}
