/*!
 * CMMS Administrative CLI Utility
 *
 * Command-line management of a cmms-api SQLite database. Every command goes
 * through the `cmms_api::orm` functions, so the same constraints, defaults
 * and cascades apply as for the HTTP API.
 *
 * - users and their passwords (prompted without echo)
 * - teams and team membership
 * - equipment, spare parts and the spare transaction ledger
 * - work orders
 *
 * Listing and removal accept a regex search term, or a fixed string with
 * `-F`. Removal asks for confirmation unless `--yes` is given.
 */

mod admin_cli;

use clap::{Parser, Subcommand};

use admin_cli::{
    equipment_commands::{EquipmentAction, handle_equipment_command_with_conn},
    spare_commands::{SpareAction, handle_spare_command_with_conn},
    team_commands::{TeamAction, handle_team_command_with_conn},
    user_commands::{UserAction, handle_user_command_with_conn},
    utils::establish_connection,
    work_order_commands::{WorkOrderAction, handle_work_order_command_with_conn},
};

#[derive(Parser)]
#[command(name = "cmms-admin")]
#[command(about = "Administrative CLI for CMMS database management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Manage users")]
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    #[command(about = "Manage maintenance teams")]
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },
    #[command(about = "Manage equipment")]
    Equipment {
        #[command(subcommand)]
        action: EquipmentAction,
    },
    #[command(about = "Manage spare parts and record stock movements")]
    Spare {
        #[command(subcommand)]
        action: SpareAction,
    },
    #[command(about = "Manage work orders")]
    WorkOrder {
        #[command(subcommand)]
        action: WorkOrderAction,
    },
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut conn = establish_connection()?;

    match cli.command {
        Commands::User { action } => handle_user_command_with_conn(&mut conn, action),
        Commands::Team { action } => handle_team_command_with_conn(&mut conn, action),
        Commands::Equipment { action } => handle_equipment_command_with_conn(&mut conn, action),
        Commands::Spare { action } => handle_spare_command_with_conn(&mut conn, action),
        Commands::WorkOrder { action } => handle_work_order_command_with_conn(&mut conn, action),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
