use std::io::{self, Write};

use diesel::{prelude::*, sqlite::SqliteConnection};
use dotenvy::dotenv;
use regex::Regex;
use rpassword::read_password;

use cmms_api::orm::{
    equipment::{get_equipment_by_id, get_equipment_by_serial_number},
    run_pending_migrations, set_foreign_keys,
    spare_part::{get_spare_part_by_code, get_spare_part_by_id},
    team::{get_team_by_id, get_team_by_name},
    user::{get_user_by_id, get_user_by_username},
};

/// Opens `DATABASE_URL`, enables foreign keys and brings the schema up to
/// date before any command runs.
pub fn establish_connection() -> Result<SqliteConnection, Box<dyn std::error::Error>> {
    dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set (see .env.example)")?;
    let mut conn = SqliteConnection::establish(&database_url)?;
    set_foreign_keys(&mut conn)?;
    run_pending_migrations(&mut conn).map_err(|e| format!("Failed to run migrations: {}", e))?;
    Ok(conn)
}

/// Keeps the items whose `key` matches `term`, as a regex or, with
/// `fixed_string`, as a plain substring. No term keeps everything.
pub fn filter_matching<T>(
    items: Vec<T>,
    term: Option<&str>,
    fixed_string: bool,
    key: impl Fn(&T) -> String,
) -> Result<Vec<T>, Box<dyn std::error::Error>> {
    let Some(term) = term else {
        return Ok(items);
    };

    if fixed_string {
        return Ok(items.into_iter().filter(|item| key(item).contains(term)).collect());
    }

    let regex =
        Regex::new(term).map_err(|e| format!("Invalid regex pattern '{}': {}", term, e))?;
    Ok(items.into_iter().filter(|item| regex.is_match(&key(item))).collect())
}

/// Asks a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

pub fn prompt_for_password() -> Result<String, Box<dyn std::error::Error>> {
    print!("Enter new password: ");
    io::stdout().flush()?;
    let password = read_password()?;

    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    print!("Confirm new password: ");
    io::stdout().flush()?;
    let confirm_password = read_password()?;

    if password != confirm_password {
        return Err("Passwords do not match".into());
    }

    Ok(password)
}

/// Resolve a user identifier (numeric ID or username) to a user ID. A number
/// that is not a known ID is tried as a username.
pub fn resolve_user_id(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Ok(id) = identifier.parse::<i32>() {
        if get_user_by_id(conn, id)?.is_some() {
            return Ok(id);
        }
    }
    match get_user_by_username(conn, identifier)? {
        Some(user) => Ok(user.id),
        None => Err(format!("User '{}' does not exist", identifier).into()),
    }
}

/// Resolve a team identifier (numeric ID or name) to a team ID. A number
/// that is not a known ID is tried as a name.
pub fn resolve_team_id(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Ok(id) = identifier.parse::<i32>() {
        if get_team_by_id(conn, id)?.is_some() {
            return Ok(id);
        }
    }
    match get_team_by_name(conn, identifier)? {
        Some(team) => Ok(team.id),
        None => Err(format!("Team '{}' does not exist", identifier).into()),
    }
}

/// Resolve equipment by numeric ID or serial number.
pub fn resolve_equipment_id(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Ok(id) = identifier.parse::<i32>() {
        if get_equipment_by_id(conn, id)?.is_some() {
            return Ok(id);
        }
    }
    match get_equipment_by_serial_number(conn, identifier)? {
        Some(item) => Ok(item.id),
        None => Err(format!("Equipment '{}' does not exist", identifier).into()),
    }
}

/// Resolve a spare part by numeric ID or part code.
pub fn resolve_spare_part_id(
    conn: &mut SqliteConnection,
    identifier: &str,
) -> Result<i32, Box<dyn std::error::Error>> {
    if let Ok(id) = identifier.parse::<i32>() {
        if get_spare_part_by_id(conn, id)?.is_some() {
            return Ok(id);
        }
    }
    match get_spare_part_by_code(conn, identifier)? {
        Some(spare) => Ok(spare.id),
        None => Err(format!("Spare part '{}' does not exist", identifier).into()),
    }
}
