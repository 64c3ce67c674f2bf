use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use cmms_api::models::{Role, User, UserInput, UserUpdate};
use cmms_api::orm::user::{
    delete_user, get_all_users, get_teams_for_user, get_user_by_id, insert_user,
    set_user_password, update_user,
};

use crate::admin_cli::utils::{confirm, filter_matching, prompt_for_password, resolve_user_id};

#[derive(Subcommand)]
pub enum UserAction {
    #[command(about = "Add a new user")]
    Add {
        #[arg(short, long, help = "Username (must be unique)")]
        username: String,
        #[arg(short, long, help = "Email address")]
        email: Option<String>,
        #[arg(long, help = "First name")]
        first_name: Option<String>,
        #[arg(long, help = "Last name")]
        last_name: Option<String>,
        #[arg(short, long, help = "Role (admin, team_manager, technician, ...)")]
        role: Option<Role>,
        #[arg(long, help = "Grant back-office access")]
        staff: bool,
        #[arg(long, help = "Prompt for a password")]
        with_password: bool,
    },
    #[command(about = "Set a user's password")]
    SetPassword {
        #[arg(help = "User ID or username")]
        user: String,
        #[arg(short, long, help = "New password (will be prompted securely if not provided)")]
        password: Option<String>,
    },
    #[command(about = "List users, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
    },
    #[command(about = "Remove users matching search term")]
    Rm {
        #[arg(help = "Search term to match usernames for removal (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Edit user fields")]
    Edit {
        #[arg(help = "User ID or username")]
        user: String,
        #[arg(long, help = "New username")]
        username: Option<String>,
        #[arg(long, help = "New email address")]
        email: Option<String>,
        #[arg(long, help = "New first name")]
        first_name: Option<String>,
        #[arg(long, help = "New last name")]
        last_name: Option<String>,
        #[arg(long, help = "New role")]
        role: Option<Role>,
        #[arg(long, help = "Set back-office access")]
        staff: Option<bool>,
        #[arg(long, help = "Activate or deactivate the account")]
        active: Option<bool>,
    },
}

pub fn handle_user_command_with_conn(
    conn: &mut SqliteConnection,
    action: UserAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        UserAction::Add { username, email, first_name, last_name, role, staff, with_password } => {
            let password = if with_password { Some(prompt_for_password()?) } else { None };
            let input = UserInput {
                username,
                email,
                first_name,
                last_name,
                password,
                is_active: None,
                is_staff: Some(staff),
                role,
            };
            add_user_impl(conn, input)?;
        }
        UserAction::SetPassword { user, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_for_password()?,
            };
            set_password_impl(conn, &user, &password)?;
        }
        UserAction::Ls { search_term, fixed_string } => {
            list_users_impl(conn, search_term, fixed_string)?;
        }
        UserAction::Rm { search_term, fixed_string, yes } => {
            remove_users_impl(conn, search_term, fixed_string, yes)?;
        }
        UserAction::Edit { user, username, email, first_name, last_name, role, staff, active } => {
            let changes = UserUpdate {
                username,
                email: email.map(Some),
                first_name,
                last_name,
                password: None,
                is_active: active,
                is_staff: staff,
                role,
            };
            user_edit_impl(conn, &user, changes)?;
        }
    }
    Ok(())
}

fn print_user(user: &User) {
    println!("ID: {}", user.id);
    println!("Username: {}", user.username);
    println!("Email: {}", user.email.as_deref().unwrap_or("-"));
    println!("Role: {}", user.role.label());
    println!("Staff: {}", user.is_staff);
    println!("Active: {}", user.is_active);
}

pub fn add_user_impl(
    conn: &mut SqliteConnection,
    input: UserInput,
) -> Result<User, Box<dyn std::error::Error>> {
    let created_user = insert_user(conn, input)?;

    println!("User created successfully!");
    print_user(&created_user);

    Ok(created_user)
}

pub fn set_password_impl(
    conn: &mut SqliteConnection,
    user: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if password.is_empty() {
        return Err("Password cannot be empty".into());
    }

    let user_id = resolve_user_id(conn, user)?;
    set_user_password(conn, user_id, password)?;

    println!("Password changed successfully for user: {}", user);
    Ok(())
}

pub fn list_users_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<Vec<User>, Box<dyn std::error::Error>> {
    let users = filter_matching(get_all_users(conn)?, search_term.as_deref(), fixed_string, |u| {
        u.username.clone()
    })?;

    if users.is_empty() {
        println!("No users found.");
    } else {
        println!("Users:");
        for user in &users {
            let teams = get_teams_for_user(conn, user.id)?
                .into_iter()
                .map(|t| t.name)
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "  ID: {}, {}, Teams: [{}], Joined: {}",
                user.id,
                user,
                teams,
                user.date_joined.format("%Y-%m-%d")
            );
        }
    }

    Ok(users)
}

pub fn remove_users_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let matching_users =
        filter_matching(get_all_users(conn)?, Some(&search_term), fixed_string, |u| {
            u.username.clone()
        })?;

    if matching_users.is_empty() {
        println!("No users found matching the search term.");
        return Ok(0);
    }

    println!("Found {} user(s) matching the search term:", matching_users.len());
    for user in &matching_users {
        println!("  ID: {}, {}", user.id, user);
    }

    if !yes
        && !confirm(&format!(
            "Are you sure you want to delete these {} user(s)? Work orders they created will be kept",
            matching_users.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    let mut errors = Vec::new();

    for user in matching_users {
        match delete_user(conn, user.id) {
            Ok(rows_affected) if rows_affected > 0 => {
                deleted_count += 1;
                println!("Deleted user: {} (ID: {})", user.username, user.id);
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(format!("Failed to delete user {} (ID: {}): {}", user.username, user.id, e));
            }
        }
    }

    println!("Successfully deleted {} user(s).", deleted_count);

    if !errors.is_empty() {
        println!("Errors encountered:");
        for error in errors {
            println!("  {}", error);
        }
        return Err("Some deletions failed".into());
    }

    Ok(deleted_count)
}

pub fn user_edit_impl(
    conn: &mut SqliteConnection,
    user: &str,
    changes: UserUpdate,
) -> Result<Option<User>, Box<dyn std::error::Error>> {
    let user_id = resolve_user_id(conn, user)?;

    if changes.username.is_none()
        && changes.email.is_none()
        && changes.first_name.is_none()
        && changes.last_name.is_none()
        && changes.role.is_none()
        && changes.is_staff.is_none()
        && changes.is_active.is_none()
    {
        println!("No fields specified for update. See `cmms-admin user edit --help`.");
        return Ok(get_user_by_id(conn, user_id)?);
    }

    let updated_user = update_user(conn, user_id, changes)?;

    println!("User updated successfully!");
    print_user(&updated_user);

    Ok(Some(updated_user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmms_api::orm::{testing::setup_test_db, user::get_user_by_username};

    fn input(username: &str) -> UserInput {
        UserInput {
            username: username.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: None,
            is_active: None,
            is_staff: Some(false),
            role: Some(Role::Technician),
        }
    }

    #[test]
    fn test_add_and_list_users() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, input("tech-one")).expect("add");
        add_user_impl(&mut conn, input("tech-two")).expect("add");
        add_user_impl(&mut conn, input("operator")).expect("add");

        let techs = list_users_impl(&mut conn, Some("^tech-".to_string()), false).expect("ls");
        assert_eq!(techs.len(), 2);

        let all = list_users_impl(&mut conn, None, false).expect("ls");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_add_duplicate_username_fails() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, input("sam")).expect("add");
        assert!(add_user_impl(&mut conn, input("sam")).is_err());
    }

    #[test]
    fn test_set_password_by_username() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, input("pat")).expect("add");

        set_password_impl(&mut conn, "pat", "hunter22").expect("set password");

        let user = get_user_by_username(&mut conn, "pat").expect("query").expect("user");
        let hash = user.password_hash.expect("hash stored");
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("hunter22"));
        assert!(set_password_impl(&mut conn, "pat", "").is_err());
        assert!(set_password_impl(&mut conn, "nobody", "hunter22").is_err());
    }

    #[test]
    fn test_edit_user() {
        let mut conn = setup_test_db();
        let user = add_user_impl(&mut conn, input("lee")).expect("add");

        let changes = UserUpdate {
            role: Some(Role::TeamManager),
            is_staff: Some(true),
            ..Default::default()
        };
        let updated = user_edit_impl(&mut conn, &user.id.to_string(), changes)
            .expect("edit")
            .expect("user");
        assert_eq!(updated.role, Role::TeamManager);
        assert!(updated.is_staff);
        assert_eq!(updated.username, "lee");
    }

    #[test]
    fn test_remove_users_with_yes() {
        let mut conn = setup_test_db();
        add_user_impl(&mut conn, input("temp-a")).expect("add");
        add_user_impl(&mut conn, input("temp-b")).expect("add");
        add_user_impl(&mut conn, input("keeper")).expect("add");

        let removed = remove_users_impl(&mut conn, "temp-".to_string(), true, true).expect("rm");
        assert_eq!(removed, 2);
        assert_eq!(get_all_users(&mut conn).expect("users").len(), 1);

        let none = remove_users_impl(&mut conn, "temp-".to_string(), true, true).expect("rm");
        assert_eq!(none, 0);
    }
}
