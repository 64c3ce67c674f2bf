use diesel::prelude::*;
use dotenvy::dotenv;
use rocket::Rocket;
use rocket::fairing::AdHoc;

use crate::models::{Role, UserInput, UserUpdate};
use crate::orm::DbConn;
use crate::orm::user::{get_user_by_username, insert_user, update_user};

/// Add a default administrator if one is missing.
///
/// The username and password come from CMMS_DEFAULT_USERNAME and
/// CMMS_DEFAULT_PASSWORD, both defaulting to `admin`.
pub fn admin_init_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Admin User Initialization", |rocket| async {
        dotenv().ok();

        let conn = match get_db_connection(&rocket).await {
            Some(conn) => conn,
            None => return Err(rocket),
        };

        let admin_username = get_admin_username();
        let admin_password = get_admin_password();

        let result = conn
            .run(move |c| create_admin_user_if_needed(c, &admin_username, &admin_password))
            .await;

        match result {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[admin-init] FATAL: Admin user creation failed: {:?}", e);
                Err(rocket)
            }
        }
    })
}

async fn get_db_connection(rocket: &Rocket<rocket::Build>) -> Option<DbConn> {
    match DbConn::get_one(rocket).await {
        Some(conn) => Some(conn),
        None => {
            error!("[admin-init] ERROR: Could not get DB connection.");
            None
        }
    }
}

fn get_admin_username() -> String {
    std::env::var("CMMS_DEFAULT_USERNAME").unwrap_or_else(|_| "admin".to_string())
}

fn get_admin_password() -> String {
    std::env::var("CMMS_DEFAULT_PASSWORD").unwrap_or_else(|_| "admin".to_string())
}

fn create_admin_user_if_needed(
    c: &mut SqliteConnection,
    admin_username: &str,
    admin_password: &str,
) -> Result<(), diesel::result::Error> {
    if let Some(existing) = get_user_by_username(c, admin_username)? {
        if existing.role != Role::Admin || !existing.is_staff {
            warn!(
                "[admin-init] User '{}' exists without admin rights; promoting",
                admin_username
            );
            update_user(
                c,
                existing.id,
                UserUpdate {
                    role: Some(Role::Admin),
                    is_staff: Some(true),
                    ..Default::default()
                },
            )?;
        } else {
            info!("[admin-init] Admin user '{}' already exists", admin_username);
        }
        return Ok(());
    }

    let user = insert_user(
        c,
        UserInput {
            username: admin_username.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: Some(admin_password.to_string()),
            is_active: Some(true),
            is_staff: Some(true),
            role: Some(Role::Admin),
        },
    )?;
    info!("[admin-init] Created admin user '{}' (id {})", user.username, user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orm::testing::setup_test_db;
    use crate::orm::user::get_all_users;

    #[test]
    fn test_creates_admin_once() {
        let mut conn = setup_test_db();

        create_admin_user_if_needed(&mut conn, "root", "pw").expect("first run");
        create_admin_user_if_needed(&mut conn, "root", "pw").expect("second run");

        let all = get_all_users(&mut conn).expect("list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role, Role::Admin);
        assert!(all[0].is_staff);
        assert!(all[0].password_hash.is_some());
    }

    #[test]
    fn test_promotes_existing_user() {
        let mut conn = setup_test_db();
        insert_user(
            &mut conn,
            UserInput {
                username: "root".to_string(),
                email: None,
                first_name: None,
                last_name: None,
                password: None,
                is_active: None,
                is_staff: None,
                role: None,
            },
        )
        .expect("insert");

        create_admin_user_if_needed(&mut conn, "root", "pw").expect("promote");

        let user = get_user_by_username(&mut conn, "root").expect("query").expect("exists");
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_staff);
    }
}
