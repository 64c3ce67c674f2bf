use diesel::prelude::*;

use crate::models::{NewUser, Team, User, UserInput, UserUpdate};
use crate::orm::db::last_insert_rowid;
use crate::orm::password::hash_password;

/// Creates a new user. The password, if any, is hashed before storage; the
/// role defaults to `viewer`.
pub fn insert_user(
    conn: &mut SqliteConnection,
    user_input: UserInput,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    let hashed = match user_input.password.as_deref() {
        Some(plain) => Some(hash_password(plain)?),
        None => None,
    };

    let new_user = NewUser {
        username: user_input.username,
        email: user_input.email,
        first_name: user_input.first_name.unwrap_or_default(),
        last_name: user_input.last_name.unwrap_or_default(),
        password_hash: hashed,
        is_active: user_input.is_active.unwrap_or(true),
        is_staff: user_input.is_staff.unwrap_or(false),
        role: user_input.role.unwrap_or_default(),
    };

    diesel::insert_into(users).values(&new_user).execute(conn)?;

    let last_id = last_insert_rowid(conn)?;
    users.filter(id.eq(last_id)).select(User::as_select()).first(conn)
}

/// Gets a user by ID.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.filter(id.eq(user_id)).select(User::as_select()).first(conn).optional()
}

/// Gets a user by username (exact match).
pub fn get_user_by_username(
    conn: &mut SqliteConnection,
    user_name: &str,
) -> Result<Option<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users
        .filter(username.eq(user_name))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Lists all users ordered by ID.
pub fn get_all_users(conn: &mut SqliteConnection) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    users.order(id.asc()).select(User::as_select()).load(conn)
}

/// Applies a partial update to a user and returns the stored result.
pub fn update_user(
    conn: &mut SqliteConnection,
    user_id: i32,
    changes: UserUpdate,
) -> Result<User, diesel::result::Error> {
    use crate::schema::users::dsl::*;

    // First, get the current user to preserve existing values
    let current = users.filter(id.eq(user_id)).select(User::as_select()).first(conn)?;

    let new_hash = match changes.password.as_deref() {
        Some(plain) => Some(hash_password(plain)?),
        None => current.password_hash,
    };

    diesel::update(users.filter(id.eq(user_id)))
        .set((
            username.eq(changes.username.unwrap_or(current.username)),
            email.eq(changes.email.unwrap_or(current.email)),
            first_name.eq(changes.first_name.unwrap_or(current.first_name)),
            last_name.eq(changes.last_name.unwrap_or(current.last_name)),
            password_hash.eq(new_hash),
            is_active.eq(changes.is_active.unwrap_or(current.is_active)),
            is_staff.eq(changes.is_staff.unwrap_or(current.is_staff)),
            role.eq(changes.role.unwrap_or(current.role)),
        ))
        .execute(conn)?;

    users.filter(id.eq(user_id)).select(User::as_select()).first(conn)
}

/// Replaces a user's password.
pub fn set_user_password(
    conn: &mut SqliteConnection,
    user_id: i32,
    new_password: &str,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    let hashed = hash_password(new_password)?;
    diesel::update(users.filter(id.eq(user_id)))
        .set(password_hash.eq(Some(hashed)))
        .execute(conn)
}

/// Deletes a user. Team memberships go with it; spare transactions and work
/// orders that reference the user keep their rows with the reference nulled.
pub fn delete_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::users::dsl::*;
    diesel::delete(users.filter(id.eq(user_id))).execute(conn)
}

/// Teams the user belongs to, ordered by team ID.
pub fn get_teams_for_user(
    conn: &mut SqliteConnection,
    user_id: i32,
) -> Result<Vec<Team>, diesel::result::Error> {
    use crate::schema::{team_members, teams};
    team_members::table
        .inner_join(teams::table)
        .filter(team_members::user_id.eq(user_id))
        .order(teams::id.asc())
        .select(Team::as_select())
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::orm::testing::setup_test_db;
    use diesel::result::{DatabaseErrorKind, Error};

    fn input(name: &str) -> UserInput {
        UserInput {
            username: name.to_string(),
            email: None,
            first_name: None,
            last_name: None,
            password: None,
            is_active: None,
            is_staff: None,
            role: None,
        }
    }

    #[test]
    fn test_insert_user_applies_defaults() {
        let mut conn = setup_test_db();

        let user = insert_user(&mut conn, input("alice")).expect("Failed to insert user");

        assert!(user.id > 0);
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Viewer);
        assert_eq!(user.first_name, "");
        assert!(user.is_active);
        assert!(!user.is_staff);
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn test_insert_user_hashes_password() {
        let mut conn = setup_test_db();

        let mut new_user = input("bob");
        new_user.password = Some("s3cret".to_string());
        new_user.role = Some(Role::Technician);

        let user = insert_user(&mut conn, new_user).expect("Failed to insert user");
        let stored = user.password_hash.expect("password hash stored");
        assert_ne!(stored, "s3cret");
        assert!(stored.starts_with("$argon2"));
        assert_eq!(user.role, Role::Technician);
    }

    #[test]
    fn test_username_is_unique() {
        let mut conn = setup_test_db();

        insert_user(&mut conn, input("carol")).expect("first insert");
        let result = insert_user(&mut conn, input("carol"));
        assert!(matches!(
            result,
            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        ));
    }

    #[test]
    fn test_invalid_role_rejected_by_store() {
        let mut conn = setup_test_db();

        let result = diesel::sql_query("INSERT INTO users (username, role) VALUES ('eve', 'superuser')")
            .execute(&mut conn);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_user_partial() {
        let mut conn = setup_test_db();

        let mut new_user = input("dave");
        new_user.email = Some("dave@example.com".to_string());
        let user = insert_user(&mut conn, new_user).expect("insert");

        let updated = update_user(
            &mut conn,
            user.id,
            UserUpdate {
                role: Some(Role::SpareManager),
                email: Some(None),
                ..Default::default()
            },
        )
        .expect("update");

        assert_eq!(updated.username, "dave");
        assert_eq!(updated.role, Role::SpareManager);
        assert_eq!(updated.email, None);
    }

    #[test]
    fn test_set_user_password() {
        let mut conn = setup_test_db();
        let user = insert_user(&mut conn, input("frank")).expect("insert");

        let rows = set_user_password(&mut conn, user.id, "hunter2").expect("set password");
        assert_eq!(rows, 1);

        let reloaded = get_user_by_id(&mut conn, user.id).expect("query").expect("user exists");
        assert!(reloaded.password_hash.is_some());
    }

    #[test]
    fn test_get_user_by_username_and_delete() {
        let mut conn = setup_test_db();
        let user = insert_user(&mut conn, input("grace")).expect("insert");

        let found = get_user_by_username(&mut conn, "grace").expect("query");
        assert_eq!(found.map(|u| u.id), Some(user.id));

        assert_eq!(delete_user(&mut conn, user.id).expect("delete"), 1);
        assert!(get_user_by_id(&mut conn, user.id).expect("query").is_none());
        assert_eq!(delete_user(&mut conn, user.id).expect("delete again"), 0);
    }

    #[test]
    fn test_display_format() {
        let mut conn = setup_test_db();
        let mut new_user = input("heidi");
        new_user.role = Some(Role::Operator);
        let user = insert_user(&mut conn, new_user).expect("insert");
        assert_eq!(user.to_string(), "heidi (operator)");
    }
}
