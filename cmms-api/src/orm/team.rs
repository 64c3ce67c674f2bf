use diesel::prelude::*;

use crate::models::{NewTeam, Team, TeamInput, TeamMember, TeamUpdate, User};
use crate::orm::db::last_insert_rowid;

/// Creates a team and enrols the given members in one transaction.
pub fn insert_team(
    conn: &mut SqliteConnection,
    team_input: TeamInput,
) -> Result<Team, diesel::result::Error> {
    use crate::schema::teams::dsl::*;

    conn.transaction(|conn| {
        let new_team = NewTeam {
            name: team_input.name,
            description: team_input.description,
        };

        diesel::insert_into(teams).values(&new_team).execute(conn)?;
        let last_id = last_insert_rowid(conn)?;

        for member_id in team_input.member_ids {
            add_team_member(conn, last_id, member_id)?;
        }

        teams.filter(id.eq(last_id)).select(Team::as_select()).first(conn)
    })
}

/// Gets a team by ID.
pub fn get_team_by_id(
    conn: &mut SqliteConnection,
    team_id: i32,
) -> Result<Option<Team>, diesel::result::Error> {
    use crate::schema::teams::dsl::*;
    teams.filter(id.eq(team_id)).select(Team::as_select()).first(conn).optional()
}

/// Gets a team by name (exact match).
pub fn get_team_by_name(
    conn: &mut SqliteConnection,
    team_name: &str,
) -> Result<Option<Team>, diesel::result::Error> {
    use crate::schema::teams::dsl::*;
    teams.filter(name.eq(team_name)).select(Team::as_select()).first(conn).optional()
}

/// Lists all teams ordered by ID.
pub fn get_all_teams(conn: &mut SqliteConnection) -> Result<Vec<Team>, diesel::result::Error> {
    use crate::schema::teams::dsl::*;
    teams.order(id.asc()).select(Team::as_select()).load(conn)
}

pub fn update_team(
    conn: &mut SqliteConnection,
    team_id: i32,
    changes: TeamUpdate,
) -> Result<Team, diesel::result::Error> {
    use crate::schema::teams::dsl::*;

    let current = teams.filter(id.eq(team_id)).select(Team::as_select()).first(conn)?;

    diesel::update(teams.filter(id.eq(team_id)))
        .set((
            name.eq(changes.name.unwrap_or(current.name)),
            description.eq(changes.description.unwrap_or(current.description)),
        ))
        .execute(conn)?;

    teams.filter(id.eq(team_id)).select(Team::as_select()).first(conn)
}

/// Deletes a team. Memberships are removed and work orders assigned to the
/// team become unassigned.
pub fn delete_team(
    conn: &mut SqliteConnection,
    team_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::teams::dsl::*;
    diesel::delete(teams.filter(id.eq(team_id))).execute(conn)
}

/// Adds a user to a team. Adding an existing member is a uniqueness
/// violation.
pub fn add_team_member(
    conn: &mut SqliteConnection,
    team_id: i32,
    user_id: i32,
) -> Result<TeamMember, diesel::result::Error> {
    use crate::schema::team_members;

    let member = TeamMember { team_id, user_id };
    diesel::insert_into(team_members::table).values(&member).execute(conn)?;
    Ok(member)
}

/// Removes a user from a team. Returns the number of memberships removed.
pub fn remove_team_member(
    conn: &mut SqliteConnection,
    team_id: i32,
    user_id: i32,
) -> Result<usize, diesel::result::Error> {
    use crate::schema::team_members;

    diesel::delete(
        team_members::table
            .filter(team_members::team_id.eq(team_id))
            .filter(team_members::user_id.eq(user_id)),
    )
    .execute(conn)
}

/// Members of a team, ordered by user ID.
pub fn get_team_members(
    conn: &mut SqliteConnection,
    team_id: i32,
) -> Result<Vec<User>, diesel::result::Error> {
    use crate::schema::{team_members, users};
    team_members::table
        .inner_join(users::table)
        .filter(team_members::team_id.eq(team_id))
        .order(users::id.asc())
        .select(User::as_select())
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserInput;
    use crate::orm::testing::setup_test_db;
    use crate::orm::user::{delete_user, get_teams_for_user, insert_user};
    use diesel::result::{DatabaseErrorKind, Error};

    fn make_user(conn: &mut SqliteConnection, username: &str) -> User {
        insert_user(
            conn,
            UserInput {
                username: username.to_string(),
                email: None,
                first_name: None,
                last_name: None,
                password: None,
                is_active: None,
                is_staff: None,
                role: None,
            },
        )
        .expect("Failed to insert user")
    }

    fn team_input(name: &str, member_ids: Vec<i32>) -> TeamInput {
        TeamInput {
            name: name.to_string(),
            description: None,
            member_ids,
        }
    }

    #[test]
    fn test_insert_team_with_members() {
        let mut conn = setup_test_db();
        let a = make_user(&mut conn, "a");
        let b = make_user(&mut conn, "b");

        let team = insert_team(&mut conn, team_input("Mechanical", vec![a.id, b.id]))
            .expect("Failed to insert team");

        let members = get_team_members(&mut conn, team.id).expect("members");
        assert_eq!(members.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id, b.id]);
        assert_eq!(team.to_string(), "Mechanical");
    }

    #[test]
    fn test_insert_team_rolls_back_on_unknown_member() {
        let mut conn = setup_test_db();

        let result = insert_team(&mut conn, team_input("Electrical", vec![999]));
        assert!(matches!(
            result,
            Err(Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _))
        ));
        assert!(get_team_by_name(&mut conn, "Electrical").expect("query").is_none());
    }

    #[test]
    fn test_team_name_is_unique() {
        let mut conn = setup_test_db();
        insert_team(&mut conn, team_input("Night Shift", vec![])).expect("first");

        let result = insert_team(&mut conn, team_input("Night Shift", vec![]));
        assert!(matches!(
            result,
            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        ));
    }

    #[test]
    fn test_membership_is_many_to_many() {
        let mut conn = setup_test_db();
        let user = make_user(&mut conn, "multi");
        let t1 = insert_team(&mut conn, team_input("One", vec![user.id])).expect("t1");
        let t2 = insert_team(&mut conn, team_input("Two", vec![user.id])).expect("t2");

        let user_teams = get_teams_for_user(&mut conn, user.id).expect("teams");
        assert_eq!(user_teams.iter().map(|t| t.id).collect::<Vec<_>>(), vec![t1.id, t2.id]);

        // Duplicate membership is rejected
        let dup = add_team_member(&mut conn, t1.id, user.id);
        assert!(matches!(
            dup,
            Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        ));

        assert_eq!(remove_team_member(&mut conn, t1.id, user.id).expect("remove"), 1);
        assert_eq!(get_teams_for_user(&mut conn, user.id).expect("teams").len(), 1);
    }

    #[test]
    fn test_deleting_user_or_team_clears_membership() {
        let mut conn = setup_test_db();
        let keep = make_user(&mut conn, "keep");
        let gone = make_user(&mut conn, "gone");
        let team = insert_team(&mut conn, team_input("Crew", vec![keep.id, gone.id])).expect("team");

        delete_user(&mut conn, gone.id).expect("delete user");
        let members = get_team_members(&mut conn, team.id).expect("members");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, keep.id);

        delete_team(&mut conn, team.id).expect("delete team");
        assert!(get_teams_for_user(&mut conn, keep.id).expect("teams").is_empty());
    }

    #[test]
    fn test_update_team() {
        let mut conn = setup_test_db();
        let team = insert_team(
            &mut conn,
            TeamInput {
                name: "Old".to_string(),
                description: Some("desc".to_string()),
                member_ids: vec![],
            },
        )
        .expect("team");

        let updated = update_team(
            &mut conn,
            team.id,
            TeamUpdate { name: Some("New".to_string()), description: Some(None) },
        )
        .expect("update");
        assert_eq!(updated.name, "New");
        assert_eq!(updated.description, None);
    }
}
