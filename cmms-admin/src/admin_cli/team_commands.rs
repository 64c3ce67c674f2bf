use clap::Subcommand;
use diesel::sqlite::SqliteConnection;

use cmms_api::models::{Team, TeamInput, TeamUpdate};
use cmms_api::orm::team::{
    add_team_member, delete_team, get_all_teams, get_team_by_id, get_team_members, insert_team,
    remove_team_member, update_team,
};

use crate::admin_cli::utils::{confirm, filter_matching, resolve_team_id, resolve_user_id};

#[derive(Subcommand)]
pub enum TeamAction {
    #[command(about = "Add a new team")]
    Add {
        #[arg(short, long, help = "Team name")]
        name: String,
        #[arg(short, long, help = "Description")]
        description: Option<String>,
        #[arg(short, long = "member", help = "Member user ID or username (repeatable)")]
        members: Vec<String>,
    },
    #[command(about = "List teams, optionally filtered by search term")]
    Ls {
        #[arg(help = "Search term (regex by default, use -F for fixed string)")]
        search_term: Option<String>,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
    },
    #[command(about = "Remove teams matching search term")]
    Rm {
        #[arg(help = "Search term to match team names for removal (regex by default, use -F for fixed string)")]
        search_term: String,
        #[arg(short = 'F', long = "fixed-string", help = "Treat search term as fixed string instead of regex")]
        fixed_string: bool,
        #[arg(short = 'y', long = "yes", help = "Skip confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Edit team fields")]
    Edit {
        #[arg(help = "Team ID or name")]
        team: String,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New description")]
        description: Option<String>,
    },
    #[command(about = "Add a user to a team")]
    AddMember {
        #[arg(help = "Team ID or name")]
        team: String,
        #[arg(help = "User ID or username")]
        user: String,
    },
    #[command(about = "Remove a user from a team")]
    RemoveMember {
        #[arg(help = "Team ID or name")]
        team: String,
        #[arg(help = "User ID or username")]
        user: String,
    },
}

pub fn handle_team_command_with_conn(
    conn: &mut SqliteConnection,
    action: TeamAction,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TeamAction::Add { name, description, members } => {
            add_team_impl(conn, name, description, &members)?;
        }
        TeamAction::Ls { search_term, fixed_string } => {
            list_teams_impl(conn, search_term, fixed_string)?;
        }
        TeamAction::Rm { search_term, fixed_string, yes } => {
            remove_teams_impl(conn, search_term, fixed_string, yes)?;
        }
        TeamAction::Edit { team, name, description } => {
            team_edit_impl(conn, &team, name, description)?;
        }
        TeamAction::AddMember { team, user } => {
            add_member_impl(conn, &team, &user)?;
        }
        TeamAction::RemoveMember { team, user } => {
            remove_member_impl(conn, &team, &user)?;
        }
    }
    Ok(())
}

pub fn add_team_impl(
    conn: &mut SqliteConnection,
    name: String,
    description: Option<String>,
    members: &[String],
) -> Result<Team, Box<dyn std::error::Error>> {
    let member_ids = members
        .iter()
        .map(|m| resolve_user_id(conn, m))
        .collect::<Result<Vec<_>, _>>()?;

    let team = insert_team(conn, TeamInput { name, description, member_ids })?;

    println!("Team created successfully!");
    println!("ID: {}", team.id);
    println!("Name: {}", team.name);
    println!("Members: {}", members.len());

    Ok(team)
}

pub fn list_teams_impl(
    conn: &mut SqliteConnection,
    search_term: Option<String>,
    fixed_string: bool,
) -> Result<Vec<Team>, Box<dyn std::error::Error>> {
    let teams =
        filter_matching(get_all_teams(conn)?, search_term.as_deref(), fixed_string, |t| {
            t.name.clone()
        })?;

    if teams.is_empty() {
        println!("No teams found.");
        return Ok(teams);
    }

    println!("Teams:");
    for team in &teams {
        let members = get_team_members(conn, team.id)?
            .into_iter()
            .map(|u| u.username)
            .collect::<Vec<_>>();
        println!("  ID: {}, Name: {}, Members: [{}]", team.id, team.name, members.join(", "));
    }

    Ok(teams)
}

pub fn remove_teams_impl(
    conn: &mut SqliteConnection,
    search_term: String,
    fixed_string: bool,
    yes: bool,
) -> Result<usize, Box<dyn std::error::Error>> {
    let matching_teams =
        filter_matching(get_all_teams(conn)?, Some(&search_term), fixed_string, |t| {
            t.name.clone()
        })?;

    if matching_teams.is_empty() {
        println!("No teams found matching the search term.");
        return Ok(0);
    }

    println!("Found {} team(s) matching the search term:", matching_teams.len());
    for team in &matching_teams {
        println!("  ID: {}, Name: {}", team.id, team.name);
    }

    if !yes
        && !confirm(&format!(
            "Delete these {} team(s)? Their work orders become unassigned",
            matching_teams.len()
        ))?
    {
        println!("Operation cancelled.");
        return Ok(0);
    }

    let mut deleted_count = 0;
    for team in matching_teams {
        if delete_team(conn, team.id)? > 0 {
            deleted_count += 1;
            println!("Deleted team: {} (ID: {})", team.name, team.id);
        }
    }

    println!("Successfully deleted {} team(s).", deleted_count);
    Ok(deleted_count)
}

pub fn team_edit_impl(
    conn: &mut SqliteConnection,
    team: &str,
    name: Option<String>,
    description: Option<String>,
) -> Result<Option<Team>, Box<dyn std::error::Error>> {
    let team_id = resolve_team_id(conn, team)?;

    if name.is_none() && description.is_none() {
        println!("No fields specified for update. Use --name or --description.");
        return Ok(get_team_by_id(conn, team_id)?);
    }

    let updated = update_team(conn, team_id, TeamUpdate { name, description: description.map(Some) })?;

    println!("Team updated successfully!");
    println!("ID: {}", updated.id);
    println!("Name: {}", updated.name);
    Ok(Some(updated))
}

pub fn add_member_impl(
    conn: &mut SqliteConnection,
    team: &str,
    user: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let team_id = resolve_team_id(conn, team)?;
    let user_id = resolve_user_id(conn, user)?;

    if get_team_members(conn, team_id)?.iter().any(|u| u.id == user_id) {
        println!("User '{}' is already a member of team '{}'", user, team);
        return Ok(());
    }

    add_team_member(conn, team_id, user_id)?;
    println!("Added user '{}' to team '{}'", user, team);
    Ok(())
}

pub fn remove_member_impl(
    conn: &mut SqliteConnection,
    team: &str,
    user: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let team_id = resolve_team_id(conn, team)?;
    let user_id = resolve_user_id(conn, user)?;

    if remove_team_member(conn, team_id, user_id)? == 0 {
        println!("User '{}' is not a member of team '{}'", user, team);
    } else {
        println!("Removed user '{}' from team '{}'", user, team);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmms_api::models::UserInput;
    use cmms_api::orm::{testing::setup_test_db, user::insert_user};

    fn user(conn: &mut SqliteConnection, username: &str) -> i32 {
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
        .expect("user")
        .id
    }

    #[test]
    fn test_add_team_with_members_by_name() {
        let mut conn = setup_test_db();
        user(&mut conn, "ana");
        let ben = user(&mut conn, "ben");

        let team = add_team_impl(
            &mut conn,
            "HVAC".to_string(),
            None,
            &["ana".to_string(), ben.to_string()],
        )
        .expect("team");

        assert_eq!(get_team_members(&mut conn, team.id).expect("members").len(), 2);
    }

    #[test]
    fn test_add_team_with_unknown_member_fails() {
        let mut conn = setup_test_db();
        let result = add_team_impl(&mut conn, "HVAC".to_string(), None, &["ghost".to_string()]);
        assert!(result.is_err());
        assert!(get_all_teams(&mut conn).expect("teams").is_empty());
    }

    #[test]
    fn test_member_add_is_idempotent_and_remove() {
        let mut conn = setup_test_db();
        user(&mut conn, "cal");
        let team = add_team_impl(&mut conn, "Civil".to_string(), None, &[]).expect("team");

        add_member_impl(&mut conn, "Civil", "cal").expect("add");
        add_member_impl(&mut conn, "Civil", "cal").expect("second add is a no-op");
        assert_eq!(get_team_members(&mut conn, team.id).expect("members").len(), 1);

        remove_member_impl(&mut conn, "Civil", "cal").expect("remove");
        remove_member_impl(&mut conn, "Civil", "cal").expect("second remove is a no-op");
        assert!(get_team_members(&mut conn, team.id).expect("members").is_empty());
    }

    #[test]
    fn test_edit_and_remove_teams() {
        let mut conn = setup_test_db();
        add_team_impl(&mut conn, "Night".to_string(), None, &[]).expect("team");
        add_team_impl(&mut conn, "Day".to_string(), None, &[]).expect("team");

        let edited = team_edit_impl(&mut conn, "Night", None, Some("Graveyard".to_string()))
            .expect("edit")
            .expect("team");
        assert_eq!(edited.description.as_deref(), Some("Graveyard"));

        let removed = remove_teams_impl(&mut conn, "^Ni".to_string(), false, true).expect("rm");
        assert_eq!(removed, 1);
        assert_eq!(list_teams_impl(&mut conn, None, false).expect("ls").len(), 1);
    }
}
