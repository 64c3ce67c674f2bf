use std::fmt;

use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::{team_members, teams};

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[diesel(table_name = teams)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Team {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = teams)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct TeamInput {
    pub name: String,
    pub description: Option<String>,
    /// Users to enrol as members on creation.
    #[serde(default)]
    pub member_ids: Vec<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct TeamUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
}

/// Row of the user <-> team join table.
#[derive(Queryable, Selectable, Identifiable, Associations, Insertable, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[diesel(belongs_to(crate::models::team::Team))]
#[diesel(belongs_to(crate::models::user::User))]
#[diesel(table_name = team_members)]
#[diesel(primary_key(team_id, user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct TeamMember {
    pub team_id: i32,
    pub user_id: i32,
}
