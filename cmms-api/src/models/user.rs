use std::fmt;

use chrono::NaiveDateTime;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::users;

choice_enum! {
    /// What a user is responsible for inside the maintenance organisation.
    pub enum Role {
        Admin => ("admin", "Admin"),
        TeamManager => ("team_manager", "Team Manager"),
        EquipmentManager => ("equipment_manager", "Equipment Manager"),
        SpareManager => ("spare_manager", "Spare Manager"),
        Technician => ("technician", "Technician"),
        Operator => ("operator", "Operator"),
        Viewer => ("viewer", "Viewer"),
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Viewer
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct User {
    pub id: i32,
    pub username: String, // Will be unique
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    #[ts(type = "string")]
    pub date_joined: NaiveDateTime,
    pub role: Role,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.username, self.role)
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub role: Role,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UserInput {
    pub username: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Plain text password, hashed before it is stored. Never echoed back.
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    /// Defaults to `viewer`.
    pub role: Option<Role>,
}

/// Partial update of a user. Absent fields are left untouched; `null`
/// clears a nullable field.
#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct UserUpdate {
    pub username: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub email: Option<Option<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(skip_serializing, default)]
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub role: Option<Role>,
}
