use std::fmt;

use chrono::NaiveDate;
use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::equipment;

choice_enum! {
    /// Operational state of a piece of equipment.
    pub enum EquipmentStatus {
        Active => ("active", "Active"),
        Inactive => ("inactive", "Inactive"),
        UnderMaintenance => ("under_maintenance", "Under Maintenance"),
        Decommissioned => ("decommissioned", "Decommissioned"),
    }
}

impl Default for EquipmentStatus {
    fn default() -> Self {
        EquipmentStatus::Active
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[diesel(table_name = equipment)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub equipment_type: Option<String>,
    pub serial_number: String,
    pub location: String,
    #[ts(type = "string")]
    pub install_date: NaiveDate,
    pub status: EquipmentStatus,
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} : {}",
            self.name, self.serial_number, self.status, self.location
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = equipment)]
pub struct NewEquipment {
    pub name: String,
    pub equipment_type: Option<String>,
    pub serial_number: String,
    pub location: String,
    pub install_date: NaiveDate,
    pub status: EquipmentStatus,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EquipmentInput {
    pub name: String,
    pub equipment_type: Option<String>,
    pub serial_number: String,
    pub location: String,
    /// Defaults to today when omitted.
    #[ts(type = "string | null")]
    pub install_date: Option<NaiveDate>,
    pub status: Option<EquipmentStatus>,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct EquipmentUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub equipment_type: Option<Option<String>>,
    pub serial_number: Option<String>,
    pub location: Option<String>,
    #[ts(type = "string | null")]
    pub install_date: Option<NaiveDate>,
    pub status: Option<EquipmentStatus>,
}
