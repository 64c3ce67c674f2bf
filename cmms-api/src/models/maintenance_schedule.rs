use chrono::NaiveDate;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::maintenance_schedules;

choice_enum! {
    pub enum MaintenanceType {
        Preventive => ("preventive", "Preventive"),
        Corrective => ("corrective", "Corrective"),
        Predictive => ("predictive", "Predictive"),
    }
}

/// Recurring maintenance plan for a piece of equipment. Normally one of
/// `frequency_days` or `run_hours` is set; neither is required.
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Associations,
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    TS,
)]
#[diesel(belongs_to(crate::models::equipment::Equipment))]
#[diesel(table_name = maintenance_schedules)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct MaintenanceSchedule {
    pub id: i32,
    pub equipment_id: i32,
    pub schedule_type: MaintenanceType,
    pub frequency_days: Option<i32>,
    pub run_hours: Option<i32>,
    #[ts(type = "string")]
    pub next_due_date: NaiveDate,
}

impl MaintenanceSchedule {
    pub fn display(&self, equipment_name: &str) -> String {
        format!(
            "{} - {} due on {}",
            equipment_name, self.schedule_type, self.next_due_date
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = maintenance_schedules)]
pub struct NewMaintenanceSchedule {
    pub equipment_id: i32,
    pub schedule_type: MaintenanceType,
    pub frequency_days: Option<i32>,
    pub run_hours: Option<i32>,
    pub next_due_date: NaiveDate,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MaintenanceScheduleInput {
    pub equipment_id: i32,
    pub schedule_type: MaintenanceType,
    pub frequency_days: Option<i32>,
    pub run_hours: Option<i32>,
    #[ts(type = "string")]
    pub next_due_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MaintenanceScheduleUpdate {
    pub equipment_id: Option<i32>,
    pub schedule_type: Option<MaintenanceType>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub frequency_days: Option<Option<i32>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub run_hours: Option<Option<i32>>,
    #[ts(type = "string | null")]
    pub next_due_date: Option<NaiveDate>,
}
