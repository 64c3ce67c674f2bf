use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::work_orders;

choice_enum! {
    /// Work order progress. Updates may move between any two states.
    pub enum WorkOrderStatus {
        Pending => ("pending", "Pending"),
        Assigned => ("assigned", "Assigned"),
        Approved => ("approved", "Approved"),
        InProgress => ("in_progress", "In Progress"),
        Completed => ("completed", "Completed"),
        Closed => ("closed", "Closed"),
    }
}

impl Default for WorkOrderStatus {
    fn default() -> Self {
        WorkOrderStatus::Pending
    }
}

choice_enum! {
    pub enum Priority {
        Low => ("low", "Low"),
        Medium => ("medium", "Medium"),
        High => ("high", "High"),
        Critical => ("critical", "Critical"),
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

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
#[diesel(table_name = work_orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct WorkOrder {
    pub id: i32,
    pub number: String, // Will be unique
    pub equipment_id: i32,
    pub created_by_id: Option<i32>,
    pub assigned_team_id: Option<i32>,
    pub description: String,
    pub status: WorkOrderStatus,
    pub priority: Priority,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
    #[ts(type = "string")]
    pub updated_at: NaiveDateTime,
}

impl WorkOrder {
    pub fn display(&self, equipment_name: &str) -> String {
        format!("WO-{} for {} - {}", self.number, equipment_name, self.status)
    }
}

#[derive(Insertable)]
#[diesel(table_name = work_orders)]
pub struct NewWorkOrder {
    pub number: String,
    pub equipment_id: i32,
    pub created_by_id: Option<i32>,
    pub assigned_team_id: Option<i32>,
    pub description: String,
    pub status: WorkOrderStatus,
    pub priority: Priority,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct WorkOrderInput {
    pub number: String,
    pub equipment_id: i32,
    pub created_by_id: Option<i32>,
    pub assigned_team_id: Option<i32>,
    pub description: String,
    /// Defaults to `pending`.
    pub status: Option<WorkOrderStatus>,
    /// Defaults to `medium`.
    pub priority: Option<Priority>,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct WorkOrderUpdate {
    pub number: Option<String>,
    pub equipment_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub created_by_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub assigned_team_id: Option<Option<i32>>,
    pub description: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<Priority>,
}
