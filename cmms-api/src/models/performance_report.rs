use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::performance_reports;

choice_enum! {
    pub enum ReportType {
        Oee => ("oee", "OEE"),
        Availability => ("availability", "Availability"),
        Reliability => ("reliability", "Reliability"),
        Shutdown => ("shutdown", "Shutdown"),
        PartReplacement => ("part_replacement", "Part Replacement"),
    }
}

/// Stored report for a piece of equipment. `content` is produced elsewhere
/// and kept verbatim.
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
#[diesel(table_name = performance_reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct PerformanceReport {
    pub id: i32,
    pub report_type: ReportType,
    pub equipment_id: i32,
    #[ts(type = "string")]
    pub generated_at: NaiveDateTime,
    pub content: Option<String>,
}

impl PerformanceReport {
    pub fn display(&self, equipment_name: &str) -> String {
        format!(
            "{} Report for {} on {}",
            self.report_type,
            equipment_name,
            self.generated_at.format("%Y-%m-%d")
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = performance_reports)]
pub struct NewPerformanceReport {
    pub report_type: ReportType,
    pub equipment_id: i32,
    pub content: Option<String>,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PerformanceReportInput {
    pub report_type: ReportType,
    pub equipment_id: i32,
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PerformanceReportUpdate {
    pub report_type: Option<ReportType>,
    pub equipment_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub content: Option<Option<String>>,
}
