use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::purchase_requests;

choice_enum! {
    /// Procurement progress. Any value may follow any other.
    pub enum PurchaseRequestStatus {
        Pending => ("pending", "Pending"),
        Approved => ("approved", "Approved"),
        Ordered => ("ordered", "Ordered"),
        Received => ("received", "Received"),
    }
}

impl Default for PurchaseRequestStatus {
    fn default() -> Self {
        PurchaseRequestStatus::Pending
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
#[diesel(belongs_to(crate::models::spare_part::SparePart))]
#[diesel(table_name = purchase_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct PurchaseRequest {
    pub id: i32,
    pub spare_part_id: i32,
    pub quantity: i32,
    pub status: PurchaseRequestStatus,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

impl PurchaseRequest {
    pub fn display(&self, spare_part_name: &str) -> String {
        format!("PR-{} for {} ({})", self.id, spare_part_name, self.quantity)
    }
}

#[derive(Insertable)]
#[diesel(table_name = purchase_requests)]
pub struct NewPurchaseRequest {
    pub spare_part_id: i32,
    pub quantity: i32,
    pub status: PurchaseRequestStatus,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PurchaseRequestInput {
    pub spare_part_id: i32,
    pub quantity: i32,
    /// Defaults to `pending`.
    pub status: Option<PurchaseRequestStatus>,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PurchaseRequestUpdate {
    pub spare_part_id: Option<i32>,
    pub quantity: Option<i32>,
    pub status: Option<PurchaseRequestStatus>,
}
