use chrono::NaiveDateTime;
use diesel::{Associations, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::choices::choice_enum;
use crate::schema::spare_transactions;

choice_enum! {
    /// Direction of an inventory movement.
    pub enum TransactionType {
        Issue => ("issue", "Issue"),
        Receive => ("receive", "Receive"),
        Transfer => ("transfer", "Transfer"),
    }
}

/// Ledger entry for a spare part movement. Write-once: the store rejects
/// updates to everything but the user references, which are nulled when the
/// referenced user is deleted.
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
#[diesel(table_name = spare_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct SpareTransaction {
    pub id: i32,
    pub spare_part_id: i32,
    pub quantity: i32,
    pub transaction_type: TransactionType,
    pub requested_by_id: Option<i32>,
    pub approved_by_id: Option<i32>,
    #[ts(type = "string")]
    pub timestamp: NaiveDateTime,
}

impl SpareTransaction {
    /// Display string; needs the name of the spare part it moves.
    pub fn display(&self, spare_part_name: &str) -> String {
        format!(
            "{} - {} - Qty: {} on {}",
            self.transaction_type,
            spare_part_name,
            self.quantity,
            self.timestamp.format("%Y-%m-%d %H:%M")
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = spare_transactions)]
pub struct NewSpareTransaction {
    pub spare_part_id: i32,
    pub quantity: i32,
    pub transaction_type: TransactionType,
    pub requested_by_id: Option<i32>,
    pub approved_by_id: Option<i32>,
}

// For API inputs and validation
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SpareTransactionInput {
    pub spare_part_id: i32,
    pub quantity: i32,
    pub transaction_type: TransactionType,
    pub requested_by_id: Option<i32>,
    pub approved_by_id: Option<i32>,
}
