use std::fmt;

use diesel::{Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schema::spare_parts;

/// Reorder level applied when none is given.
pub const DEFAULT_REORDER_LEVEL: i32 = 5;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[diesel(table_name = spare_parts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[ts(export)]
pub struct SparePart {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: i32,
    pub location: String,
    pub reorder_level: i32,
}

impl fmt::Display for SparePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): ({}) - Stock: {}",
            self.name,
            self.code,
            self.description.as_deref().unwrap_or("None"),
            self.stock_quantity
        )
    }
}

#[derive(Insertable)]
#[diesel(table_name = spare_parts)]
pub struct NewSparePart {
    pub name: String,
    pub code: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub stock_quantity: i32,
    pub location: String,
    pub reorder_level: i32,
}

// For API inputs and validation. Quantities are checked by the store, so a
// negative value surfaces as a constraint violation rather than a parse error.
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SparePartInput {
    pub name: String,
    pub code: String,
    pub make: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    /// Defaults to 0.
    pub stock_quantity: Option<i32>,
    pub location: String,
    /// Defaults to 5.
    pub reorder_level: Option<i32>,
}

#[derive(Debug, Default, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct SparePartUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub make: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub model: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::double_option")]
    pub description: Option<Option<String>>,
    pub stock_quantity: Option<i32>,
    pub location: Option<String>,
    pub reorder_level: Option<i32>,
}
