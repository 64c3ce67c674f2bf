pub mod choices;
pub mod equipment;
pub mod maintenance_schedule;
pub mod performance_report;
pub mod purchase_request;
pub mod spare_part;
pub mod spare_transaction;
pub mod team;
pub mod user;
pub mod work_order;

// Re-export models for easier access
pub use choices::*;
pub use equipment::*;
pub use maintenance_schedule::*;
pub use performance_report::*;
pub use purchase_request::*;
pub use spare_part::*;
pub use spare_transaction::*;
pub use team::*;
pub use user::*;
pub use work_order::*;

/// Deserializes a present-but-possibly-null field as `Some(None)`, so update
/// payloads can tell "leave unchanged" (absent) from "clear" (`null`).
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}
