mod db;
pub mod equipment;
pub mod maintenance_schedule;
pub mod password;
pub mod performance_report;
pub mod purchase_request;
pub mod spare_part;
pub mod spare_transaction;
pub mod team;
pub mod testing;
pub mod user;
pub mod work_order;

pub use db::*;
