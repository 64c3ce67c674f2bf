//! HTTP API, mounted under `/api`.
//!
//! Every entity is exposed at `/api/1/<Path>` with list, create, read,
//! update and delete routes; related records are reachable through
//! navigation routes such as `/api/1/Equipment/<id>/WorkOrders`.

use rocket::Route;

pub mod admin;
pub mod equipment;
pub mod error;
pub mod maintenance_schedule;
pub mod performance_report;
pub mod purchase_request;
pub mod spare_part;
pub mod spare_transaction;
pub mod status;
pub mod team;
pub mod user;
pub mod work_order;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(status::routes());
    routes.extend(admin::routes());
    routes.extend(user::routes());
    routes.extend(team::routes());
    routes.extend(equipment::routes());
    routes.extend(spare_part::routes());
    routes.extend(spare_transaction::routes());
    routes.extend(purchase_request::routes());
    routes.extend(maintenance_schedule::routes());
    routes.extend(work_order::routes());
    routes.extend(performance_report::routes());
    routes
}
