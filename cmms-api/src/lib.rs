#[macro_use]
extern crate rocket;

use rocket::figment::value::{Map, Value};
use rocket::figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use rocket::fs::{FileServer, Options};
use rocket::request::Request;
use rocket::serde::json::{Json, json};
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

pub mod admin_init_fairing;
pub mod admin_registry;
pub mod api;
pub mod logged_json;
pub mod models;
pub mod orm;
pub mod pages;
pub mod schema;

pub use orm::DbConn;

#[cfg(test)]
pub mod generate_types;

#[catch(404)]
fn not_found(req: &Request) -> Json<serde_json::Value> {
    Json(json!({
        "error": "Not Found",
        "path": req.uri().path().to_string(),
        "status": 404
    }))
}

#[catch(422)]
fn unprocessable_entity(req: &Request) -> Json<serde_json::Value> {
    Json(json!({
        "error": "Unprocessable Entity",
        "path": req.uri().path().to_string(),
        "status": 422
    }))
}

#[catch(500)]
fn internal_server_error(req: &Request) -> Json<serde_json::Value> {
    Json(json!({
        "error": "Internal Server Error",
        "path": req.uri().path().to_string(),
        "status": 500
    }))
}

#[catch(default)]
fn default_catcher(status: rocket::http::Status, req: &Request) -> Json<serde_json::Value> {
    Json(json!({
        "error": status.reason().unwrap_or("Unknown Error"),
        "path": req.uri().path().to_string(),
        "status": status.code
    }))
}

/// Mounts the JSON API under `/api` and the public pages at `/`.
pub fn mount_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/api", api::routes()).mount("/", pages::routes())
}

pub fn register_catchers(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.register(
        "/",
        catchers![not_found, unprocessable_entity, internal_server_error, default_catcher],
    )
}

fn log_rocket_info(rocket: &Rocket<Build>) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }

    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    match figment.extract_inner::<Map<String, Value>>("databases.sqlite_db") {
        Ok(db_config) => match db_config.get("url") {
            Some(Value::String(_, url)) => info!("Database URL: {}", url),
            _ => warn!("Database URL not found in configuration"),
        },
        Err(e) => warn!("Failed to extract database configuration: {}", e),
    }
}

/// Builds the production server.
///
/// Configuration comes from `Rocket.toml`, `ROCKET_*` variables and
/// `DATABASE_URL`. Tests use `orm::testing::test_rocket` instead.
#[launch]
pub fn rocket() -> Rocket<Build> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
        error!("DATABASE_URL must be set");
        std::process::exit(1);
    });

    let figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global())
        .merge(("databases.sqlite_db.url", database_url));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(orm::set_foreign_keys_fairing())
        .attach(orm::run_migrations_fairing())
        .attach(admin_init_fairing::admin_init_fairing())
        .attach(Template::fairing());

    log_rocket_info(&rocket);

    let static_dir = std::env::var("CMMS_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    info!("Serving static files from {}", static_dir);

    register_catchers(mount_routes(rocket))
        .mount("/static", FileServer::new(static_dir, Options::Index | Options::Missing))
}
