//! Helpers for unit and integration tests.
//!
//! Each helper hands out a brand new in-memory SQLite database with every
//! migration applied, so tests never share state.

use diesel::connection::SimpleConnection;
use diesel::sqlite::SqliteConnection;
use rocket::figment::{
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket, fairing::AdHoc};
use rocket_dyn_templates::Template;

use super::db::{DbConn, run_pending_migrations, set_foreign_keys};
use crate::admin_init_fairing::admin_init_fairing;

/// Configures SQLite with performance-optimized settings for testing.
///
/// Sets `synchronous = OFF`, which skips fsyncs. The rollback journal stays
/// on so transactions still roll back.
///
/// Faster but less durable - only use for testing.
fn set_sqlite_test_pragmas(conn: &mut diesel::SqliteConnection) -> diesel::QueryResult<()> {
    conn.batch_execute(
        r#"
        PRAGMA synchronous = OFF;
        "#,
    )
}

/// Creates a Rocket fairing that sets SQLite testing pragmas.
fn set_sqlite_test_pragmas_fairing() -> AdHoc {
    AdHoc::on_ignite("Set SQLite Test Pragmas", |rocket| async {
        if let Some(conn) = DbConn::get_one(&rocket).await {
            if let Err(e) = conn.run(set_sqlite_test_pragmas).await {
                warn!("Failed to set SQLite test pragmas: {}", e);
            }
        }
        rocket
    })
}

/// Creates and configures a Rocket instance for testing with an in-memory SQLite database.
///
/// The returned Rocket instance will have:
/// - A unique shared-cache in-memory SQLite database
/// - Database connection pool attached
/// - Foreign keys enabled
/// - Testing pragmas set
/// - All migrations run
/// - Default admin user created
/// - Templates loaded from this crate's `templates/` directory
/// - API and page routes mounted, JSON catchers registered
pub fn test_rocket() -> Rocket<Build> {
    use uuid::Uuid;

    // Generate a unique database name for this test instance
    let unique_db_name = format!("file:test_db_{}?mode=memory&cache=shared", Uuid::new_v4());

    // Configure the in-memory SQLite database
    let db_config: Map<_, Value> = map! {
        "url" => unique_db_name.into(),  // Unique shared in-memory DB per test
        "pool_size" => 5.into(),
        "timeout" => 5.into(),
    };

    let figment = rocket::Config::figment()
        .merge(("databases", map!["sqlite_db" => db_config]))
        .merge(("template_dir", concat!(env!("CARGO_MANIFEST_DIR"), "/templates")));

    let rocket = rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(super::db::set_foreign_keys_fairing())
        .attach(set_sqlite_test_pragmas_fairing())
        .attach(super::db::run_migrations_fairing())
        .attach(admin_init_fairing())
        .attach(Template::fairing());

    crate::register_catchers(crate::mount_routes(rocket))
}

/// Creates a synchronous in-memory SQLite database connection for unit tests.
///
/// This function returns a `diesel::SqliteConnection` connected to an in-memory SQLite database,
/// runs all embedded Diesel migrations, and enables foreign key support. This is ideal for
/// direct Diesel queries in synchronous test code.
///
/// Each call to this function returns a new, independent in-memory database.
///
/// # Panics
/// Panics if the database cannot be created or migrated; only call from tests.
pub fn setup_test_db() -> SqliteConnection {
    use diesel::Connection;

    let mut conn = SqliteConnection::establish(":memory:")
        .expect("Failed to create in-memory SQLite database");
    set_foreign_keys(&mut conn).expect("Failed to enable foreign keys");
    run_pending_migrations(&mut conn).expect("Failed to run pending migrations");
    conn
}
