use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

static DB_POOL: OnceCell<DatabaseConnection> = OnceCell::new();

#[inline(always)]
pub fn get_db_pool() -> &'static DatabaseConnection {
    DB_POOL.get().expect("get_db_pool() called before init_db()")
}

/// Opens the database URL and initializes the DB_POOL static.
pub async fn init_db(database_url: String) -> &'static DatabaseConnection {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let pool = Database::connect(opt)
        .await
        .expect("Database connection was not established.");
    set_db_pool(pool)
}

/// Installs an already-open connection as the process pool.
/// Later calls are no-ops so test binaries can share one pool.
pub fn set_db_pool(pool: DatabaseConnection) -> &'static DatabaseConnection {
    let _ = DB_POOL.set(pool);
    DB_POOL
        .get()
        .expect("DatabaseConnection in DB_POOL failed in set_db_pool()")
}
