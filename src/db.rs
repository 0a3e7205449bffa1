use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Per-connection PRAGMA setup applied to every pooled connection
///
/// `busy_timeout` makes interleaved writers wait inside SQLite instead of
/// failing instantly with a lock error; the store itself never retries.
#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the connection pool for the given SQLite database URL
///
/// ### Arguments
///
/// * `database_url` - Path or URI of the SQLite database
/// * `busy_timeout` - How long a connection waits on a locked database
///
/// ### Errors
///
/// Returns the pool construction error if the database cannot be opened.
pub fn init_pool(database_url: &str, busy_timeout: Duration) -> Result<DbPool, r2d2::Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions { busy_timeout }))
        .build(manager)
}
