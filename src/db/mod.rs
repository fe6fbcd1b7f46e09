use crate::Result;
use deadpool_sqlite::{Config, Pool, Runtime};
use rusqlite::Connection;
use std::path::Path;
use tracing::info;

pub mod migration;
pub mod zone;

pub fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
    Ok(conn)
}

pub fn pool(path: &Path) -> Result<Pool> {
    info!(path = %path.display(), "Opening database pool");
    Ok(Config::new(path).create_pool(Runtime::Tokio1)?)
}
