use crate::db::migration;
use crate::{Error, Result};
use rusqlite::Connection;
use tracing::info;

pub fn run(args: &[String], conn: &mut Connection) -> Result<()> {
    let Some(first_arg) = args.first() else {
        return Err(Error::Cli("No DB actions passed".into()));
    };
    match first_arg.as_str() {
        "migrate" => {
            let version = migration::run(conn)?;
            info!(version, "Database is up to date");
        }
        _ => return Err(Error::Cli(format!("Unknown command: {first_arg}"))),
    }
    Ok(())
}
