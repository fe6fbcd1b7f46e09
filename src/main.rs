pub use error::Error;
mod command;
mod conf;
mod db;
mod error;
mod geometry;
mod rest;
mod rpc;
mod seed;
mod service;
mod tariff;
mod zone;
use conf::Conf;
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[actix_web::main]
async fn main() -> Result<()> {
    init_logging();

    let conf = Conf::from_env()?;
    let db_path = conf.db_path()?;
    let mut conn = db::open_connection(&db_path)?;
    db::migration::run(&mut conn)?;

    let args: Vec<String> = env::args().collect();

    let Some(command) = args.get(1) else {
        return Err(Error::Cli("No actions passed".into()));
    };

    match command.as_str() {
        "server" => command::server::run(conf, db::pool(&db_path)?).await?,
        "db" => command::db::run(&args[2..], &mut conn)?,
        "seed" => command::seed::run(&db::pool(&db_path)?).await?,
        "import-zones" => {
            let Some(path) = args.get(2) else {
                return Err(Error::Cli("Usage: import-zones <path>".into()));
            };
            command::import_zones::run(Path::new(path), &db::pool(&db_path)?).await?;
        }
        "quote" => {
            command::quote::run(&args[2..], &db::pool(&db_path)?).await?;
        }
        first_arg => return Err(Error::Cli(format!("Unknown command: {first_arg}"))),
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cfg!(debug_assertions) {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .without_time()
            .init();
    }
}
