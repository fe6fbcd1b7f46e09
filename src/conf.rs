use crate::service::filesystem;
use crate::{Error, Result};
use std::env;
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "zone-tariff.db";

const ENV_DATA_DIR: &str = "ZONE_TARIFF_DATA_DIR";
const ENV_BIND_ADDR: &str = "ZONE_TARIFF_BIND_ADDR";
const ENV_PORT: &str = "ZONE_TARIFF_PORT";
const ENV_ADMIN_TOKEN: &str = "ZONE_TARIFF_ADMIN_TOKEN";

#[derive(Debug, Clone)]
pub struct Conf {
    pub data_dir: PathBuf,
    pub bind_addr: String,
    pub port: u16,
    /// Admin RPC methods are refused when this is not set
    pub admin_token: Option<String>,
}

impl Conf {
    pub fn from_env() -> Result<Conf> {
        Conf::from_vars(|name| env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Conf> {
        let data_dir = match var(ENV_DATA_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => filesystem::default_data_dir()?,
        };
        let port = match var(ENV_PORT) {
            Some(port) => port.parse().map_err(|_| {
                Error::InvalidInput(format!("{ENV_PORT} is not a valid port: {port}"))
            })?,
            None => 8000,
        };
        Ok(Conf {
            data_dir,
            bind_addr: var(ENV_BIND_ADDR).unwrap_or_else(|| "127.0.0.1".into()),
            port,
            admin_token: var(ENV_ADMIN_TOKEN).filter(|it| !it.is_empty()),
        })
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        filesystem::data_dir_file_path(&self.data_dir, DB_FILE_NAME)
    }

    pub fn is_admin(&self, token: &str) -> bool {
        match &self.admin_token {
            Some(admin_token) => !token.is_empty() && admin_token == token,
            None => false,
        }
    }

    #[cfg(test)]
    pub fn mock() -> Conf {
        Conf {
            data_dir: env::temp_dir(),
            bind_addr: "127.0.0.1".into(),
            port: 8000,
            admin_token: Some("admin".into()),
        }
    }
}
