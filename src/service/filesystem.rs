use crate::Result;
use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

pub fn default_data_dir() -> Result<PathBuf> {
    #[allow(deprecated)]
    let data_dir = std::env::home_dir()
        .ok_or("Home directory does not exist")?
        .join(".local/share/zone-tariff");
    Ok(data_dir)
}

pub fn data_dir_file_path(data_dir: &Path, file_name: &str) -> Result<PathBuf> {
    if !data_dir.exists() {
        create_dir_all(data_dir)?;
    }
    Ok(data_dir.join(file_name))
}
