use anyhow::Result;
use std::path::PathBuf;

use super::config_service;

pub fn run(config: Option<PathBuf>) -> Result<()> {
    let service = config_service(config)?;
    println!("{}", service.path().display());
    Ok(())
}
