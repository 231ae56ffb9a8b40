use anyhow::Result;
use perch_core::preference::resolve_with_strategy;
use std::path::PathBuf;

use super::open_store;

pub async fn run(config: Option<PathBuf>, identity: &str) -> Result<()> {
    let store = open_store(config)?;
    let records = store.load().await;

    match resolve_with_strategy(identity, &records) {
        Some((strategy, record)) => {
            println!("{} ({})", record.model_path, strategy.as_str());
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        None => println!("No saved preferences match '{}'", identity),
    }
    Ok(())
}
