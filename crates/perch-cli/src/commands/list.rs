use anyhow::Result;
use std::path::PathBuf;

use super::open_store;

pub async fn run(config: Option<PathBuf>, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let records = store.load().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No saved preferences.");
        return Ok(());
    }

    for record in &records {
        println!("{}", record.model_path);
        println!(
            "  position: ({}, {})  scale: ({}, {})",
            record.position.x, record.position.y, record.scale.x, record.scale.y
        );
        if let Some(parameters) = record.parameters.as_ref().filter(|p| !p.is_empty()) {
            println!("  parameters: {}", parameters.len());
        }
        if let Some(display) = record.display {
            println!("  display: ({}, {})", display.screen_x, display.screen_y);
        }
    }
    Ok(())
}
