use std::rc::Rc;

use anyhow::Result;
use serde::Serialize;

use tally_core::{counter::SystemClock, AppConfig, StatsBoard};

#[derive(Debug, Serialize)]
struct StatListing {
    label: String,
    value: u64,
    text: String,
}

pub fn run(config: &AppConfig, json: bool) -> Result<()> {
    let board = StatsBoard::from_config(config, Rc::new(SystemClock::new()))?;

    let listings: Vec<StatListing> = board
        .cards()
        .iter()
        .enumerate()
        .map(|(idx, card)| StatListing {
            label: card.label.clone(),
            value: card.counter.spec().end_value,
            text: board.final_text(idx).unwrap_or_default(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No stats configured.");
        println!("\nAdd [[stats]] entries to:");
        println!("  {}", AppConfig::config_path().display());
        return Ok(());
    }

    println!("{} ({}):\n", config.section.title, listings.len());
    for listing in &listings {
        println!("  {:<16} {}", listing.label, listing.text);
    }

    Ok(())
}
