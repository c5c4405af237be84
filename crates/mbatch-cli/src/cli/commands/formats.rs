//! `mbatch formats` – list formats for one source and show the selection.

use anyhow::{Context, Result};
use mbatch_core::config::MbatchConfig;
use mbatch_core::format::{parse_listing, select_format};
use mbatch_core::tool::FetchTool;
use mbatch_core::types::SourceId;

pub async fn run_formats(
    cfg: &MbatchConfig,
    source: &str,
    max_height: Option<u32>,
) -> Result<()> {
    let source = SourceId::from(source);
    let listing = cfg
        .fetch_tool()
        .list_formats(&source)
        .await
        .with_context(|| format!("list formats for {source}"))?;
    let candidates = parse_listing(&listing);
    if candidates.is_empty() {
        println!("No video formats listed for {source}.");
        return Ok(());
    }

    println!("{:<12} {:>6}", "FORMAT", "HEIGHT");
    for c in &candidates {
        println!("{:<12} {:>6}", c.format_id, c.height);
    }

    match max_height.or(cfg.max_height).filter(|h| *h > 0) {
        Some(ceiling) => {
            if let Some(picked) = select_format(&candidates, ceiling) {
                let note = if picked.height > ceiling {
                    " (nothing at or below ceiling)"
                } else {
                    ""
                };
                println!(
                    "selected: {} ({}p, ceiling {}p){}",
                    picked.format_id, picked.height, ceiling, note
                );
            }
        }
        None => println!("selected: tool default (no ceiling)"),
    }
    Ok(())
}
