//! `mbatch check` – load a list and report what would be fetched.

use anyhow::Result;
use mbatch_core::source_list;
use std::path::Path;

pub fn run_check(list: &Path) -> Result<()> {
    let sources = source_list::load(list)?;
    println!(
        "{}: {} unique, {} duplicate(s)",
        list.display(),
        sources.unique.len(),
        sources.duplicate_count()
    );
    for dup in &sources.duplicates {
        println!("  duplicate: {dup}");
    }
    Ok(())
}
