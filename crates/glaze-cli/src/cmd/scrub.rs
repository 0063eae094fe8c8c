use crate::output::{print_json, print_table};
use anyhow::Context;
use glaze_core::{config::Config, scrub::scrub_corpus};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let summary = scrub_corpus(&config.templates_dir(root), &config.templates.extension)
        .context("scrub failed")?;

    if json {
        print_json(&summary)?;
        return Ok(());
    }

    if !summary.cleaned.is_empty() {
        let rows = summary
            .cleaned
            .iter()
            .map(|r| vec![r.document.clone(), r.removed.to_string()])
            .collect();
        print_table(&["DOCUMENT", "REMOVED"], rows);
        println!();
    }
    for e in &summary.errors {
        println!("error: {}: {}", e.document, e.detail);
    }
    println!(
        "Scanned {} templates: removed {} console.error calls from {}, {} errors",
        summary.scanned,
        summary.removed(),
        summary.cleaned.len(),
        summary.errors.len()
    );
    Ok(())
}
