use crate::output::print_json;
use anyhow::Context;
use glaze_core::{audit::Auditor, config::Config, detect::Detector, io, paths};
use std::path::Path;

pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let catalog = config.catalog().context("invalid feature list in config")?;
    let text = io::read_document(file).with_context(|| format!("failed to read {}", file.display()))?;

    let templates = config.templates_dir(root);
    let id = if file.starts_with(&templates) {
        paths::document_id(&templates, file)
    } else {
        file.display().to_string()
    };
    let audit = Auditor::new(Detector::new(&catalog), config.audit).audit_text(id, &text);

    if json {
        print_json(&audit)?;
        return Ok(());
    }

    println!("{}", audit.document);
    for feature in catalog.features() {
        let mark = if audit.present.contains(feature.name) { "x" } else { " " };
        println!("  [{mark}] {:<16} {}", feature.name, feature.description);
    }
    println!(
        "\n{} of {} features, convergence: {:?}",
        audit.present.len(),
        catalog.len(),
        audit.convergence
    );
    Ok(())
}
