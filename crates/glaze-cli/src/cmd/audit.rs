use crate::output::{join_or_dash, print_json, print_table};
use anyhow::Context;
use glaze_core::{
    audit::{AuditReport, Auditor, DocumentAudit},
    config::Config,
    detect::Detector,
};
use std::path::Path;

pub fn run(root: &Path, strict: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let catalog = config.catalog().context("invalid feature list in config")?;
    let auditor = Auditor::new(Detector::new(&catalog), config.audit);
    let report = auditor
        .audit(&config.templates_dir(root), &config.templates.extension)
        .context("audit failed")?;

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }

    if strict && report.fully_converged.len() != report.total() {
        anyhow::bail!(
            "{} of {} templates are not fully converged",
            report.total() - report.fully_converged.len(),
            report.total()
        );
    }
    Ok(())
}

fn print_report(report: &AuditReport) {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut push = |bucket: &str, docs: &[DocumentAudit]| {
        for d in docs {
            rows.push(vec![
                d.document.clone(),
                bucket.to_string(),
                format!("{}/{}", d.present.len(), report.catalog_size),
                join_or_dash(&d.missing),
            ]);
        }
    };
    push("partial", &report.partially_converged);
    push("none", &report.not_converged);

    if !rows.is_empty() {
        print_table(&["DOCUMENT", "CONVERGENCE", "FEATURES", "MISSING"], rows);
        println!();
    }
    for e in &report.errors {
        println!("error: {}: {}", e.document, e.detail);
    }
    println!(
        "Fully converged ({}+ of {} features): {}",
        report.full_threshold,
        report.catalog_size,
        report.fully_converged.len()
    );
    println!("Partially converged: {}", report.partially_converged.len());
    println!("Not converged: {}", report.not_converged.len());
    if !report.errors.is_empty() {
        println!("Unreadable: {}", report.errors.len());
    }
}
