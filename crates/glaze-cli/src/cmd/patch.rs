use crate::output::{join_or_dash, print_json, print_table};
use anyhow::Context;
use glaze_core::{
    config::Config,
    manifest::Manifest,
    patch::Patcher,
    paths,
    walker::{DocumentOutcome, RunSummary, Source, Walker},
};
use std::path::{Path, PathBuf};

/// `manifest`: `None` runs the whole tree, `Some(None)` the default manifest,
/// `Some(Some(path))` a specific manifest file.
pub fn run(root: &Path, manifest: Option<Option<PathBuf>>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let catalog = config.catalog().context("invalid feature list in config")?;
    let patcher = Patcher::new(&catalog).with_style_open_tag(config.templates.style_open_tag.clone());
    let class_rules = config.class_rules().context("invalid templates.normalize in config")?;
    let walker =
        Walker::new(&patcher, config.templates.extension.clone()).with_class_rules(class_rules);

    let source = match manifest {
        None => config.tree_source(root),
        Some(path) => {
            let path = match path {
                Some(p) => paths::resolve(root, &p),
                None => paths::manifest_path(root),
            };
            let manifest = Manifest::load(&path)
                .with_context(|| format!("failed to load manifest {}", path.display()))?;
            Source::Manifest {
                root: config.templates_dir(root),
                manifest,
            }
        }
    };

    let summary = walker.run(&source).context("patch run failed")?;

    if json {
        print_json(&summary)?;
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let rows: Vec<Vec<String>> = summary
        .records
        .iter()
        .filter(|r| !matches!(r.outcome, DocumentOutcome::AlreadyComplete))
        .map(|r| {
            let (status, detail) = match &r.outcome {
                DocumentOutcome::Updated { applied, rewritten } => (
                    "updated",
                    with_rewrites(join_or_dash(applied), rewritten),
                ),
                DocumentOutcome::AnchorNotFound {
                    applied,
                    missing,
                    rewritten,
                } => (
                    "anchor_not_found",
                    with_rewrites(
                        format!("applied: {}; no anchor: {}", join_or_dash(applied), join_or_dash(missing)),
                        rewritten,
                    ),
                ),
                DocumentOutcome::Error { detail } => ("error", detail.clone()),
                DocumentOutcome::AlreadyComplete => ("already_complete", String::new()),
            };
            vec![r.document.clone(), status.to_string(), detail]
        })
        .collect();

    if !rows.is_empty() {
        print_table(&["DOCUMENT", "OUTCOME", "DETAIL"], rows);
        println!();
    }
    println!(
        "{} documents: {} updated, {} already complete, {} anchor not found, {} errors",
        summary.total(),
        summary.updated,
        summary.already_complete,
        summary.anchor_not_found,
        summary.errors
    );
}

fn with_rewrites(detail: String, rewritten: &[&str]) -> String {
    if rewritten.is_empty() {
        detail
    } else {
        format!("{detail}; classes: {}", rewritten.join(", "))
    }
}
