use crate::output::{print_json, print_table};
use anyhow::Context;
use glaze_core::{
    config::Config,
    cookies,
    probe::{self, TargetKind},
    report::VerificationReport,
    verifier::Verifier,
};
use std::path::Path;

pub struct Options {
    pub pages_only: bool,
    pub api_only: bool,
    pub base_url: Option<String>,
    pub no_report: bool,
}

pub fn run(root: &Path, opts: Options, json: bool) -> anyhow::Result<()> {
    let mut config = Config::load(root).context("failed to load config")?;
    if let Some(url) = opts.base_url {
        config.verify.base_url = url;
    }

    let cookie_path = config.cookie_file(root);
    let session = match cookies::load(&cookie_path) {
        Ok(c) => {
            if c.is_empty() {
                tracing::warn!(path = %cookie_path.display(), "no session cookie found; probing unauthenticated");
            }
            c
        }
        Err(e) => {
            tracing::warn!(path = %cookie_path.display(), error = %e, "cookie file unreadable; probing unauthenticated");
            Vec::new()
        }
    };

    let targets: Vec<_> = probe::targets(&config.verify)
        .into_iter()
        .filter(|t| match t.kind {
            TargetKind::Page => !opts.api_only,
            TargetKind::Api => !opts.pages_only,
        })
        .collect();

    let verifier = Verifier::new(&config.verify, &session).context("failed to build http client")?;
    let report = verifier.run(&targets);

    if !opts.no_report {
        let path = config.report_file(root);
        report
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "report written");
    }

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &VerificationReport) {
    let rows: Vec<Vec<String>> = report
        .results
        .iter()
        .map(|r| {
            vec![
                r.path.clone(),
                r.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                r.content_length.to_string(),
                if r.issues.is_empty() {
                    "OK".to_string()
                } else {
                    r.issues.join("; ")
                },
            ]
        })
        .collect();
    print_table(&["PATH", "STATUS", "BYTES", "RESULT"], rows);

    println!();
    println!("Total tested: {}", report.total_tested);
    println!("Working: {}", report.working.len());
    println!("Failed: {}", report.failed.len());
    println!("With issues: {}", report.issues.len());
}
