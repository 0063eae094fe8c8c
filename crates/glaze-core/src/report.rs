use crate::error::Result;
use crate::probe::ProbeResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageIssues {
    pub page: String,
    pub issues: Vec<String>,
}

/// Outcome of one verification run, persisted as pretty JSON and replaced
/// on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: DateTime<Utc>,
    pub total_tested: usize,
    /// Targets that answered 200, with or without issues.
    pub working: Vec<String>,
    /// Targets that answered non-200, timed out, or never connected.
    pub failed: Vec<String>,
    /// Every target with at least one issue, in probe order.
    pub issues: Vec<PageIssues>,
    #[serde(default)]
    pub results: Vec<ProbeResult>,
}

impl VerificationReport {
    pub fn from_results(results: Vec<ProbeResult>) -> Self {
        let mut working = Vec::new();
        let mut failed = Vec::new();
        let mut issues = Vec::new();
        for r in &results {
            if r.outcome.is_working() {
                working.push(r.path.clone());
            } else {
                failed.push(r.path.clone());
            }
            if !r.issues.is_empty() {
                issues.push(PageIssues {
                    page: r.path.clone(),
                    issues: r.issues.clone(),
                });
            }
        }
        Self {
            timestamp: Utc::now(),
            total_tested: results.len(),
            working,
            failed,
            issues,
            results,
        }
    }

    /// True when every target answered 200 with no issue.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.issues.is_empty()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
