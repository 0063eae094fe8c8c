use crate::catalog::FeatureSet;
use crate::detect::Detector;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::walker::list_templates;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// CoveragePolicy
// ---------------------------------------------------------------------------

/// Thresholds that bucket a document by how much of the catalog it carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoveragePolicy {
    /// Fraction of the catalog a document needs to count as fully converged.
    #[serde(default = "default_full_coverage_ratio")]
    pub full_coverage_ratio: f64,
    /// Absolute feature count below which a document is not converged.
    #[serde(default = "default_partial_min_features")]
    pub partial_min_features: usize,
}

fn default_full_coverage_ratio() -> f64 {
    0.83
}

fn default_partial_min_features() -> usize {
    2
}

impl Default for CoveragePolicy {
    fn default() -> Self {
        Self {
            full_coverage_ratio: default_full_coverage_ratio(),
            partial_min_features: default_partial_min_features(),
        }
    }
}

impl CoveragePolicy {
    /// Features needed for "fully converged" out of `catalog_len`.
    /// 0.83 of 6 is 5; 0.83 of 8 is 7.
    pub fn full_threshold(&self, catalog_len: usize) -> usize {
        // Tolerate float noise so a ratio of exactly k/n yields k.
        let raw = self.full_coverage_ratio * catalog_len as f64 - 1e-9;
        (raw.ceil().max(0.0) as usize).min(catalog_len)
    }

    pub fn classify(&self, present: usize, catalog_len: usize) -> Convergence {
        if present >= self.full_threshold(catalog_len) {
            Convergence::Full
        } else if present >= self.partial_min_features {
            Convergence::Partial
        } else {
            Convergence::None
        }
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Convergence {
    Full,
    Partial,
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAudit {
    pub document: String,
    pub convergence: Convergence,
    pub present: FeatureSet,
    /// Catalog features absent from the document, in canonical order.
    pub missing: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditError {
    pub document: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    pub catalog_size: usize,
    pub full_threshold: usize,
    pub fully_converged: Vec<DocumentAudit>,
    pub partially_converged: Vec<DocumentAudit>,
    pub not_converged: Vec<DocumentAudit>,
    pub errors: Vec<AuditError>,
}

impl AuditReport {
    pub fn total(&self) -> usize {
        self.fully_converged.len()
            + self.partially_converged.len()
            + self.not_converged.len()
            + self.errors.len()
    }

    fn push(&mut self, doc: DocumentAudit) {
        match doc.convergence {
            Convergence::Full => self.fully_converged.push(doc),
            Convergence::Partial => self.partially_converged.push(doc),
            Convergence::None => self.not_converged.push(doc),
        }
    }

    /// Every audited document, whatever its bucket.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentAudit> {
        self.fully_converged
            .iter()
            .chain(&self.partially_converged)
            .chain(&self.not_converged)
    }
}

// ---------------------------------------------------------------------------
// Auditor
// ---------------------------------------------------------------------------

/// Re-runs detection over a corpus and buckets each document. Read-only.
pub struct Auditor<'a> {
    detector: Detector<'a>,
    policy: CoveragePolicy,
}

impl<'a> Auditor<'a> {
    pub fn new(detector: Detector<'a>, policy: CoveragePolicy) -> Self {
        Self { detector, policy }
    }

    pub fn audit_text(&self, document: impl Into<String>, text: &str) -> DocumentAudit {
        let present = self.detector.detect(text);
        let missing = self.detector.missing(text);
        let convergence = self
            .policy
            .classify(present.len(), self.detector.catalog().len());
        DocumentAudit {
            document: document.into(),
            convergence,
            present,
            missing,
        }
    }

    pub fn audit(&self, root: &Path, extension: &str) -> Result<AuditReport> {
        let listing = list_templates(root, extension)?;
        let catalog_size = self.detector.catalog().len();
        let mut report = AuditReport {
            catalog_size,
            full_threshold: self.policy.full_threshold(catalog_size),
            ..AuditReport::default()
        };
        for (path, detail) in listing.unreadable {
            report.errors.push(AuditError {
                document: paths::document_id(root, &path),
                detail,
            });
        }
        for path in &listing.files {
            let id = paths::document_id(root, path);
            match io::read_document(path) {
                Ok(text) => report.push(self.audit_text(id, &text)),
                Err(e) => {
                    tracing::warn!(document = %id, error = %e, "unreadable during audit");
                    report.errors.push(AuditError {
                        document: id,
                        detail: e.to_string(),
                    });
                }
            }
        }
        tracing::info!(
            full = report.fully_converged.len(),
            partial = report.partially_converged.len(),
            none = report.not_converged.len(),
            errors = report.errors.len(),
            "audit complete"
        );
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
