use crate::audit::CoveragePolicy;
use crate::catalog::{self, Catalog};
use crate::error::{GlazeError, Result};
use crate::fragments::DEFAULT_STYLE_OPEN_TAG;
use crate::normalize::{self, ClassRule};
use crate::paths;
use crate::probe::ApiEntry;
use crate::walker::Source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// TemplatesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    #[serde(default = "default_templates_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Opening tag of a style block created when a document has none.
    #[serde(default = "default_style_open_tag")]
    pub style_open_tag: String,
    /// Documents processed first, in this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub priority: Vec<String>,
    /// Documents never opened by `patch`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    /// Class rules applied on whole-tree runs.
    #[serde(default = "default_normalize")]
    pub normalize: Vec<String>,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from(paths::DEFAULT_TEMPLATES_DIR)
}

fn default_extension() -> String {
    paths::DEFAULT_TEMPLATE_EXTENSION.to_string()
}

fn default_style_open_tag() -> String {
    DEFAULT_STYLE_OPEN_TAG.to_string()
}

fn default_normalize() -> Vec<String> {
    normalize::rules().iter().map(|r| r.name.to_string()).collect()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
            extension: default_extension(),
            style_open_tag: default_style_open_tag(),
            priority: Vec::new(),
            exclude: Vec::new(),
            normalize: default_normalize(),
        }
    }
}

// ---------------------------------------------------------------------------
// VerifyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_cookie_file")]
    pub cookie_file: PathBuf,
    #[serde(default = "default_page_timeout")]
    pub page_timeout_seconds: u64,
    #[serde(default = "default_api_timeout")]
    pub api_timeout_seconds: u64,
    /// Pause between consecutive requests.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,
    #[serde(default = "default_min_content_bytes")]
    pub min_content_bytes: usize,
    #[serde(default)]
    pub undefined_tolerance: usize,
    #[serde(default = "default_null_tolerance")]
    pub null_tolerance: usize,
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,
    #[serde(default = "default_api")]
    pub api: Vec<ApiEntry>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_cookie_file() -> PathBuf {
    PathBuf::from(paths::DEFAULT_COOKIE_FILE)
}

fn default_page_timeout() -> u64 {
    10
}

fn default_api_timeout() -> u64 {
    5
}

fn default_throttle_ms() -> u64 {
    500
}

fn default_report_file() -> PathBuf {
    PathBuf::from(paths::DEFAULT_REPORT_FILE)
}

fn default_min_content_bytes() -> usize {
    500
}

fn default_null_tolerance() -> usize {
    5
}

const DEFAULT_PAGES: &[&str] = &[
    // Dashboards
    "/manager-dashboard",
    "/driver-dashboard",
    "/ecse-dashboard",
    "/emergency-dashboard",
    "/parent-dashboard",
    "/analytics-dashboard",
    "/budget-dashboard",
    "/progress-dashboard",
    // Fleet and maintenance
    "/fleet",
    "/company-fleet",
    "/fleet-vehicles",
    "/vehicle-maintenance",
    "/maintenance-records",
    "/service-records",
    "/maintenance-wizard",
    "/maintenance-alerts",
    // Routes
    "/assign-routes",
    "/route-assignment-wizard",
    "/gps-tracking",
    "/parent-bus-tracking",
    // Students
    "/students",
    "/students-lazy",
    "/add-student-wizard",
    "/import-ecse",
    "/view-ecse-student",
    // Reports
    "/monthly-mileage-reports",
    "/driver-reports",
    "/manager-reports",
    "/view-ecse-reports",
    "/driver-scorecards",
    "/report-builder",
    "/budget-report",
    // Users
    "/approve-users",
    "/manage-users",
    "/change-password",
    "/driver-profile",
    "/notification-preferences",
    "/parent-notification-settings",
    // Data
    "/import-mileage",
    "/import-data-wizard",
    "/scheduled-exports",
    // Fuel
    "/fuel-records",
    "/add-fuel-record",
    "/fuel-analytics",
    // Help
    "/help-center",
    "/getting-started",
    "/quick-reference",
    "/user-manual",
    "/video-tutorials",
    "/troubleshooting",
    // Messaging and monitoring
    "/messaging",
    "/db-monitor",
    "/db-pool-monitor",
    // Buses
    "/add-bus-wizard",
];

const DEFAULT_API: &[&str] = &[
    "/api/dashboard/analytics",
    "/api/dashboard/fleet-status",
    "/api/dashboard/maintenance-alerts",
    "/api/notifications",
    "/api/search/students?q=test",
    "/api/fleet/summary",
];

fn default_pages() -> Vec<String> {
    DEFAULT_PAGES.iter().map(|p| p.to_string()).collect()
}

fn default_api() -> Vec<ApiEntry> {
    DEFAULT_API
        .iter()
        .map(|p| ApiEntry::Path(p.to_string()))
        .collect()
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            cookie_file: default_cookie_file(),
            page_timeout_seconds: default_page_timeout(),
            api_timeout_seconds: default_api_timeout(),
            throttle_ms: default_throttle_ms(),
            report_file: default_report_file(),
            min_content_bytes: default_min_content_bytes(),
            undefined_tolerance: 0,
            null_tolerance: default_null_tolerance(),
            pages: default_pages(),
            api: default_api(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Active feature catalog. Applied in canonical order whatever the order
    /// listed here.
    #[serde(default = "default_features")]
    pub features: Vec<String>,
    #[serde(default)]
    pub audit: CoveragePolicy,
    #[serde(default)]
    pub verify: VerifyConfig,
}

fn default_features() -> Vec<String> {
    Catalog::glass()
        .features()
        .iter()
        .map(|f| f.name.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates: TemplatesConfig::default(),
            features: default_features(),
            audit: CoveragePolicy::default(),
            verify: VerifyConfig::default(),
        }
    }
}

impl Config {
    /// Load `glaze.yaml` from `root`, or the defaults when there is none.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn catalog(&self) -> Result<Catalog> {
        if self.features.is_empty() {
            return Err(GlazeError::InvalidConfig("features list is empty".to_string()));
        }
        Catalog::select(&self.features)
    }

    pub fn class_rules(&self) -> Result<Vec<&'static ClassRule>> {
        normalize::select(&self.templates.normalize)
    }

    pub fn templates_dir(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.templates.dir)
    }

    pub fn cookie_file(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.verify.cookie_file)
    }

    pub fn report_file(&self, root: &Path) -> PathBuf {
        paths::resolve(root, &self.verify.report_file)
    }

    /// Whole-tree run over the template directory with the configured
    /// priority and exclusions.
    pub fn tree_source(&self, root: &Path) -> Source {
        Source::Tree {
            root: self.templates_dir(root),
            priority: self.templates.priority.clone(),
            exclude: self.templates.exclude.iter().cloned().collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let error = |message: String| ConfigWarning {
            level: WarnLevel::Error,
            message,
        };
        let warning = |message: String| ConfigWarning {
            level: WarnLevel::Warning,
            message,
        };

        // 1. Catalog
        if self.features.is_empty() {
            warnings.push(error("features is empty: nothing to converge".to_string()));
        }
        let mut seen = BTreeSet::new();
        for name in &self.features {
            if catalog::lookup(name).is_err() {
                warnings.push(error(format!("unknown feature '{name}' in features")));
            } else if !seen.insert(name.as_str()) {
                warnings.push(warning(format!("feature '{name}' is listed twice")));
            }
        }

        // 2. Templates
        if self.templates.extension.trim_start_matches('.').is_empty() {
            warnings.push(error("templates.extension is empty".to_string()));
        }
        if !self.templates.style_open_tag.trim_start().starts_with("<style") {
            warnings.push(error(format!(
                "templates.style_open_tag '{}' does not open a <style> element",
                self.templates.style_open_tag
            )));
        }
        for name in &self.templates.normalize {
            if normalize::select(&[name]).is_err() {
                warnings.push(error(format!(
                    "unknown class rule '{name}' in templates.normalize"
                )));
            }
        }
        for doc in &self.templates.priority {
            if self.templates.exclude.contains(doc) {
                warnings.push(warning(format!(
                    "'{doc}' is both prioritized and excluded; it will be skipped"
                )));
            }
        }

        // 3. Audit thresholds
        let ratio = self.audit.full_coverage_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            warnings.push(error(format!(
                "audit.full_coverage_ratio {ratio} must be in (0, 1]"
            )));
        } else {
            let n = seen.len();
            let full = self.audit.full_threshold(n);
            if n > 0 && self.audit.partial_min_features > full {
                warnings.push(warning(format!(
                    "audit.partial_min_features ({}) exceeds the full threshold ({full} of {n}); \
                     no document can be partially converged",
                    self.audit.partial_min_features
                )));
            }
        }

        // 4. Verification
        let base = self.verify.base_url.trim();
        if base.is_empty() {
            warnings.push(error("verify.base_url is empty".to_string()));
        } else if !(base.starts_with("http://") || base.starts_with("https://")) {
            warnings.push(error(format!(
                "verify.base_url '{base}' must start with http:// or https://"
            )));
        }
        if self.verify.pages.is_empty() {
            warnings.push(warning("verify.pages is empty".to_string()));
        }
        if self.verify.page_timeout_seconds == 0 || self.verify.api_timeout_seconds == 0 {
            warnings.push(error("verify timeouts must be at least 1 second".to_string()));
        }
        if self.verify.throttle_ms == 0 {
            warnings.push(warning(
                "verify.throttle_ms is 0: requests are sent back to back".to_string(),
            ));
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
