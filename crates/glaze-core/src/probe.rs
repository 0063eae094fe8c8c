use crate::config::VerifyConfig;
use crate::scan;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Target description
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Page,
    Api,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One API route as written in `glaze.yaml`: either a bare path (query
/// string allowed) or a request with method and JSON body.
///
/// ```yaml
/// api:
///   - /api/notifications
///   - /api/search/students?q=test
///   - path: /api/fleet/summary
///     method: POST
///     body: { range: 30d }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiEntry {
    Path(String),
    Request {
        path: String,
        #[serde(default)]
        method: Method,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<serde_json::Value>,
    },
}

/// A marker of which at least one needle must appear in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredMarker {
    pub label: String,
    pub any_of: Vec<String>,
}

/// A marker that must not appear; `message` becomes the issue text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenMarker {
    pub needle: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expectations {
    pub required: Vec<RequiredMarker>,
    pub forbidden: Vec<ForbiddenMarker>,
    pub check_placeholders: bool,
    pub check_title: bool,
    /// Allowed count of `undefined` (any case). `None` disables the check.
    pub undefined_tolerance: Option<usize>,
    /// Allowed count of the literal `null`. `None` disables the check.
    pub null_tolerance: Option<usize>,
    pub min_content_bytes: usize,
    /// The body must be a non-empty JSON value.
    pub json: bool,
}

impl Expectations {
    /// Checks applied to every rendered page.
    pub fn page(cfg: &VerifyConfig) -> Self {
        Self {
            required: vec![
                RequiredMarker {
                    label: "Bootstrap CSS".to_string(),
                    any_of: vec!["bootstrap.min.css".to_string()],
                },
                RequiredMarker {
                    label: "jQuery/Bootstrap JS".to_string(),
                    any_of: vec!["jquery".to_string(), "bootstrap.bundle".to_string()],
                },
            ],
            forbidden: vec![ForbiddenMarker {
                needle: "console.error".to_string(),
                message: "Contains console.error statements".to_string(),
            }],
            check_placeholders: true,
            check_title: true,
            undefined_tolerance: Some(cfg.undefined_tolerance),
            null_tolerance: Some(cfg.null_tolerance),
            min_content_bytes: cfg.min_content_bytes,
            json: false,
        }
    }

    /// Checks applied to JSON endpoints: status plus a non-empty payload.
    pub fn api() -> Self {
        Self {
            required: Vec::new(),
            forbidden: Vec::new(),
            check_placeholders: false,
            check_title: false,
            undefined_tolerance: None,
            null_tolerance: None,
            min_content_bytes: 0,
            json: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeTarget {
    pub path: String,
    pub kind: TargetKind,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub expectations: Expectations,
}

impl ProbeTarget {
    pub fn page(path: impl Into<String>, cfg: &VerifyConfig) -> Self {
        let (path, query) = split_query(&path.into());
        Self {
            path,
            kind: TargetKind::Page,
            method: Method::Get,
            query,
            body: None,
            expectations: Expectations::page(cfg),
        }
    }

    pub fn api(entry: &ApiEntry) -> Self {
        let (raw, method, body) = match entry {
            ApiEntry::Path(p) => (p.as_str(), Method::Get, None),
            ApiEntry::Request { path, method, body } => (path.as_str(), *method, body.clone()),
        };
        let (path, query) = split_query(raw);
        Self {
            path,
            kind: TargetKind::Api,
            method,
            query,
            body,
            expectations: Expectations::api(),
        }
    }

    /// Path plus query string, as reported.
    pub fn display_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let qs: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, qs.join("&"))
    }
}

fn split_query(raw: &str) -> (String, Vec<(String, String)>) {
    let Some((path, qs)) = raw.split_once('?') else {
        return (raw.to_string(), Vec::new());
    };
    let query = qs
        .split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| match kv.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (kv.to_string(), String::new()),
        })
        .collect();
    (path.to_string(), query)
}

/// The static target list for a run: every configured page, then every
/// configured API route.
pub fn targets(cfg: &VerifyConfig) -> Vec<ProbeTarget> {
    cfg.pages
        .iter()
        .map(|p| ProbeTarget::page(p.as_str(), cfg))
        .chain(cfg.api.iter().map(ProbeTarget::api))
        .collect()
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// 200 with no violated expectation.
    Ok,
    /// 200 but at least one expectation violated.
    Issues,
    /// Non-200 status.
    Failed,
    Timeout,
    /// Transport failure before a status was received.
    Error,
}

impl ProbeOutcome {
    /// Counted under `working` in the report.
    pub fn is_working(self) -> bool {
        matches!(self, ProbeOutcome::Ok | ProbeOutcome::Issues)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeResult {
    pub path: String,
    pub kind: TargetKind,
    pub outcome: ProbeOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub content_length: usize,
    pub issues: Vec<String>,
}

impl ProbeResult {
    pub fn timeout(target: &ProbeTarget) -> Self {
        Self {
            path: target.display_path(),
            kind: target.kind,
            outcome: ProbeOutcome::Timeout,
            status: None,
            content_length: 0,
            issues: vec!["Timeout - slow loading".to_string()],
        }
    }

    pub fn error(target: &ProbeTarget, detail: impl std::fmt::Display) -> Self {
        Self {
            path: target.display_path(),
            kind: target.kind,
            outcome: ProbeOutcome::Error,
            status: None,
            content_length: 0,
            issues: vec![format!("Error: {detail}")],
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Judge one response against the target's expectations. Pure: the same
/// status and body always yield the same result.
pub fn classify(target: &ProbeTarget, status: u16, body: &str) -> ProbeResult {
    let exp = &target.expectations;
    let mut issues = Vec::new();

    if status != 200 {
        issues.push(format!("HTTP {status} error"));
    }

    if let Some(tolerance) = exp.undefined_tolerance {
        let n = scan::count_ci(body, "undefined");
        if n > tolerance {
            issues.push(format!("Contains {n} 'undefined' references"));
        }
    }
    if let Some(tolerance) = exp.null_tolerance {
        let n = body.matches("null").count();
        if n > tolerance {
            issues.push(format!("Contains {n} 'null' values"));
        }
    }
    if exp.check_title && has_empty_title(body) {
        issues.push("Empty page title".to_string());
    }
    if exp.check_placeholders && body.contains("{{") && body.contains("}}") {
        let n = body.matches("{{").count();
        issues.push(format!("Unprocessed template variables: {n}"));
    }
    if exp.min_content_bytes > 0
        && (scan::find_ci(body, "<body></body>").is_some() || body.len() < exp.min_content_bytes)
    {
        issues.push("Page appears empty or minimal content".to_string());
    }
    for marker in &exp.required {
        if !marker.any_of.iter().any(|n| scan::find_ci(body, n).is_some()) {
            issues.push(format!("Missing {}", marker.label));
        }
    }
    for marker in &exp.forbidden {
        if body.contains(&marker.needle) {
            issues.push(marker.message.clone());
        }
    }
    if exp.json {
        if let Some(issue) = json_issue(body) {
            issues.push(issue.to_string());
        }
    }

    let outcome = if status != 200 {
        ProbeOutcome::Failed
    } else if issues.is_empty() {
        ProbeOutcome::Ok
    } else {
        ProbeOutcome::Issues
    };

    ProbeResult {
        path: target.display_path(),
        kind: target.kind,
        outcome,
        status: Some(status),
        content_length: body.len(),
        issues,
    }
}

/// `<title>` present with nothing but whitespace inside.
fn has_empty_title(body: &str) -> bool {
    let Some(open) = scan::open_tag_end(body, "title") else {
        return false;
    };
    match scan::find_ci(&body[open..], "</title>") {
        Some(close) => body[open..open + close].trim().is_empty(),
        None => false,
    }
}

fn json_issue(body: &str) -> Option<&'static str> {
    if body.trim().is_empty() {
        return Some("Empty API response");
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Err(_) => Some("Response is not valid JSON"),
        Ok(v) if json_is_empty(&v) => Some("Empty API response"),
        Ok(_) => None,
    }
}

fn json_is_empty(v: &serde_json::Value) -> bool {
    use serde_json::Value;
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn page(path: &str) -> ProbeTarget {
        ProbeTarget::page(path, &VerifyConfig::default())
    }

    /// A well-formed page padded to `size` bytes.
    fn clean_page(size: usize) -> String {
        let head = "<!DOCTYPE html><html><head><title>Fleet</title>\
<link href=\"/static/bootstrap.min.css\" rel=\"stylesheet\"></head><body><main>";
        let tail = "</main><script src=\"/static/jquery-3.7.1.min.js\"></script></body></html>";
        let pad = size.saturating_sub(head.len() + tail.len());
        format!("{head}{}{tail}", "x".repeat(pad))
    }

    #[test]
    fn clean_page_is_ok() {
        let body = clean_page(1200);
        assert_eq!(body.len(), 1200);
        let r = classify(&page("/fleet"), 200, &body);
        assert_eq!(r.outcome, ProbeOutcome::Ok);
        assert!(r.issues.is_empty(), "{:?}", r.issues);
        assert_eq!(r.content_length, 1200);
    }

    #[test]
    fn server_error_is_failed() {
        let r = classify(&page("/fleet"), 500, &clean_page(1200));
        assert_eq!(r.outcome, ProbeOutcome::Failed);
        assert_eq!(r.issues, vec!["HTTP 500 error"]);
        assert!(!r.outcome.is_working());
    }

    #[test]
    fn single_placeholder_is_one_issue() {
        let body = clean_page(1200).replacen("<main>", "<main>{{x}}", 1);
        let r = classify(&page("/fleet"), 200, &body);
        assert_eq!(r.outcome, ProbeOutcome::Issues);
        assert_eq!(r.issues, vec!["Unprocessed template variables: 1"]);
        assert!(r.outcome.is_working());
    }

    #[test]
    fn missing_libraries_and_debug_output_are_reported() {
        let body = format!(
            "<html><head><title>x</title></head><body><script>console.error('x')</script>{}</body></html>",
            "y".repeat(600)
        );
        let r = classify(&page("/students"), 200, &body);
        assert_eq!(
            r.issues,
            vec![
                "Missing Bootstrap CSS",
                "Missing jQuery/Bootstrap JS",
                "Contains console.error statements",
            ]
        );
    }

    #[test]
    fn minimal_and_untitled_pages() {
        let r = classify(&page("/fleet"), 200, "<html><title> </title><body></body></html>");
        assert!(r.issues.contains(&"Empty page title".to_string()));
        assert!(r
            .issues
            .contains(&"Page appears empty or minimal content".to_string()));
    }

    #[test]
    fn undefined_and_null_tolerances() {
        let base = clean_page(1200);
        let body = base.replacen("<main>", "<main>Undefined", 1);
        let r = classify(&page("/fleet"), 200, &body);
        assert_eq!(r.issues, vec!["Contains 1 'undefined' references"]);

        let five = base.replacen("<main>", "<main>null null null null null", 1);
        assert!(classify(&page("/fleet"), 200, &five).issues.is_empty());
        let six = base.replacen("<main>", "<main>null null null null null null", 1);
        assert_eq!(
            classify(&page("/fleet"), 200, &six).issues,
            vec!["Contains 6 'null' values"]
        );
    }

    #[test]
    fn api_targets_need_a_json_payload() {
        let target = ProbeTarget::api(&ApiEntry::Path("/api/notifications".into()));
        assert_eq!(classify(&target, 200, "{\"unread\": 3}").outcome, ProbeOutcome::Ok);
        assert_eq!(classify(&target, 200, "[]").issues, vec!["Empty API response"]);
        assert_eq!(classify(&target, 200, "").issues, vec!["Empty API response"]);
        assert_eq!(
            classify(&target, 200, "<html>").issues,
            vec!["Response is not valid JSON"]
        );
    }

    #[test]
    fn query_strings_split_into_pairs() {
        let target = ProbeTarget::api(&ApiEntry::Path("/api/search/students?q=test".into()));
        assert_eq!(target.path, "/api/search/students");
        assert_eq!(target.query, vec![("q".to_string(), "test".to_string())]);
        assert_eq!(target.display_path(), "/api/search/students?q=test");
    }

    #[test]
    fn api_entries_parse_from_yaml() {
        let yaml = "- /api/notifications\n- path: /api/fleet/summary\n  method: POST\n  body:\n    range: 30d\n";
        let entries: Vec<ApiEntry> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entries[0], ApiEntry::Path("/api/notifications".into()));
        let t = ProbeTarget::api(&entries[1]);
        assert_eq!(t.method, Method::Post);
        assert_eq!(t.body, Some(serde_json::json!({"range": "30d"})));
    }

    #[test]
    fn default_targets_cover_pages_then_api() {
        let cfg = VerifyConfig::default();
        let all = targets(&cfg);
        assert_eq!(all.len(), cfg.pages.len() + cfg.api.len());
        assert_eq!(all[0].kind, TargetKind::Page);
        assert_eq!(all.last().unwrap().kind, TargetKind::Api);
    }
}
