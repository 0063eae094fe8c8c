//! Session cookies read from a Netscape-format cookie jar (`cookies.txt`, as
//! exported by browsers and `curl -c`).
//!
//! Each cookie is one tab-separated line:
//! `domain  include_subdomains  path  secure  expiry  name  value`.

use crate::error::Result;
use serde::Serialize;
use std::path::Path;

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionCookie {
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub name: String,
    pub value: String,
}

impl SessionCookie {
    /// `name=value`, the form a `Cookie` header or cookie jar accepts.
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Parse jar text, keeping only cookies whose name contains `session`.
/// Comments, blank lines and lines with fewer than seven fields are skipped.
pub fn parse(text: &str) -> Vec<SessionCookie> {
    text.lines()
        .filter_map(parse_line)
        .filter(|c| c.name.contains("session"))
        .collect()
}

pub fn load(path: &Path) -> Result<Vec<SessionCookie>> {
    let text = std::fs::read_to_string(path)?;
    let cookies = parse(&text);
    tracing::debug!(path = %path.display(), count = cookies.len(), "loaded session cookies");
    Ok(cookies)
}

fn parse_line(line: &str) -> Option<SessionCookie> {
    let line = match line.strip_prefix(HTTP_ONLY_PREFIX) {
        Some(rest) => rest,
        None if line.starts_with('#') => return None,
        None => line,
    };
    if line.trim().is_empty() {
        return None;
    }
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return None;
    }
    Some(SessionCookie {
        domain: fields[0].to_string(),
        path: fields[2].to_string(),
        secure: fields[3].eq_ignore_ascii_case("TRUE"),
        name: fields[5].to_string(),
        value: fields[6].to_string(),
    })
}
