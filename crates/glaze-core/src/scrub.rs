//! Removal of leftover `console.error(...)` debug statements.
//!
//! The live verifier flags any rendered page still containing
//! `console.error`; this pass clears them from the templates. Calls are
//! matched with a balanced-parenthesis scan that respects string literals, so
//! `console.error('x', fmt(a))` is removed whole.

use crate::error::Result;
use crate::io;
use crate::paths;
use crate::walker::list_templates;
use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;

const MARKER: &str = "console.error(";
const SILENT_CATCH_BODY: &str = "{ /* Error handled silently */ }";

static EMPTY_CATCH_RE: OnceLock<Regex> = OnceLock::new();

fn empty_catch_re() -> &'static Regex {
    EMPTY_CATCH_RE.get_or_init(|| Regex::new(r"catch\s*\(([^)]*)\)\s*\{\s*\}").unwrap())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrubOutcome {
    pub text: String,
    pub removed: usize,
    pub silenced_catches: usize,
}

/// Strip every complete `console.error(...)` call from `text`. A call whose
/// closing parenthesis cannot be found is left in place.
///
/// What replaces a call depends on the code before it, so the script still
/// parses afterwards: a statement of its own is deleted, an arrow body or an
/// unbraced branch becomes `{}`, and a call inside an expression becomes
/// `void 0`.
pub fn scrub(text: &str) -> ScrubOutcome {
    let mut out = String::with_capacity(text.len());
    let mut removed = 0;
    let mut copied = 0;
    let mut from = 0;

    while let Some(rel) = text[from..].find(MARKER) {
        let pos = from + rel;
        let args_start = pos + MARKER.len();
        let Some(close) = matching_paren(&text[args_start..]) else {
            from = args_start;
            continue;
        };
        let call_end = args_start + close + 1;
        let stmt_end = if text[call_end..].starts_with(';') {
            call_end + 1
        } else {
            call_end
        };

        let resume = copied;
        out.push_str(&text[copied..pos]);
        copied = match CallContext::of(&text[..pos]) {
            CallContext::Statement => drop_statement(text, &mut out, resume, pos, stmt_end),
            CallContext::ArrowBody => {
                out.push_str("{}");
                call_end
            }
            CallContext::Branch => {
                out.push_str("{}");
                stmt_end
            }
            CallContext::Expression => {
                out.push_str("void 0");
                call_end
            }
        };
        removed += 1;
        from = copied;
    }
    out.push_str(&text[copied..]);

    let silenced_catches = empty_catch_re().find_iter(&out).count();
    let text = if silenced_catches > 0 {
        empty_catch_re()
            .replace_all(&out, format!("catch ($1) {SILENT_CATCH_BODY}").as_str())
            .into_owned()
    } else {
        out
    };

    ScrubOutcome {
        text,
        removed,
        silenced_catches,
    }
}

/// Delete the statement at `pos..end`. When it is alone on its line the
/// line goes too. `out` ends with `text[copied..pos]`; returns the offset
/// copying resumes from.
fn drop_statement(
    text: &str,
    out: &mut String,
    copied: usize,
    pos: usize,
    mut end: usize,
) -> usize {
    let line_start = text[..pos].rfind('\n').map_or(0, |i| i + 1);
    let owns_line = text[line_start..pos].trim().is_empty();
    let trailing = &text[end..];
    let ws = trailing.len() - trailing.trim_start_matches([' ', '\t']).len();
    let ends_line = trailing[ws..].is_empty() || trailing[ws..].starts_with('\n');
    if owns_line && ends_line && copied <= line_start {
        out.truncate(out.len() - (pos - line_start));
        end += ws;
        if text[end..].starts_with('\n') {
            end += 1;
        }
    }
    end
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallContext {
    /// A statement of its own.
    Statement,
    /// The expression body of an arrow function.
    ArrowBody,
    /// The only statement of an unbraced `if`, `else` or loop.
    Branch,
    /// An operand inside a larger expression.
    Expression,
}

impl CallContext {
    fn of(before: &str) -> Self {
        let trimmed = before.trim_end();
        let crossed_line = before[trimmed.len()..].contains('\n');
        let Some(last) = trimmed.chars().next_back() else {
            return CallContext::Statement;
        };
        if trimmed.ends_with("=>") {
            return CallContext::ArrowBody;
        }
        if ends_with_word(trimmed, "else") || ends_with_word(trimmed, "do") {
            return CallContext::Branch;
        }
        if last == ')' {
            return if closes_control_head(trimmed) {
                CallContext::Branch
            } else {
                CallContext::Statement
            };
        }
        if matches!(last, '{' | '}' | ';' | '>') || trimmed.ends_with("*/") {
            return CallContext::Statement;
        }
        // Automatic semicolon insertion ends the previous line here.
        if crossed_line && (is_ident_char(last) || matches!(last, ']' | '\'' | '"' | '`')) {
            return CallContext::Statement;
        }
        CallContext::Expression
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn ends_with_word(s: &str, word: &str) -> bool {
    s.strip_suffix(word).is_some_and(|head| {
        head.chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c) && c != '.')
    })
}

/// True if `s` ends with the parenthesized head of an `if`, `while` or
/// `for`.
fn closes_control_head(s: &str) -> bool {
    let mut depth = 0usize;
    for (i, c) in s.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    let head = s[..i].trim_end();
                    return ["if", "while", "for"].iter().any(|w| ends_with_word(head, w));
                }
            }
            _ => {}
        }
    }
    false
}

/// Offset of the `)` closing an already-opened parenthesis at the start of
/// `s`, skipping string and template literals.
fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' | '`' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Corpus pass
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ScrubRecord {
    pub document: String,
    pub removed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrubError {
    pub document: String,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrubSummary {
    pub scanned: usize,
    pub cleaned: Vec<ScrubRecord>,
    pub errors: Vec<ScrubError>,
}

impl ScrubSummary {
    pub fn removed(&self) -> usize {
        self.cleaned.iter().map(|r| r.removed).sum()
    }
}

/// Scrub every template under `root`. Per-document failures are recorded
/// and the pass continues.
pub fn scrub_corpus(root: &Path, extension: &str) -> Result<ScrubSummary> {
    let listing = list_templates(root, extension)?;
    let mut summary = ScrubSummary::default();
    for (path, detail) in listing.unreadable {
        summary.errors.push(ScrubError {
            document: paths::document_id(root, &path),
            detail,
        });
    }
    for path in &listing.files {
        let id = paths::document_id(root, path);
        summary.scanned += 1;
        let result = io::read_document(path).and_then(|text| {
            let out = scrub(&text);
            if out.text != text {
                io::atomic_write(path, out.text.as_bytes())?;
            }
            Ok(out.removed)
        });
        match result {
            Ok(0) => {}
            Ok(removed) => {
                tracing::debug!(document = %id, removed, "scrubbed");
                summary.cleaned.push(ScrubRecord {
                    document: id,
                    removed,
                });
            }
            Err(e) => {
                tracing::warn!(document = %id, error = %e, "scrub failed");
                summary.errors.push(ScrubError {
                    document: id,
                    detail: e.to_string(),
                });
            }
        }
    }
    Ok(summary)
}
