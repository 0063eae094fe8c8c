//! Targeted class-name substitutions applied during a full corpus run.
//!
//! Each rule renames tokens inside static `class` attributes. Lists carrying
//! template actions are left alone, since rewriting them would drop the
//! action. Once a rule has fired its source tokens are gone, so a second
//! pass finds nothing to do.

use crate::error::{GlazeError, Result};
use crate::scan;

pub struct ClassRule {
    pub name: &'static str,
    pub description: &'static str,
    /// Elements the rule applies to; empty means any element.
    pub tags: &'static [&'static str],
    pub from: &'static [&'static str],
    pub to: &'static str,
    /// Fire only when the class list is exactly one `from` token.
    pub exact: bool,
}

impl ClassRule {
    fn applies_to(&self, tag: &str) -> bool {
        self.tags.is_empty() || self.tags.contains(&tag)
    }

    /// The rewritten class list, or `None` when the rule does not fire.
    fn rewrite(&self, tokens: &[&str]) -> Option<Vec<String>> {
        if self.exact {
            return match tokens {
                [only] if self.from.contains(only) => Some(vec![self.to.to_string()]),
                _ => None,
            };
        }
        if !tokens.iter().any(|t| self.from.contains(t)) {
            return None;
        }
        let mut out: Vec<String> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let next = if self.from.contains(token) { self.to } else { *token };
            if !out.iter().any(|t| t == next) {
                out.push(next.to_string());
            }
        }
        Some(out)
    }
}

static RULES: [ClassRule; 3] = [
    ClassRule {
        name: "glass_cards",
        description: "plain card containers become glass cards",
        tags: &["div"],
        from: &["card"],
        to: "glass-card",
        exact: true,
    },
    ClassRule {
        name: "primary_buttons",
        description: "outline and secondary buttons become primary buttons",
        tags: &[],
        from: &["btn-outline-primary", "btn-secondary"],
        to: "btn-primary",
        exact: false,
    },
    ClassRule {
        name: "hero_sections",
        description: "hero and jumbotron blocks become hero sections",
        tags: &["section", "div"],
        from: &["hero", "jumbotron"],
        to: "hero-section",
        exact: false,
    },
];

/// Every known rule, in application order.
pub fn rules() -> &'static [ClassRule] {
    &RULES
}

/// The named rules in application order. Unknown names are an error.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static ClassRule>> {
    for name in names {
        let name = name.as_ref();
        if !RULES.iter().any(|r| r.name == name) {
            return Err(GlazeError::UnknownClassRule(name.to_string()));
        }
    }
    Ok(RULES
        .iter()
        .filter(|r| names.iter().any(|n| n.as_ref() == r.name))
        .collect())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOutcome {
    pub text: String,
    /// Rules that fired at least once, in rule order.
    pub rewritten: Vec<&'static str>,
}

/// Apply `rules` to every static class attribute in `text`. Bytes outside
/// the rewritten attribute values are untouched.
pub fn normalize(text: &str, rules: &[&'static ClassRule]) -> NormalizeOutcome {
    let mut out = String::with_capacity(text.len());
    let mut fired = vec![false; rules.len()];
    let mut copied = 0;

    for attr in scan::class_attributes(text) {
        let value = &text[attr.start..attr.end];
        if value.contains("{{") {
            continue;
        }
        let mut tokens: Vec<String> = value.split_whitespace().map(str::to_string).collect();
        let mut changed = false;
        for (i, rule) in rules.iter().enumerate() {
            if !rule.applies_to(&attr.tag) {
                continue;
            }
            let current: Vec<&str> = tokens.iter().map(String::as_str).collect();
            if let Some(next) = rule.rewrite(&current) {
                tokens = next;
                fired[i] = true;
                changed = true;
            }
        }
        if changed {
            out.push_str(&text[copied..attr.start]);
            out.push_str(&tokens.join(" "));
            copied = attr.end;
        }
    }
    out.push_str(&text[copied..]);

    NormalizeOutcome {
        text: out,
        rewritten: rules
            .iter()
            .zip(fired)
            .filter(|(_, f)| *f)
            .map(|(r, _)| r.name)
            .collect(),
    }
}
