//! Minimal tag-boundary scanning over raw template text.
//!
//! Templates are Go `html/template` sources, not well-formed HTML, so nothing
//! here builds a tree. Every helper returns byte offsets into the original
//! text; ASCII case folding keeps offsets stable because it never changes the
//! length of a UTF-8 sequence.

/// First offset of `needle` in `haystack`, ignoring ASCII case.
pub fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

/// Last offset of `needle` in `haystack`, ignoring ASCII case.
pub fn rfind_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .rfind(&needle.to_ascii_lowercase())
}

/// Count non-overlapping occurrences of `needle`, ignoring ASCII case.
pub fn count_ci(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .to_ascii_lowercase()
        .matches(&needle.to_ascii_lowercase())
        .count()
}

/// Offset just past the `>` that closes the first `<name ...>` open tag.
///
/// `<bodyguard>` does not match `body`: the character after the name must be
/// whitespace, `>` or `/`.
pub fn open_tag_end(text: &str, name: &str) -> Option<usize> {
    let lower = text.to_ascii_lowercase();
    let pattern = format!("<{}", name.to_ascii_lowercase());
    let mut from = 0;
    while let Some(rel) = lower[from..].find(&pattern) {
        let start = from + rel;
        let after = start + pattern.len();
        match lower.as_bytes().get(after) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {
                return lower[after..].find('>').map(|gt| after + gt + 1);
            }
            Some(_) => from = after,
            None => return None,
        }
    }
    None
}

/// First offset of `marker` that ends a class token.
///
/// The character after the marker must close the token: whitespace, a quote,
/// or the `{{` of a template action. `class="navbar` matches
/// `class="navbar brand"`, `class="navbar"` and `class="navbar{{if .Dark}}`
/// but not `class="navbar-brand"` or `class="navbar.x"`.
pub fn find_token_boundary(text: &str, marker: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(rel) = text[from..].find(marker) {
        let start = from + rel;
        let after = start + marker.len();
        if ends_token(&text[after..]) {
            return Some(start);
        }
        from = after;
    }
    None
}

fn ends_token(rest: &str) -> bool {
    match rest.as_bytes().first() {
        None => true,
        Some(b) if b.is_ascii_whitespace() || *b == b'"' || *b == b'\'' => true,
        Some(_) => rest.starts_with("{{"),
    }
}

/// A quoted `class` attribute and the element carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassAttr {
    /// Lowercased element name; empty when the attribute is not inside a tag.
    pub tag: String,
    /// Byte offset of the value, quotes excluded.
    pub start: usize,
    pub end: usize,
}

/// Every `class="..."` / `class='...'` attribute in document order.
pub fn class_attributes(text: &str) -> Vec<ClassAttr> {
    let lower = text.to_ascii_lowercase();
    let bytes = text.as_bytes();
    let mut attrs = Vec::new();
    let mut from = 0;
    while let Some(rel) = lower[from..].find("class=") {
        let attr_start = from + rel;
        let eq_end = attr_start + "class=".len();
        // Reject `subclass=` and friends.
        let preceded_ok = attr_start == 0 || bytes[attr_start - 1].is_ascii_whitespace();
        let quote = bytes.get(eq_end).copied();
        from = eq_end;
        let (Some(q @ (b'"' | b'\'')), true) = (quote, preceded_ok) else {
            continue;
        };
        let start = eq_end + 1;
        let Some(len) = text[start..].find(q as char) else {
            break;
        };
        attrs.push(ClassAttr {
            tag: enclosing_tag(&lower[..attr_start]),
            start,
            end: start + len,
        });
        from = start + len + 1;
    }
    attrs
}

fn enclosing_tag(before: &str) -> String {
    let Some(lt) = before.rfind('<') else {
        return String::new();
    };
    if before[lt..].contains('>') {
        return String::new();
    }
    before[lt + 1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Class tokens of one attribute value. Go template actions (`{{...}}`) are
/// separators, not tokens, so `navbar-glass{{if .Dark}} x{{end}}` yields
/// `navbar-glass` and `x`.
pub fn split_class_value(value: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = value;
    while let Some(open) = rest.find("{{") {
        tokens.extend(rest[..open].split_whitespace());
        match rest[open..].find("}}") {
            Some(close) => rest = &rest[open + close + 2..],
            None => return tokens,
        }
    }
    tokens.extend(rest.split_whitespace());
    tokens
}

/// Every token of every class attribute in the text, in document order.
pub fn class_tokens(text: &str) -> Vec<&str> {
    class_attributes(text)
        .into_iter()
        .flat_map(|a| split_class_value(&text[a.start..a.end]))
        .collect()
}

/// True if any class attribute carries `token` exactly.
pub fn has_class_token(text: &str, token: &str) -> bool {
    class_tokens(text).into_iter().any(|t| t == token)
}

/// True if `selector` opens a CSS rule: the selector is followed, after
/// optional whitespace, by `{` or `,`. `.glass-card-body {` does not count
/// for `.glass-card`, and neither does `class="glass-card"` markup.
pub fn has_css_rule(text: &str, selector: &str) -> bool {
    let mut from = 0;
    while let Some(rel) = text[from..].find(selector) {
        let after = from + rel + selector.len();
        let rest = text[after..].trim_start();
        if rest.starts_with('{') || rest.starts_with(',') {
            return true;
        }
        from = after;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_ci_ignores_case() {
        assert_eq!(find_ci("<HEAD></HEAD>", "</head>"), Some(6));
        assert_eq!(rfind_ci("</style>a</STYLE>", "</style>"), Some(9));
        assert_eq!(find_ci("nothing", "</head>"), None);
    }

    #[test]
    fn find_ci_offsets_survive_multibyte_text() {
        let text = "<title>Flotte – Übersicht</title></head>";
        let pos = find_ci(text, "</head>").unwrap();
        assert_eq!(&text[pos..], "</head>");
    }

    #[test]
    fn count_ci_counts_all_cases() {
        assert_eq!(count_ci("null NULL Null", "null"), 3);
        assert_eq!(count_ci("abc", ""), 0);
    }

    #[test]
    fn open_tag_end_skips_attributes() {
        let text = "<html><body class=\"dark\" data-x=\"1\">\n<main>";
        let end = open_tag_end(text, "body").unwrap();
        assert_eq!(&text[end..], "\n<main>");
    }

    #[test]
    fn open_tag_end_rejects_longer_names() {
        let text = "<bodyguard></bodyguard><body>";
        let end = open_tag_end(text, "body").unwrap();
        assert_eq!(end, text.len());
        assert_eq!(open_tag_end("<bodyguard>", "body"), None);
    }

    #[test]
    fn token_boundary_excludes_longer_tokens() {
        let text = r#"<a class="navbar-brand"></a><nav class="navbar navbar-dark">"#;
        let pos = find_token_boundary(text, r#"class="navbar"#).unwrap();
        assert!(text[pos..].starts_with(r#"class="navbar navbar-dark""#));
        assert_eq!(find_token_boundary(r#"class="navbar-x""#, r#"class="navbar"#), None);
    }

    #[test]
    fn token_boundary_accepts_template_actions_only() {
        let marker = r#"class="navbar"#;
        let text = r#"<nav class="navbar{{if .Dark}} navbar-dark{{end}}">"#;
        assert_eq!(find_token_boundary(text, marker), Some(5));
        assert_eq!(find_token_boundary(r#"class="navbar.x""#, marker), None);
        assert_eq!(find_token_boundary(r#"class="navbar{x""#, marker), None);
    }

    #[test]
    fn template_actions_split_class_tokens() {
        assert_eq!(
            split_class_value("navbar navbar-glass{{if .Dark}} navbar-dark{{end}}"),
            vec!["navbar", "navbar-glass", "navbar-dark"]
        );
        assert_eq!(split_class_value("a {{.Unclosed"), vec!["a"]);
        let text = r#"<nav class="navbar navbar-glass{{if .Dark}} x{{end}}">"#;
        assert!(has_class_token(text, "navbar-glass"));
    }

    #[test]
    fn class_attributes_know_their_element() {
        let text = r#"<div class="card"></div><SECTION id="h" class="hero">{{/* class="x" */}}"#;
        let attrs = class_attributes(text);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[0].tag, "div");
        assert_eq!(&text[attrs[0].start..attrs[0].end], "card");
        assert_eq!(attrs[1].tag, "section");
        assert_eq!(attrs[2].tag, "");
    }

    #[test]
    fn css_rule_needs_a_rule_body() {
        assert!(has_css_rule(".glass-card {\n color: white; }", ".glass-card"));
        assert!(has_css_rule(".glass-card,\n.card { }", ".glass-card"));
        assert!(!has_css_rule("<div class=\"glass-card\">", ".glass-card"));
        assert!(!has_css_rule(".glass-card-body { }", ".glass-card"));
    }

    #[test]
    fn class_tokens_reads_both_quote_styles() {
        let text = r#"<div class="orb orb1"></div><span class='badge  big'></span>"#;
        assert_eq!(class_tokens(text), vec!["orb", "orb1", "badge", "big"]);
    }

    #[test]
    fn class_tokens_ignores_css_selectors_and_other_attributes() {
        let text = ".orb { filter: blur(40px); } <div data-subclass=\"orb\"></div>";
        assert!(!has_class_token(text, "orb"));
    }
}
