use crate::catalog::{self, Anchor, Catalog, Feature, FeatureSet};
use crate::detect::Detector;
use crate::fragments::DEFAULT_STYLE_OPEN_TAG;
use crate::scan;
use serde::Serialize;

// ---------------------------------------------------------------------------
// PatchOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    #[serde(skip)]
    pub text: String,
    /// Features spliced in by this call, in the order they were applied.
    pub applied: Vec<&'static str>,
    /// Requested features whose anchor could not be located.
    pub unplaced: Vec<&'static str>,
}

impl PatchOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Patcher
// ---------------------------------------------------------------------------

/// Splices missing feature fragments into a document.
///
/// Features are applied in canonical order and every anchor is resolved
/// against the text as edited so far, so a style block created by the
/// fallback path for one feature is the anchor of the next. Features already
/// detected are never touched, which makes `apply` idempotent. A target may
/// name known features outside the catalog.
#[derive(Debug, Clone)]
pub struct Patcher<'a> {
    detector: Detector<'a>,
    style_open_tag: String,
}

impl<'a> Patcher<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            detector: Detector::new(catalog),
            style_open_tag: DEFAULT_STYLE_OPEN_TAG.to_string(),
        }
    }

    /// Override the opening tag of style blocks created by the fallback path.
    pub fn with_style_open_tag(mut self, tag: impl Into<String>) -> Self {
        self.style_open_tag = tag.into();
        self
    }

    pub fn detector(&self) -> &Detector<'a> {
        &self.detector
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.detector.catalog()
    }

    pub fn apply(&self, text: &str, target: &FeatureSet) -> PatchOutcome {
        let mut current = text.to_string();
        let mut applied = Vec::new();
        let mut unplaced = Vec::new();

        for feature in catalog::features() {
            if !target.contains(feature.name) || feature.is_present(text) {
                continue;
            }
            match self.splice(&current, feature) {
                Some(next) => {
                    tracing::debug!(feature = feature.name, anchor = feature.anchor.as_str(), "applied");
                    current = next;
                    applied.push(feature.name);
                }
                None => {
                    tracing::debug!(feature = feature.name, anchor = feature.anchor.as_str(), "anchor not found");
                    unplaced.push(feature.name);
                }
            }
        }

        PatchOutcome {
            text: current,
            applied,
            unplaced,
        }
    }

    fn splice(&self, text: &str, feature: &Feature) -> Option<String> {
        match feature.anchor {
            Anchor::StyleBlock => match scan::rfind_ci(text, "</style>") {
                Some(pos) => Some(insert_at(text, pos, feature.fragment)),
                None => {
                    let pos = scan::find_ci(text, "</head>")?;
                    let block = format!(
                        "  {}\n{}  </style>\n",
                        self.style_open_tag, feature.fragment
                    );
                    Some(insert_at(text, pos, &block))
                }
            },
            Anchor::HeadEnd => {
                let pos = scan::find_ci(text, "</head>")?;
                Some(insert_at(text, pos, feature.fragment))
            }
            Anchor::BodyStart => {
                let pos = scan::open_tag_end(text, "body")?;
                Some(insert_at(text, pos, feature.fragment))
            }
            Anchor::BodyEnd => {
                let pos = scan::rfind_ci(text, "</body>")?;
                Some(insert_at(text, pos, feature.fragment))
            }
            Anchor::NavEnd => {
                let pos = scan::find_ci(text, "</nav>")?;
                Some(insert_at(text, pos, feature.fragment))
            }
            Anchor::Replace { marker } => {
                let pos = find_unreplaced(text, marker, feature.fragment)?;
                let mut out = String::with_capacity(text.len() + feature.fragment.len());
                out.push_str(&text[..pos]);
                out.push_str(feature.fragment);
                out.push_str(&text[pos + marker.len()..]);
                Some(out)
            }
        }
    }
}

fn insert_at(text: &str, pos: usize, fragment: &str) -> String {
    let mut out = String::with_capacity(text.len() + fragment.len());
    out.push_str(&text[..pos]);
    out.push_str(fragment);
    out.push_str(&text[pos..]);
    out
}

/// First token-bounded `marker` not already followed by the rest of
/// `replacement`. Without this guard a second pass would turn
/// `navbar navbar-glass` into `navbar navbar-glass navbar-glass`.
fn find_unreplaced(text: &str, marker: &str, replacement: &str) -> Option<usize> {
    let mut from = 0;
    while from <= text.len() {
        let pos = from + scan::find_token_boundary(&text[from..], marker)?;
        if !text[pos..].starts_with(replacement) {
            return Some(pos);
        }
        from = pos + marker.len();
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
