use crate::error::{GlazeError, Result};
use crate::fragments;
use crate::scan;
use std::collections::BTreeSet;
use std::fmt;

/// A set of feature names. Ordered so reports and comparisons are stable.
pub type FeatureSet = BTreeSet<&'static str>;

// ---------------------------------------------------------------------------
// Anchor
// ---------------------------------------------------------------------------

/// Where a feature's fragment lands in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Before the last `</style>`; without one, a new style block before
    /// `</head>`.
    StyleBlock,
    /// Immediately before the first `</head>`.
    HeadEnd,
    /// Immediately after the first `<body ...>` open tag.
    BodyStart,
    /// Immediately before the last `</body>`.
    BodyEnd,
    /// Immediately before the first `</nav>`.
    NavEnd,
    /// Substitute the first token-bounded `marker` with the fragment.
    Replace { marker: &'static str },
}

impl Anchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::StyleBlock => "style-block",
            Anchor::HeadEnd => "head-end",
            Anchor::BodyStart => "body-start",
            Anchor::BodyEnd => "body-end",
            Anchor::NavEnd => "nav-end",
            Anchor::Replace { .. } => "replace",
        }
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// A named, detectable, injectable capability. Process-wide constant.
pub struct Feature {
    pub name: &'static str,
    pub description: &'static str,
    /// Pure presence predicate over raw document text. Must not report a
    /// feature present unless its distinctive marker is there.
    pub detect: fn(&str) -> bool,
    pub fragment: &'static str,
    pub anchor: Anchor,
}

impl Feature {
    pub fn is_present(&self, text: &str) -> bool {
        (self.detect)(text)
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("name", &self.name)
            .field("anchor", &self.anchor)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Detection predicates
// ---------------------------------------------------------------------------

fn has_gradients(text: &str) -> bool {
    text.contains("--gradient-1")
}

fn has_animated_bg(text: &str) -> bool {
    text.contains("@keyframes backgroundShift")
}

// The stylesheet rule, not `class="glass-card"` markup: class normalization
// can produce the markup without the styles.
fn has_glass_card(text: &str) -> bool {
    scan::has_css_rule(text, ".glass-card")
}

fn has_base_theme(text: &str) -> bool {
    text.contains("--glass-surface")
}

fn has_dark_theme_css(text: &str) -> bool {
    text.contains("/static/dark_theme_text.css")
}

fn has_bootstrap_css(text: &str) -> bool {
    text.contains("bootstrap.min.css")
}

fn has_floating_orbs(text: &str) -> bool {
    scan::has_class_token(text, "orb")
}

fn has_navbar_glass(text: &str) -> bool {
    scan::has_class_token(text, "navbar-glass")
}

fn has_logout_form(text: &str) -> bool {
    text.contains("/logout")
}

fn has_jquery(text: &str) -> bool {
    scan::find_ci(text, "jquery").is_some()
}

fn has_bootstrap_js(text: &str) -> bool {
    text.contains("bootstrap.bundle")
}

// ---------------------------------------------------------------------------
// Feature table (canonical order)
// ---------------------------------------------------------------------------

// Style-block features come first so a block created by the fallback path is
// reused by the ones after it; head-end features follow, then body edits.
// jQuery precedes the Bootstrap bundle so both land before `</body>` in load
// order.
static STANDARD_FEATURES: [Feature; 11] = [
    Feature {
        name: "gradients",
        description: "design-system gradient variables",
        detect: has_gradients,
        fragment: fragments::GRADIENTS_CSS,
        anchor: Anchor::StyleBlock,
    },
    Feature {
        name: "animated_bg",
        description: "animated radial background",
        detect: has_animated_bg,
        fragment: fragments::ANIMATED_BG_CSS,
        anchor: Anchor::StyleBlock,
    },
    Feature {
        name: "glass_card",
        description: "glass card, navbar and orb surface styles",
        detect: has_glass_card,
        fragment: fragments::GLASS_SURFACES_CSS,
        anchor: Anchor::StyleBlock,
    },
    Feature {
        name: "base_theme",
        description: "dark glass page theme for forms, buttons, tables and modals",
        detect: has_base_theme,
        fragment: fragments::BASE_THEME_CSS,
        anchor: Anchor::StyleBlock,
    },
    Feature {
        name: "dark_theme_css",
        description: "dark theme text stylesheet link",
        detect: has_dark_theme_css,
        fragment: fragments::DARK_THEME_LINK,
        anchor: Anchor::HeadEnd,
    },
    Feature {
        name: "bootstrap_css",
        description: "Bootstrap and Bootstrap Icons stylesheets",
        detect: has_bootstrap_css,
        fragment: fragments::BOOTSTRAP_LINKS,
        anchor: Anchor::HeadEnd,
    },
    Feature {
        name: "floating_orbs",
        description: "decorative floating orb elements",
        detect: has_floating_orbs,
        fragment: fragments::FLOATING_ORBS_HTML,
        anchor: Anchor::BodyStart,
    },
    Feature {
        name: "navbar_glass",
        description: "glass modifier on the navigation bar class list",
        detect: has_navbar_glass,
        fragment: fragments::NAVBAR_GLASS,
        anchor: Anchor::Replace {
            marker: fragments::NAVBAR_MARKER,
        },
    },
    Feature {
        name: "logout_form",
        description: "logout form at the end of the navigation bar",
        detect: has_logout_form,
        fragment: fragments::LOGOUT_FORM,
        anchor: Anchor::NavEnd,
    },
    Feature {
        name: "jquery",
        description: "jQuery script include",
        detect: has_jquery,
        fragment: fragments::JQUERY_SCRIPT,
        anchor: Anchor::BodyEnd,
    },
    Feature {
        name: "bootstrap_js",
        description: "Bootstrap JS bundle include",
        detect: has_bootstrap_js,
        fragment: fragments::BOOTSTRAP_JS_SCRIPT,
        anchor: Anchor::BodyEnd,
    },
];

/// The six features the glass migration audits by default.
pub const GLASS_FEATURES: [&str; 6] = [
    "gradients",
    "animated_bg",
    "glass_card",
    "dark_theme_css",
    "floating_orbs",
    "navbar_glass",
];

/// Every known feature in canonical order.
pub fn features() -> &'static [Feature] {
    &STANDARD_FEATURES
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// An ordered, immutable selection of features, passed explicitly into the
/// detector, patcher and auditor.
#[derive(Debug, Clone)]
pub struct Catalog {
    features: Vec<&'static Feature>,
}

impl Catalog {
    /// All known features.
    pub fn standard() -> Self {
        Self {
            features: STANDARD_FEATURES.iter().collect(),
        }
    }

    /// The glass migration set.
    pub fn glass() -> Self {
        Self {
            features: STANDARD_FEATURES
                .iter()
                .filter(|f| GLASS_FEATURES.contains(&f.name))
                .collect(),
        }
    }

    /// Sub-catalog holding `names`, kept in canonical order regardless of the
    /// order given. Duplicates collapse.
    pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        for name in names {
            lookup(name.as_ref())?;
        }
        Ok(Self {
            features: STANDARD_FEATURES
                .iter()
                .filter(|f| names.iter().any(|n| n.as_ref() == f.name))
                .collect(),
        })
    }

    pub fn features(&self) -> &[&'static Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> FeatureSet {
        self.features.iter().map(|f| f.name).collect()
    }

    /// Resolve override names to a target. Any known feature may be named,
    /// including ones outside this catalog; an empty list means the whole
    /// catalog.
    pub fn target<S: AsRef<str>>(&self, names: &[S]) -> Result<FeatureSet> {
        if names.is_empty() {
            return Ok(self.names());
        }
        names
            .iter()
            .map(|n| lookup(n.as_ref()).map(|f| f.name))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::glass()
    }
}

/// Any known feature by name.
pub fn find(name: &str) -> Option<&'static Feature> {
    STANDARD_FEATURES.iter().find(|f| f.name == name)
}

/// Look up a feature by name across every known feature.
pub fn lookup(name: &str) -> Result<&'static Feature> {
    find(name).ok_or_else(|| GlazeError::UnknownFeature(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
