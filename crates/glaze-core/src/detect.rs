use crate::catalog::{self, Catalog, FeatureSet};

/// Evaluates catalog predicates against document text. Holds no state beyond
/// the catalog, so the same text always yields the same set.
#[derive(Debug, Clone, Copy)]
pub struct Detector<'a> {
    catalog: &'a Catalog,
}

impl<'a> Detector<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Names of every catalog feature present in `text`.
    pub fn detect(&self, text: &str) -> FeatureSet {
        self.catalog
            .features()
            .iter()
            .filter(|f| f.is_present(text))
            .map(|f| f.name)
            .collect()
    }

    /// Catalog features absent from `text`, in canonical order.
    pub fn missing(&self, text: &str) -> Vec<&'static str> {
        self.catalog
            .features()
            .iter()
            .filter(|f| !f.is_present(text))
            .map(|f| f.name)
            .collect()
    }

    /// True if every feature in `target` is present. Targets may name known
    /// features outside the catalog; an unknown name is never satisfied.
    pub fn satisfies(&self, text: &str, target: &FeatureSet) -> bool {
        target
            .iter()
            .all(|name| catalog::find(name).is_some_and(|f| f.is_present(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments;

    #[test]
    fn detects_only_what_is_there() {
        let cat = Catalog::glass();
        let det = Detector::new(&cat);
        let text = format!(
            "<head><style>{}</style>{}</head><body></body>",
            fragments::GRADIENTS_CSS,
            fragments::DARK_THEME_LINK
        );
        let found = det.detect(&text);
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["dark_theme_css", "gradients"]
        );
        assert_eq!(
            det.missing(&text),
            vec!["animated_bg", "glass_card", "floating_orbs", "navbar_glass"]
        );
    }

    #[test]
    fn detect_is_repeatable() {
        let cat = Catalog::standard();
        let det = Detector::new(&cat);
        let text = "<nav class=\"navbar navbar-glass\"></nav><div class=\"orb orb1\"></div>";
        assert_eq!(det.detect(text), det.detect(text));
    }

    #[test]
    fn features_outside_the_catalog_are_ignored() {
        let cat = Catalog::select(&["gradients"]).unwrap();
        let det = Detector::new(&cat);
        let text = "<div class=\"orb\"></div> --gradient-1";
        assert_eq!(det.detect(text).len(), 1);
    }

    #[test]
    fn satisfies_checks_superset() {
        let cat = Catalog::glass();
        let det = Detector::new(&cat);
        let text = "--gradient-1 @keyframes backgroundShift";
        let target: FeatureSet = ["gradients", "animated_bg"].into_iter().collect();
        assert!(det.satisfies(text, &target));
        let wider: FeatureSet = ["gradients", "glass_card"].into_iter().collect();
        assert!(!det.satisfies(text, &wider));
    }

    #[test]
    fn satisfies_evaluates_targets_outside_the_catalog() {
        let cat = Catalog::glass();
        let det = Detector::new(&cat);
        let target: FeatureSet = ["jquery"].into_iter().collect();
        assert!(det.satisfies("<script src=\"jquery.js\"></script>", &target));
        assert!(!det.satisfies("<body></body>", &target));
    }
}
