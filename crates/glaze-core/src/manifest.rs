use crate::catalog::{Catalog, FeatureSet};
use crate::error::{GlazeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Explicit per-document targets for partial reprocessing.
///
/// ```yaml
/// documents:
///   edit_bus.html: [floating_orbs, animated_bg, dark_theme_css]
///   gps_tracking.html: [navbar_glass, floating_orbs]
///   students_lazy.html: []   # empty list: whole catalog
/// ```
///
/// Keys are document ids (paths relative to the template directory).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub documents: BTreeMap<String, Vec<String>>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GlazeError::ManifestNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Every listed document with its target set, validated against
    /// `catalog`. Validation fails per document, not for the manifest.
    pub fn targets<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = (&'a str, Result<FeatureSet>)> + 'a {
        self.documents
            .iter()
            .map(move |(doc, names)| (doc.as_str(), catalog.target(names)))
    }
}
