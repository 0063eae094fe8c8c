use crate::catalog::FeatureSet;
use crate::error::{GlazeError, Result};
use crate::io;
use crate::manifest::Manifest;
use crate::normalize::{self, ClassRule};
use crate::patch::Patcher;
use crate::paths;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Template listing
// ---------------------------------------------------------------------------

/// Template files under a root, plus entries the directory walk could not
/// read. Files are sorted by path.
#[derive(Debug, Default)]
pub struct Listing {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, String)>,
}

/// Recursively list every file carrying `extension` under `root`.
///
/// Only a missing root is an error; a broken entry further down is kept in
/// `unreadable` so the caller can record it against that document.
pub fn list_templates(root: &Path, extension: &str) -> Result<Listing> {
    if !root.is_dir() {
        return Err(GlazeError::TemplateDirNotFound(root.to_path_buf()));
    }
    let mut listing = Listing::default();
    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        match entry {
            Ok(e) if e.file_type().is_file() && paths::has_extension(e.path(), extension) => {
                listing.files.push(e.into_path());
            }
            Ok(_) => {}
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                listing.unreadable.push((path, e.to_string()));
            }
        }
    }
    Ok(listing)
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Updated,
    AlreadyComplete,
    AnchorNotFound,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Updated {
        applied: Vec<&'static str>,
        /// Class rules that rewrote markup in this document.
        #[serde(skip_serializing_if = "Vec::is_empty")]
        rewritten: Vec<&'static str>,
    },
    AlreadyComplete,
    /// Some requested features had no anchor. Anything in `applied` or
    /// `rewritten` was still written.
    AnchorNotFound {
        applied: Vec<&'static str>,
        missing: Vec<&'static str>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        rewritten: Vec<&'static str>,
    },
    Error {
        detail: String,
    },
}

impl DocumentOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            DocumentOutcome::Updated { .. } => OutcomeKind::Updated,
            DocumentOutcome::AlreadyComplete => OutcomeKind::AlreadyComplete,
            DocumentOutcome::AnchorNotFound { .. } => OutcomeKind::AnchorNotFound,
            DocumentOutcome::Error { .. } => OutcomeKind::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub document: String,
    #[serde(flatten)]
    pub outcome: DocumentOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub updated: usize,
    pub already_complete: usize,
    pub anchor_not_found: usize,
    pub errors: usize,
    pub records: Vec<DocumentRecord>,
}

impl RunSummary {
    pub fn push(&mut self, record: DocumentRecord) {
        match record.outcome.kind() {
            OutcomeKind::Updated => self.updated += 1,
            OutcomeKind::AlreadyComplete => self.already_complete += 1,
            OutcomeKind::AnchorNotFound => self.anchor_not_found += 1,
            OutcomeKind::Error => self.errors += 1,
        }
        self.records.push(record);
    }

    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// Document ids whose outcome is `kind`, in processing order.
    pub fn documents(&self, kind: OutcomeKind) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.outcome.kind() == kind)
            .map(|r| r.document.as_str())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// What a corpus run covers.
#[derive(Debug, Clone)]
pub enum Source {
    /// Every template under `root`, targeting the whole catalog. `priority`
    /// documents run first in the given order; `exclude` documents are never
    /// opened.
    Tree {
        root: PathBuf,
        priority: Vec<String>,
        exclude: BTreeSet<String>,
    },
    /// Only the documents listed in the manifest, each with its own target.
    Manifest { root: PathBuf, manifest: Manifest },
}

impl Source {
    pub fn tree(root: impl Into<PathBuf>) -> Self {
        Source::Tree {
            root: root.into(),
            priority: Vec::new(),
            exclude: BTreeSet::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Drives the patcher over a corpus, one document at a time.
pub struct Walker<'a> {
    patcher: &'a Patcher<'a>,
    extension: String,
    class_rules: Vec<&'static ClassRule>,
}

impl<'a> Walker<'a> {
    pub fn new(patcher: &'a Patcher<'a>, extension: impl Into<String>) -> Self {
        Self {
            patcher,
            extension: extension.into(),
            class_rules: Vec::new(),
        }
    }

    /// Class rules applied on whole-tree runs. Manifest runs only add the
    /// listed features and never rewrite classes.
    pub fn with_class_rules(mut self, rules: Vec<&'static ClassRule>) -> Self {
        self.class_rules = rules;
        self
    }

    pub fn run(&self, source: &Source) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        match source {
            Source::Tree {
                root,
                priority,
                exclude,
            } => {
                let listing = list_templates(root, &self.extension)?;
                for (path, detail) in listing.unreadable {
                    summary.push(DocumentRecord {
                        document: paths::document_id(root, &path),
                        outcome: DocumentOutcome::Error { detail },
                    });
                }
                let mut docs: Vec<(String, PathBuf)> = listing
                    .files
                    .into_iter()
                    .map(|p| (paths::document_id(root, &p), p))
                    .filter(|(id, _)| {
                        let skip = exclude.contains(id);
                        if skip {
                            tracing::debug!(document = %id, "excluded");
                        }
                        !skip
                    })
                    .collect();
                docs.sort_by_key(|(id, _)| {
                    priority.iter().position(|p| p == id).unwrap_or(usize::MAX)
                });

                let target = self.patcher.catalog().names();
                tracing::info!(documents = docs.len(), root = %root.display(), "patching corpus");
                for (id, path) in docs {
                    let outcome = self.process_with(&path, &target, &self.class_rules);
                    self.log(&id, &outcome);
                    summary.push(DocumentRecord {
                        document: id,
                        outcome,
                    });
                }
            }
            Source::Manifest { root, manifest } => {
                tracing::info!(documents = manifest.documents.len(), "patching manifest");
                for (id, target) in manifest.targets(self.patcher.catalog()) {
                    let outcome = match (target, inside_root(id)) {
                        (_, false) => DocumentOutcome::Error {
                            detail: format!("document id '{id}' escapes the template directory"),
                        },
                        (Ok(target), true) => self.process(&root.join(id), &target),
                        (Err(e), true) => DocumentOutcome::Error {
                            detail: e.to_string(),
                        },
                    };
                    self.log(id, &outcome);
                    summary.push(DocumentRecord {
                        document: id.to_string(),
                        outcome,
                    });
                }
            }
        }
        Ok(summary)
    }

    /// Read, patch and write back a single document. Never fails: every
    /// problem becomes the document's outcome.
    pub fn process(&self, path: &Path, target: &FeatureSet) -> DocumentOutcome {
        self.process_with(path, target, &[])
    }

    fn process_with(
        &self,
        path: &Path,
        target: &FeatureSet,
        rules: &[&'static ClassRule],
    ) -> DocumentOutcome {
        let text = match io::read_document(path) {
            Ok(t) => t,
            Err(e) => {
                return DocumentOutcome::Error {
                    detail: format!("read failed: {e}"),
                }
            }
        };
        let normalized = normalize::normalize(&text, rules);
        if normalized.rewritten.is_empty() && self.patcher.detector().satisfies(&text, target) {
            return DocumentOutcome::AlreadyComplete;
        }
        let out = self.patcher.apply(&normalized.text, target);
        if out.changed() || !normalized.rewritten.is_empty() {
            if let Err(e) = io::atomic_write(path, out.text.as_bytes()) {
                return DocumentOutcome::Error {
                    detail: format!("write failed: {e}"),
                };
            }
        }
        if out.unplaced.is_empty() {
            DocumentOutcome::Updated {
                applied: out.applied,
                rewritten: normalized.rewritten,
            }
        } else {
            DocumentOutcome::AnchorNotFound {
                applied: out.applied,
                missing: out.unplaced,
                rewritten: normalized.rewritten,
            }
        }
    }

    fn log(&self, id: &str, outcome: &DocumentOutcome) {
        match outcome {
            DocumentOutcome::Updated { applied, rewritten } => {
                tracing::debug!(document = id, applied = ?applied, rewritten = ?rewritten, "updated")
            }
            DocumentOutcome::AlreadyComplete => tracing::debug!(document = id, "already complete"),
            DocumentOutcome::AnchorNotFound { missing, .. } => {
                tracing::warn!(document = id, missing = ?missing, "anchor not found")
            }
            DocumentOutcome::Error { detail } => tracing::warn!(document = id, %detail, "failed"),
        }
    }
}

/// A manifest id must name a file below the template root.
fn inside_root(id: &str) -> bool {
    let path = Path::new(id);
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use tempfile::TempDir;

    const BARE: &str = "<html>\n<head>\n<title>t</title>\n</head>\n<body>\n<nav class=\"navbar\"></nav>\n</body>\n</html>\n";

    fn corpus(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            let path = dir.path().join(name);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, BARE).unwrap();
        }
        dir
    }

    #[test]
    fn lists_templates_recursively_and_sorted() {
        let dir = corpus(&["b.html", "a.html", "partials/nav.html"]);
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let listing = list_templates(dir.path(), "html").unwrap();
        let ids: Vec<_> = listing
            .files
            .iter()
            .map(|p| paths::document_id(dir.path(), p))
            .collect();
        assert_eq!(ids, vec!["a.html", "b.html", "partials/nav.html"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = list_templates(&dir.path().join("templates"), "html").unwrap_err();
        assert!(matches!(err, GlazeError::TemplateDirNotFound(_)));
    }

    #[test]
    fn updates_then_reports_complete() {
        let dir = corpus(&["a.html", "b.html", "c.html"]);
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");

        let first = walker.run(&Source::tree(dir.path())).unwrap();
        assert_eq!(first.updated, 3);
        assert_eq!(first.already_complete, 0);

        let second = walker.run(&Source::tree(dir.path())).unwrap();
        assert_eq!(second.updated, 0);
        assert_eq!(second.already_complete, 3);
    }

    #[test]
    fn one_unreadable_document_does_not_stop_the_walk() {
        let dir = corpus(&["a.html", "b.html", "d.html"]);
        // Not valid UTF-8: the read fails for this document only.
        std::fs::write(dir.path().join("c.html"), [0xc3, 0x28, 0xff]).unwrap();
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");

        let summary = walker.run(&Source::tree(dir.path())).unwrap();
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.updated, 3);
        assert_eq!(summary.documents(OutcomeKind::Error), vec!["c.html"]);
    }

    #[test]
    fn priority_runs_first_and_exclude_is_untouched() {
        let dir = corpus(&["a.html", "b.html", "c.html", "fleet.html"]);
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");
        let source = Source::Tree {
            root: dir.path().to_path_buf(),
            priority: vec!["c.html".to_string(), "b.html".to_string()],
            exclude: ["fleet.html".to_string()].into_iter().collect(),
        };

        let summary = walker.run(&source).unwrap();
        let order: Vec<_> = summary.records.iter().map(|r| r.document.as_str()).collect();
        assert_eq!(order, vec!["c.html", "b.html", "a.html"]);
        let fleet = std::fs::read_to_string(dir.path().join("fleet.html")).unwrap();
        assert_eq!(fleet, BARE);
    }

    #[test]
    fn manifest_overrides_target_per_document() {
        let dir = corpus(&["edit_bus.html", "gps_tracking.html", "untouched.html"]);
        let mut manifest = Manifest::default();
        manifest
            .documents
            .insert("edit_bus.html".into(), vec!["dark_theme_css".into()]);
        manifest
            .documents
            .insert("gps_tracking.html".into(), vec!["navbar_glass".into(), "floating_orbs".into()]);
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");

        let summary = walker
            .run(&Source::Manifest {
                root: dir.path().to_path_buf(),
                manifest,
            })
            .unwrap();
        assert_eq!(summary.updated, 2);
        assert_eq!(
            summary.records[0].outcome,
            DocumentOutcome::Updated {
                applied: vec!["dark_theme_css"],
                rewritten: vec![],
            }
        );
        assert_eq!(
            summary.records[1].outcome,
            DocumentOutcome::Updated {
                applied: vec!["floating_orbs", "navbar_glass"],
                rewritten: vec![],
            }
        );
        let untouched = std::fs::read_to_string(dir.path().join("untouched.html")).unwrap();
        assert_eq!(untouched, BARE);
    }

    #[test]
    fn manifest_problems_are_isolated() {
        let dir = corpus(&["a.html"]);
        let mut manifest = Manifest::default();
        manifest.documents.insert("a.html".into(), vec![]);
        manifest.documents.insert("gone.html".into(), vec![]);
        manifest
            .documents
            .insert("odd.html".into(), vec!["sparkles".into()]);
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");

        let summary = walker
            .run(&Source::Manifest {
                root: dir.path().to_path_buf(),
                manifest,
            })
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.errors, 2);
        assert_eq!(
            summary.documents(OutcomeKind::Error),
            vec!["gone.html", "odd.html"]
        );
    }

    #[test]
    fn manifest_ids_cannot_leave_the_template_root() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("templates");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("a.html"), BARE).unwrap();
        let outside = outer.path().join("outside.html");
        std::fs::write(&outside, BARE).unwrap();

        let mut manifest = Manifest::default();
        manifest.documents.insert("a.html".into(), vec![]);
        manifest.documents.insert("../outside.html".into(), vec![]);
        manifest
            .documents
            .insert(outside.display().to_string(), vec![]);
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");

        let summary = walker
            .run(&Source::Manifest {
                root: root.clone(),
                manifest,
            })
            .unwrap();
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.errors, 2);
        for record in &summary.records {
            if let DocumentOutcome::Error { detail } = &record.outcome {
                assert!(detail.contains("escapes the template directory"), "{detail}");
            }
        }
        assert_eq!(std::fs::read_to_string(&outside).unwrap(), BARE);
    }

    #[test]
    fn tree_runs_apply_class_rules_once() {
        let dir = TempDir::new().unwrap();
        let card = BARE.replace(
            "</body>",
            "<div class=\"card\"><a class=\"btn btn-secondary\">Go</a></div>\n</body>",
        );
        std::fs::write(dir.path().join("fleet.html"), &card).unwrap();
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html")
            .with_class_rules(normalize::rules().iter().collect());

        let first = walker.run(&Source::tree(dir.path())).unwrap();
        match &first.records[0].outcome {
            DocumentOutcome::Updated { rewritten, .. } => {
                assert_eq!(rewritten, &vec!["glass_cards", "primary_buttons"])
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let text = std::fs::read_to_string(dir.path().join("fleet.html")).unwrap();
        assert!(text.contains("<div class=\"glass-card\">"));
        assert!(text.contains("class=\"btn btn-primary\""));

        let second = walker.run(&Source::tree(dir.path())).unwrap();
        assert_eq!(second.already_complete, 1);
        assert_eq!(std::fs::read_to_string(dir.path().join("fleet.html")).unwrap(), text);
    }

    #[test]
    fn complete_document_still_takes_class_rules() {
        let dir = corpus(&["a.html"]);
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        Walker::new(&patcher, "html")
            .run(&Source::tree(dir.path()))
            .unwrap();
        let path = dir.path().join("a.html");
        let done = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, done.replace("</body>", "<section class=\"jumbotron\"></section>\n</body>")).unwrap();

        let walker = Walker::new(&patcher, "html")
            .with_class_rules(normalize::rules().iter().collect());
        let summary = walker.run(&Source::tree(dir.path())).unwrap();
        assert_eq!(
            summary.records[0].outcome,
            DocumentOutcome::Updated {
                applied: vec![],
                rewritten: vec!["hero_sections"],
            }
        );
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("<section class=\"hero-section\">"));
    }

    #[test]
    fn missing_anchor_is_recorded_and_the_rest_is_written() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("partial.html"), "<head></head>").unwrap();
        let cat = Catalog::glass();
        let patcher = Patcher::new(&cat);
        let walker = Walker::new(&patcher, "html");

        let summary = walker.run(&Source::tree(dir.path())).unwrap();
        assert_eq!(summary.anchor_not_found, 1);
        match &summary.records[0].outcome {
            DocumentOutcome::AnchorNotFound { applied, missing, .. } => {
                assert_eq!(applied.len(), 4);
                assert_eq!(missing, &vec!["floating_orbs", "navbar_glass"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let text = std::fs::read_to_string(dir.path().join("partial.html")).unwrap();
        assert!(text.contains("--gradient-1"));
    }

    #[test]
    fn summary_serializes_with_outcome_tag() {
        let mut summary = RunSummary::default();
        summary.push(DocumentRecord {
            document: "a.html".into(),
            outcome: DocumentOutcome::AlreadyComplete,
        });
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["already_complete"], 1);
        assert_eq!(json["records"][0]["outcome"], "already_complete");
        assert_eq!(json["records"][0]["document"], "a.html");
    }
}
