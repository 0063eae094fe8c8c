use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlazeError {
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("unknown class rule: {0}")]
    UnknownClassRule(String),

    #[error("template directory not found: {}", .0.display())]
    TemplateDirNotFound(PathBuf),

    #[error("manifest not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GlazeError>;
