use std::path::PathBuf;

use crate::config::ValidationError;

/// Errors produced while loading a site configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Errors produced while assembling the template.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("duplicate logical id '{0}'")]
    DuplicateLogicalId(String),

    #[error("validation failed on resource '{logical_id}': {reason}")]
    InvalidResource { logical_id: String, reason: String },

    #[error("failed to serialize '{logical_id}': {source}")]
    Serialize {
        logical_id: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid viewer request event: {0}")]
    Event(#[source] serde_json::Error),

    #[error("failed to serialize the routed request: {0}")]
    Output(#[source] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
