use thiserror::Error;

#[derive(Debug, Error)]
pub enum SwarmError {
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("no valid frontmatter in {0}")]
    MissingFrontmatter(String),

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error("invalid story id '{0}': must be a single path component")]
    InvalidStoryId(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("acceptance criterion not found: {0}")]
    CriterionNotFound(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("header must serialize to a mapping")]
    HeaderNotMapping,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, SwarmError>;
