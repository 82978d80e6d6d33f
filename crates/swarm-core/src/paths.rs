use crate::error::{Result, SwarmError};
use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const SWARM_DIR: &str = ".swarm";
pub const BACKLOG_DIR: &str = ".swarm/backlog";
pub const ARCHIVE_DIR: &str = ".swarm/archive";
pub const RETROSPECTIVES_DIR: &str = ".swarm/retrospectives";
pub const KNOWLEDGE_DIR: &str = ".swarm/knowledge";
pub const TEMPLATES_DIR: &str = ".swarm/templates";

pub const CONFIG_FILE: &str = ".swarm/config.md";
pub const STORY_TEMPLATE: &str = ".swarm/templates/story.md";
pub const DEFINITION_OF_READY: &str = ".swarm/definition-of-ready.yaml";
pub const DEFINITION_OF_DONE: &str = ".swarm/definition-of-done.yaml";
pub const WAYS_OF_WORKING: &str = ".swarm/ways-of-working.yaml";

/// Everything an initialized project is expected to have, in report order.
pub const LAYOUT: &[&str] = &[
    CONFIG_FILE,
    BACKLOG_DIR,
    ARCHIVE_DIR,
    RETROSPECTIVES_DIR,
    KNOWLEDGE_DIR,
    STORY_TEMPLATE,
    DEFINITION_OF_READY,
    DEFINITION_OF_DONE,
    WAYS_OF_WORKING,
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn swarm_dir(root: &Path) -> PathBuf {
    root.join(SWARM_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn knowledge_dir(root: &Path) -> PathBuf {
    root.join(KNOWLEDGE_DIR)
}

pub fn backlog_dir(root: &Path) -> PathBuf {
    root.join(BACKLOG_DIR)
}

/// Story ids name files, so they must be one plain path component.
pub fn validate_story_id(story_id: &str) -> Result<()> {
    let mut components = Path::new(story_id).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || story_id.contains(|c| c == '/' || c == '\\') || story_id.contains("..") {
        return Err(SwarmError::InvalidStoryId(story_id.to_string()));
    }
    Ok(())
}

/// `.swarm/knowledge/{story_id}-{n}.md`, `n` counting from 1.
pub fn knowledge_file(root: &Path, story_id: &str, n: usize) -> PathBuf {
    knowledge_dir(root).join(format!("{story_id}-{n}.md"))
}

/// `path` relative to `root` with forward slashes, or `path` as given when it
/// does not live under `root`.
pub fn relative_display(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
