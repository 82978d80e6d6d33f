use crate::output::emit;
use chrono::Utc;
use std::path::Path;
use swarm_core::ops;

/// Knowledge files land under `root`, wherever the retro itself lives.
pub fn extract(
    root: &Path,
    retro: &Path,
    story_id: Option<&str>,
    repo: Option<&str>,
    author: &str,
) -> anyhow::Result<()> {
    tracing::debug!(root = %root.display(), retro = %retro.display(), "extracting knowledge");
    emit(ops::extract_knowledge_file(
        root,
        retro,
        story_id,
        repo,
        author,
        Utc::now(),
    ))
}
