use crate::output::emit;
use std::path::Path;
use swarm_core::{ops, paths};

pub fn next_id(root: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let path = match config {
        Some(p) => p.to_path_buf(),
        None => paths::config_path(root),
    };
    emit(ops::next_id(&path))
}

pub fn list(dir: &Path, status: Option<&str>) -> anyhow::Result<()> {
    emit(ops::list_records(dir, status))
}

pub fn status(root: &Path) -> anyhow::Result<()> {
    emit(ops::project_status(root))
}
