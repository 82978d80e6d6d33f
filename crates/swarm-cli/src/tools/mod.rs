use serde_json::Value;
use std::path::{Path, PathBuf};
use swarm_core::ops::{CommandFailure, OpResult};

pub mod extract_knowledge;
pub mod list;
pub mod next_id;
pub mod status;
pub mod transition;
pub mod update_criterion;
pub mod update_task;
pub mod validate;

pub trait SwarmTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn schema(&self) -> Value;
    fn call(&self, args: Value, root: &Path) -> OpResult;
}

pub fn all_tools() -> Vec<Box<dyn SwarmTool>> {
    vec![
        Box::new(validate::ValidateTool),
        Box::new(transition::TransitionTool),
        Box::new(next_id::NextIdTool),
        Box::new(list::ListTool),
        Box::new(extract_knowledge::ExtractKnowledgeTool),
        Box::new(update_task::UpdateTaskTool),
        Box::new(update_criterion::UpdateCriterionTool),
        Box::new(status::StatusTool),
    ]
}

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, CommandFailure> {
    args[key]
        .as_str()
        .ok_or_else(|| CommandFailure::new(format!("missing required argument: {key}")))
}

pub(crate) fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args[key].as_str()
}

/// Relative paths are taken relative to the project root, not the server's cwd.
pub(crate) fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}
