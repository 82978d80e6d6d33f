use super::{required_str, resolve_path, SwarmTool};
use std::path::Path;
use swarm_core::ops::{self, OpResult};

pub struct ValidateTool;

impl SwarmTool for ValidateTool {
    fn name(&self) -> &str {
        "swarm_validate"
    }

    fn description(&self) -> &str {
        "Validate a story file's header and report AC and task counts"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Story file, relative to the project root"
                }
            },
            "required": ["path"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let path = required_str(&args, "path")?;
        ops::validate_story_file(&resolve_path(root, path))
    }
}
