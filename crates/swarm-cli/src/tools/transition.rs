use super::{required_str, resolve_path, SwarmTool};
use chrono::Utc;
use std::path::Path;
use swarm_core::ops::{self, OpResult};

pub struct TransitionTool;

impl SwarmTool for TransitionTool {
    fn name(&self) -> &str {
        "swarm_transition"
    }

    fn description(&self) -> &str {
        "Check whether a story may move to a status; with apply=true, write the new status"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Story file, relative to the project root"
                },
                "status": {
                    "type": "string",
                    "description": "Target status (e.g. planned, executing, done)"
                },
                "apply": {
                    "type": "boolean",
                    "description": "Persist the transition when it is allowed (default false)"
                }
            },
            "required": ["path", "status"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let path = required_str(&args, "path")?;
        let status = required_str(&args, "status")?;
        let apply = args["apply"].as_bool().unwrap_or(false);
        ops::transition_story_file(&resolve_path(root, path), status, apply, Utc::now())
    }
}
