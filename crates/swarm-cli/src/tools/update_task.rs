use super::{required_str, resolve_path, SwarmTool};
use chrono::Utc;
use std::path::Path;
use swarm_core::ops::{self, OpResult};

pub struct UpdateTaskTool;

impl SwarmTool for UpdateTaskTool {
    fn name(&self) -> &str {
        "swarm_update_task"
    }

    fn description(&self) -> &str {
        "Set the status of one task on a story (pending, in_progress, done, skipped)"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Story file, relative to the project root"
                },
                "task_id": {
                    "type": "string",
                    "description": "Task id (e.g. T-1)"
                },
                "status": {
                    "type": "string",
                    "description": "New task status"
                }
            },
            "required": ["path", "task_id", "status"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let path = required_str(&args, "path")?;
        let task_id = required_str(&args, "task_id")?;
        let status = required_str(&args, "status")?;
        ops::update_task_file(&resolve_path(root, path), task_id, status, Utc::now())
    }
}
