use super::{optional_str, required_str, resolve_path, SwarmTool};
use chrono::Utc;
use std::path::Path;
use swarm_core::ops::{self, OpResult};

pub struct UpdateCriterionTool;

impl SwarmTool for UpdateCriterionTool {
    fn name(&self) -> &str {
        "swarm_update_criterion"
    }

    fn description(&self) -> &str {
        "Set the status of one acceptance criterion on a story, optionally recording evidence"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Story file, relative to the project root"
                },
                "criterion_id": {
                    "type": "string",
                    "description": "Acceptance criterion id (e.g. AC-1)"
                },
                "status": {
                    "type": "string",
                    "description": "pending, passing or failing"
                },
                "evidence": {
                    "type": "string",
                    "description": "Evidence that replaces the recorded evidence"
                }
            },
            "required": ["path", "criterion_id", "status"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let path = required_str(&args, "path")?;
        let criterion_id = required_str(&args, "criterion_id")?;
        let status = required_str(&args, "status")?;
        ops::update_criterion_file(
            &resolve_path(root, path),
            criterion_id,
            status,
            optional_str(&args, "evidence"),
            Utc::now(),
        )
    }
}
