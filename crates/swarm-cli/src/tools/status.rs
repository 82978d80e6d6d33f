use super::SwarmTool;
use std::path::Path;
use swarm_core::ops::{self, OpResult};

pub struct StatusTool;

impl SwarmTool for StatusTool {
    fn name(&self) -> &str {
        "swarm_status"
    }

    fn description(&self) -> &str {
        "Report which parts of the .swarm/ layout exist, with config and backlog summaries"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({ "type": "object", "properties": {} })
    }

    fn call(&self, _args: serde_json::Value, root: &Path) -> OpResult {
        ops::project_status(root)
    }
}
