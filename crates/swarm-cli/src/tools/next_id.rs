use super::{optional_str, resolve_path, SwarmTool};
use std::path::Path;
use swarm_core::ops::{self, OpResult};
use swarm_core::paths;

pub struct NextIdTool;

impl SwarmTool for NextIdTool {
    fn name(&self) -> &str {
        "swarm_next_id"
    }

    fn description(&self) -> &str {
        "Mint the next story id and bump the counter in the project config"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "config_path": {
                    "type": "string",
                    "description": "Config file (default: .swarm/config.md)"
                }
            }
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let path = match optional_str(&args, "config_path") {
            Some(p) => resolve_path(root, p),
            None => paths::config_path(root),
        };
        ops::next_id(&path)
    }
}
