use super::{optional_str, required_str, resolve_path, SwarmTool};
use std::path::Path;
use swarm_core::ops::{self, OpResult};

pub struct ListTool;

impl SwarmTool for ListTool {
    fn name(&self) -> &str {
        "swarm_list"
    }

    fn description(&self) -> &str {
        "List records (id, title, status, file) in a directory, optionally filtered by status"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "dir": {
                    "type": "string",
                    "description": "Directory, relative to the project root (e.g. .swarm/backlog)"
                },
                "status": {
                    "type": "string",
                    "description": "Only records with this status"
                }
            },
            "required": ["dir"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let dir = required_str(&args, "dir")?;
        ops::list_records(&resolve_path(root, dir), optional_str(&args, "status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lists_backlog_with_filter() {
        let dir = TempDir::new().unwrap();
        let backlog = dir.path().join(".swarm/backlog");
        std::fs::create_dir_all(&backlog).unwrap();
        std::fs::write(backlog.join("A-1.md"), "---\nid: A-1\nstatus: draft\n---\n").unwrap();
        std::fs::write(backlog.join("A-2.md"), "---\nid: A-2\nstatus: done\n---\n").unwrap();

        let out = ListTool
            .call(
                serde_json::json!({ "dir": ".swarm/backlog", "status": "done" }),
                dir.path(),
            )
            .unwrap();
        assert_eq!(out["count"], 1);
        assert_eq!(out["items"][0]["id"], "A-2");
    }
}
