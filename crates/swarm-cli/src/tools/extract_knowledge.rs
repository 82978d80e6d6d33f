use super::{optional_str, required_str, resolve_path, SwarmTool};
use chrono::Utc;
use std::path::Path;
use swarm_core::ops::{self, OpResult, DEFAULT_AUTHOR};

pub struct ExtractKnowledgeTool;

impl SwarmTool for ExtractKnowledgeTool {
    fn name(&self) -> &str {
        "swarm_extract_knowledge"
    }

    fn description(&self) -> &str {
        "Extract classified knowledge items from a retrospective into .swarm/knowledge/"
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "retro_path": {
                    "type": "string",
                    "description": "Retrospective file, relative to the project root"
                },
                "story_id": {
                    "type": "string",
                    "description": "Source story id (default: story_id in the retro header)"
                },
                "repo": {
                    "type": "string",
                    "description": "Source repository (default: repo in the retro header, else unknown)"
                },
                "author": {
                    "type": "string",
                    "description": "Author for learnings without an agent sub-heading"
                }
            },
            "required": ["retro_path"]
        })
    }

    fn call(&self, args: serde_json::Value, root: &Path) -> OpResult {
        let retro = required_str(&args, "retro_path")?;
        ops::extract_knowledge_file(
            root,
            &resolve_path(root, retro),
            optional_str(&args, "story_id"),
            optional_str(&args, "repo"),
            optional_str(&args, "author").unwrap_or(DEFAULT_AUTHOR),
            Utc::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_under_root() {
        let dir = TempDir::new().unwrap();
        let retros = dir.path().join(".swarm/retrospectives");
        std::fs::create_dir_all(&retros).unwrap();
        std::fs::write(
            retros.join("R.md"),
            "---\nstory_id: R-1\n---\n## What Could Improve\n- Flaky fixture setup in CI\n",
        )
        .unwrap();

        let out = ExtractKnowledgeTool
            .call(
                serde_json::json!({ "retro_path": ".swarm/retrospectives/R.md" }),
                dir.path(),
            )
            .unwrap();
        assert_eq!(out["count"], 1);
        assert!(dir.path().join(".swarm/knowledge/R-1-1.md").exists());

        let text = std::fs::read_to_string(dir.path().join(".swarm/knowledge/R-1-1.md")).unwrap();
        assert!(text.contains("author: swarm-cli"));
        assert!(text.contains("source_repo: unknown"));
    }
}
