use crate::error::{Result, SwarmError};
use crate::frontmatter;
use crate::validate::validate_config;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::path::Path;

// ---------------------------------------------------------------------------
// WaysOfWorking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaysOfWorking {
    #[serde(default = "default_testing")]
    pub testing: String,
    #[serde(default = "default_review")]
    pub review: String,
    #[serde(default = "default_documentation")]
    pub documentation: String,
    #[serde(default = "default_effort_model")]
    pub effort_model: String,
    #[serde(default = "default_max_parallel_agents")]
    pub max_parallel_agents: u32,
    #[serde(default = "default_true")]
    pub auto_verify: bool,
    #[serde(default = "default_true")]
    pub knowledge_extraction: bool,
    #[serde(default)]
    pub knowledge_auto_hoist: bool,
}

fn default_testing() -> String {
    "test-first".to_string()
}

fn default_review() -> String {
    "required".to_string()
}

fn default_documentation() -> String {
    "standard".to_string()
}

fn default_effort_model() -> String {
    "tshirt".to_string()
}

fn default_max_parallel_agents() -> u32 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for WaysOfWorking {
    fn default() -> Self {
        Self {
            testing: default_testing(),
            review: default_review(),
            documentation: default_documentation(),
            effort_model: default_effort_model(),
            max_parallel_agents: default_max_parallel_agents(),
            auto_verify: true,
            knowledge_extraction: true,
            knowledge_auto_hoist: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoReference {
    pub path: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

/// Where this project sits in the knowledge consolidation chain:
/// worker (repo) → scout (team) → queen (department) → hive mind (enterprise).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "kebab-case")]
pub enum Hierarchy {
    Worker {
        repo: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        team: Option<String>,
    },
    Scout {
        team: String,
        #[serde(default)]
        repos: Vec<RepoReference>,
        schedule: String,
        knowledge_dir: String,
    },
    Queen {
        department: String,
        #[serde(default)]
        teams: Vec<String>,
        schedule: String,
    },
    HiveMind {
        #[serde(default)]
        departments: Vec<String>,
        schedule: String,
    },
}

impl Hierarchy {
    pub fn label(&self) -> &'static str {
        match self {
            Hierarchy::Worker { .. } => "Worker",
            Hierarchy::Scout { .. } => "Scout",
            Hierarchy::Queen { .. } => "Queen",
            Hierarchy::HiveMind { .. } => "Hive Mind",
        }
    }
}

// ---------------------------------------------------------------------------
// SwarmConfig
// ---------------------------------------------------------------------------

/// Header of `.swarm/config.md`. Unknown keys are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmConfig {
    #[serde(default)]
    pub project: String,
    pub prefix: String,
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub definition_of_ready: Vec<String>,
    #[serde(default)]
    pub definition_of_done: Vec<String>,
    #[serde(default)]
    pub ways_of_working: WaysOfWorking,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Hierarchy>,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl SwarmConfig {
    pub fn new(project: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            prefix: prefix.into(),
            counter: 0,
            definition_of_ready: Vec::new(),
            definition_of_done: Vec::new(),
            ways_of_working: WaysOfWorking::default(),
            hierarchy: None,
            extra: Mapping::new(),
        }
    }

    /// Bump the counter and return the story id it now names.
    pub fn next_story_id(&mut self) -> String {
        bump_story_id(&self.prefix, &mut self.counter)
    }
}

/// `{prefix}-{NNN}` for `counter + 1`, storing the new value in `counter`.
/// Numbers past 999 are not truncated.
pub fn bump_story_id(prefix: &str, counter: &mut u64) -> String {
    *counter += 1;
    format!("{prefix}-{:03}", *counter)
}

/// A loaded config record: typed header plus the markdown body, which is
/// written back untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub config: SwarmConfig,
    pub body: String,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SwarmError::FileNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        let doc = frontmatter::parse(&text)
            .ok_or_else(|| SwarmError::MissingFrontmatter(path.display().to_string()))?;
        let check = validate_config(&doc.header);
        if !check.valid {
            return Err(SwarmError::InvalidConfig(check.details().join("; ")));
        }
        Ok(Self {
            config: doc.decode()?,
            body: doc.body,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
