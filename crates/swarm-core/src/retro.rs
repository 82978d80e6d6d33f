use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeReference {
    pub id: String,
    pub dimension: String,
    pub title: String,
}

/// Header of a retrospective file. The body carries the `## Section` /
/// `### agent` bullet lists that knowledge extraction reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetroMeta {
    pub story_id: String,
    pub title: String,
    pub completed: String,
    pub duration: String,
    #[serde(default)]
    pub agents_involved: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default)]
    pub knowledge_extracted: Vec<KnowledgeReference>,
}
