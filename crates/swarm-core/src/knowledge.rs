use crate::error::Result;
use crate::frontmatter::{self, Document};
use crate::types::{Confidence, Dimension, Domain, Scope};
use serde::{Deserialize, Serialize};

/// Fields kept in the body rather than the header when a knowledge item is
/// written to disk.
const BODY_FIELDS: [&str; 3] = ["description", "context", "recommendation"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub source_story: String,
    pub source_repo: String,
    pub created: String,
    pub author: String,
    pub dimension: Dimension,
    pub scope: Scope,
    pub hoistable: bool,
    /// Set by the external hoisting process.
    #[serde(default)]
    pub hoisted_to: Option<String>,
    #[serde(default)]
    pub hoisted_at: Option<String>,
    pub confidence: Confidence,
    #[serde(default)]
    pub tags: Vec<String>,
    pub domain: Domain,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub supersedes: Option<String>,
    /// Optional expiry as an ISO 8601 duration.
    #[serde(default)]
    pub ttl: Option<String>,
}

impl KnowledgeItem {
    /// Header + markdown body as persisted under `.swarm/knowledge/`.
    pub fn to_document(&self) -> Result<Document> {
        let mut header = frontmatter::to_mapping(self)?;
        for key in BODY_FIELDS {
            header.remove(key);
        }
        Ok(Document::new(header, self.render_body()))
    }

    pub fn to_text(&self) -> Result<String> {
        self.to_document()?.to_text()
    }

    fn render_body(&self) -> String {
        format!(
            "\n# {title}\n\n## Context\n\n{context}\n\n## Description\n\n{description}\n\n## Recommendation\n\n{recommendation}\n\n## Evidence\n\n- Source story: `{story}`\n- Discovered by: {author}\n- Confidence: {confidence}\n",
            title = self.title,
            context = self.context,
            description = self.description,
            recommendation = self.recommendation,
            story = self.source_story,
            author = self.author,
            confidence = self.confidence,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
