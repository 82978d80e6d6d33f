//! Retrospective → knowledge item pipeline.
//!
//! 1. [`extract_raw_learnings`] walks the retro body and collects bullets,
//!    remembering the enclosing `## section` and `### agent` headings.
//! 2. Each learning is classified independently (see [`crate::dimensions`]).
//! 3. [`transform_learnings`] mints sequential `K-NNN` ids and builds items.
//!
//! No I/O happens here. Callers supply the ids already on disk and the clock.

use crate::dimensions::{
    assess_confidence, assess_scope, extract_tags, suggest_dimension, suggest_domain,
};
use crate::knowledge::KnowledgeItem;
use crate::story::timestamp;
use crate::types::Scope;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

const TITLE_CHARS: usize = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLearning {
    pub text: String,
    /// Heading of the `##` section the bullet sits under (empty before any).
    pub section: String,
    /// `###` sub-heading, read as the reporting agent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionContext {
    pub story_id: String,
    pub repo_name: String,
    /// Author recorded when a learning has no agent sub-heading.
    pub author: String,
    /// Knowledge ids already persisted, used to continue the sequence.
    pub existing_ids: Vec<String>,
}

// ---------------------------------------------------------------------------
// Stage 1: bullets
// ---------------------------------------------------------------------------

pub fn extract_raw_learnings(body: &str) -> Vec<RawLearning> {
    let mut learnings = Vec::new();
    let mut section = String::new();
    let mut agent = String::new();

    for line in body.lines() {
        let trimmed = line.trim();

        if let Some(heading) = trimmed.strip_prefix("## ") {
            section = heading.trim().to_string();
            agent.clear();
            continue;
        }
        if let Some(heading) = trimmed.strip_prefix("### ") {
            agent = heading.trim().to_string();
            continue;
        }

        // Bullets need at least a few characters of content to count.
        if !(trimmed.starts_with("- ") && trimmed.chars().count() > 4) {
            continue;
        }
        let text = trimmed[2..].trim();
        if text.is_empty() || is_placeholder(text) {
            continue;
        }

        learnings.push(RawLearning {
            text: text.to_string(),
            section: section.clone(),
            agent: (!agent.is_empty()).then(|| agent.clone()),
        });
    }

    learnings
}

/// Unfilled template text such as `[Effective patterns, smooth workflows]`.
fn is_placeholder(text: &str) -> bool {
    text.starts_with('[') && text.ends_with(']')
}

// ---------------------------------------------------------------------------
// Stage 3: ids
// ---------------------------------------------------------------------------

static KNOWLEDGE_ID_RE: OnceLock<Regex> = OnceLock::new();

fn knowledge_id_re() -> &'static Regex {
    KNOWLEDGE_ID_RE.get_or_init(|| Regex::new(r"K-(\d+)").unwrap())
}

/// Numeric part of a knowledge id, if it has one.
pub fn knowledge_number(id: &str) -> Option<u64> {
    knowledge_id_re()
        .captures(id)
        .and_then(|c| c[1].parse().ok())
}

/// One past the largest `K-NNN` in `used`, zero-padded to three digits.
pub fn next_knowledge_id<S: AsRef<str>>(used: &[S]) -> String {
    let max = used
        .iter()
        .filter_map(|id| knowledge_number(id.as_ref()))
        .max()
        .unwrap_or(0);
    format!("K-{:03}", max + 1)
}

// ---------------------------------------------------------------------------
// Stages 2 + 3: classification and construction
// ---------------------------------------------------------------------------

pub fn transform_learnings(
    learnings: &[RawLearning],
    ctx: &ExtractionContext,
    now: DateTime<Utc>,
) -> Vec<KnowledgeItem> {
    let created = timestamp(now);
    let mut used = ctx.existing_ids.clone();
    let mut items = Vec::with_capacity(learnings.len());

    for learning in learnings {
        let id = next_knowledge_id(&used);
        used.push(id.clone());

        let text = learning.text.as_str();
        let scope = assess_scope(text);

        items.push(KnowledgeItem {
            id,
            source_story: ctx.story_id.clone(),
            source_repo: ctx.repo_name.clone(),
            created: created.clone(),
            author: learning
                .agent
                .clone()
                .unwrap_or_else(|| ctx.author.clone()),
            dimension: suggest_dimension(text),
            scope,
            hoistable: scope != Scope::Repo,
            hoisted_to: None,
            hoisted_at: None,
            confidence: assess_confidence(text),
            tags: extract_tags(text),
            domain: suggest_domain(text),
            title: text.chars().take(TITLE_CHARS).collect(),
            description: learning.text.clone(),
            context: format!(
                "From {} section of {} retrospective",
                learning.section, ctx.story_id
            ),
            recommendation: learning.text.clone(),
            supersedes: None,
            ttl: None,
        });
    }

    items
}

/// Full pipeline: retro body in, knowledge items out.
pub fn extract_knowledge(
    retro_body: &str,
    ctx: &ExtractionContext,
    now: DateTime<Utc>,
) -> Vec<KnowledgeItem> {
    let learnings = extract_raw_learnings(retro_body);
    transform_learnings(&learnings, ctx, now)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
