use crate::error::{Result, SwarmError};
use crate::types::{Complexity, CriterionStatus, Priority, StoryStatus, TaskStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// RFC 3339 with millisecond precision, the format every record timestamp uses.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Nested structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub status: CriterionStatus,
    #[serde(default)]
    pub evidence: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryTask {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub agent: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub effort_estimate: String,
    #[serde(default)]
    pub ac_coverage: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub task_list_id: Option<String>,
    #[serde(default)]
    pub session_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Why {
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub root_cause: String,
    #[serde(default)]
    pub impact: String,
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

/// Typed story header. Keys this struct does not know about are carried in
/// `extra` so a load/save cycle does not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub status: StoryStatus,
    pub priority: Priority,
    pub complexity: Complexity,
    pub created: String,
    pub updated: String,
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<AcceptanceCriterion>,
    #[serde(default)]
    pub tasks: Vec<StoryTask>,
    #[serde(default)]
    pub execution: Execution,
    #[serde(default)]
    pub why: Why,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Story {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let now = timestamp(now);
        Self {
            id: id.into(),
            title: title.into(),
            status: StoryStatus::Draft,
            priority: Priority::Medium,
            complexity: Complexity::Moderate,
            created: now.clone(),
            updated: now,
            author: author.into(),
            tags: Vec::new(),
            acceptance_criteria: Vec::new(),
            tasks: Vec::new(),
            execution: Execution::default(),
            why: Why::default(),
            extra: Mapping::new(),
        }
    }

    pub fn from_header(header: &Mapping) -> Result<Self> {
        Ok(serde_yaml::from_value(serde_yaml::Value::Mapping(
            header.clone(),
        ))?)
    }

    pub fn to_header(&self) -> Result<Mapping> {
        crate::frontmatter::to_mapping(self)
    }

    // -----------------------------------------------------------------------
    // Entry updates
    // -----------------------------------------------------------------------

    pub fn set_task_status(
        &mut self,
        id: &str,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| SwarmError::TaskNotFound(id.to_string()))?;
        task.status = status;
        self.updated = timestamp(now);
        Ok(())
    }

    /// Update a criterion's status. `evidence`, when given, replaces the
    /// recorded evidence; otherwise the existing evidence is kept.
    pub fn set_criterion_status(
        &mut self,
        id: &str,
        status: CriterionStatus,
        evidence: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let ac = self
            .acceptance_criteria
            .iter_mut()
            .find(|ac| ac.id == id)
            .ok_or_else(|| SwarmError::CriterionNotFound(id.to_string()))?;
        ac.status = status;
        if let Some(evidence) = evidence {
            ac.evidence = evidence.to_string();
        }
        self.updated = timestamp(now);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Summaries
    // -----------------------------------------------------------------------

    pub fn ac_summary(&self) -> AcSummary {
        let count = |s: CriterionStatus| {
            self.acceptance_criteria
                .iter()
                .filter(|ac| ac.status == s)
                .count()
        };
        AcSummary {
            total: self.acceptance_criteria.len(),
            passing: count(CriterionStatus::Passing),
            failing: count(CriterionStatus::Failing),
            pending: count(CriterionStatus::Pending),
        }
    }

    pub fn task_summary(&self) -> TaskSummary {
        let count = |s: TaskStatus| self.tasks.iter().filter(|t| t.status == s).count();
        TaskSummary {
            total: self.tasks.len(),
            done: count(TaskStatus::Done),
            in_progress: count(TaskStatus::InProgress),
            pending: count(TaskStatus::Pending),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcSummary {
    pub total: usize,
    pub passing: usize,
    pub failing: usize,
    pub pending: usize,
}

/// Skipped tasks count toward `total` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total: usize,
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
