//! Story lifecycle: a fixed transition graph plus per-target preconditions.
//!
//! [`can_transition`] answers "is this edge in the graph". [`validate_transition`]
//! additionally applies the Definition-of-Ready / Definition-of-Done guard for
//! the target state, returning the first unmet condition.

use crate::error::{Result, SwarmError};
use crate::story::{timestamp, Story};
use crate::types::{CriterionStatus, StoryStatus, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TransitionResult {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Transition graph
// ---------------------------------------------------------------------------

/// Legal targets from `from`. `Archived` has none.
pub fn valid_targets(from: StoryStatus) -> &'static [StoryStatus] {
    use StoryStatus::*;
    match from {
        Draft => &[Ideating],
        Ideating => &[Planned, AwaitingInput],
        Planned => &[Executing, AwaitingInput],
        Executing => &[Verifying, Done],
        Verifying => &[Done, Executing],
        Done => &[Archived],
        Archived => &[],
        AwaitingInput => &[Ideating, Planned],
    }
}

pub fn can_transition(from: StoryStatus, to: StoryStatus) -> TransitionResult {
    let targets = valid_targets(from);
    if targets.contains(&to) {
        return TransitionResult::allow();
    }
    let listed = if targets.is_empty() {
        "none".to_string()
    } else {
        targets
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    TransitionResult::deny(format!(
        "Cannot transition from '{from}' to '{to}'. Valid targets: {listed}"
    ))
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

pub fn validate_transition(story: &Story, to: StoryStatus) -> TransitionResult {
    let structural = can_transition(story.status, to);
    if !structural.allowed {
        return structural;
    }

    match to {
        StoryStatus::Planned => {
            if story.acceptance_criteria.is_empty() {
                return TransitionResult::deny("Cannot plan: no acceptance criteria defined");
            }
            if story.why.problem.is_empty() {
                return TransitionResult::deny("Cannot plan: problem statement is empty");
            }
            TransitionResult::allow()
        }
        StoryStatus::Executing => {
            if story.tasks.is_empty() {
                return TransitionResult::deny("Cannot execute: no tasks defined");
            }
            TransitionResult::allow()
        }
        StoryStatus::Verifying => {
            let open = story
                .tasks
                .iter()
                .filter(|t| !matches!(t.status, TaskStatus::Done | TaskStatus::Skipped))
                .count();
            if open > 0 {
                return TransitionResult::deny(format!(
                    "Cannot verify: {open} task(s) still in progress"
                ));
            }
            TransitionResult::allow()
        }
        StoryStatus::Done => {
            let not_passing = story
                .acceptance_criteria
                .iter()
                .filter(|ac| ac.status != CriterionStatus::Passing)
                .count();
            if not_passing > 0 {
                return TransitionResult::deny(format!(
                    "Cannot mark done: {not_passing} AC(s) not passing"
                ));
            }
            TransitionResult::allow()
        }
        StoryStatus::Archived => {
            if story.status != StoryStatus::Done {
                return TransitionResult::deny("Cannot archive: story is not done");
            }
            TransitionResult::allow()
        }
        StoryStatus::Draft
        | StoryStatus::Ideating
        | StoryStatus::AwaitingInput => TransitionResult::allow(),
    }
}

// ---------------------------------------------------------------------------
// Applying a transition
// ---------------------------------------------------------------------------

impl Story {
    /// Validate and apply a status change. On failure the story is untouched.
    pub fn apply_transition(&mut self, to: StoryStatus, now: DateTime<Utc>) -> Result<()> {
        let result = validate_transition(self, to);
        if !result.allowed {
            return Err(SwarmError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
                reason: result.reason.unwrap_or_default(),
            });
        }

        let stamp = timestamp(now);
        match to {
            StoryStatus::Executing if self.execution.started_at.is_none() => {
                self.execution.started_at = Some(stamp.clone());
            }
            StoryStatus::Done => {
                self.execution.completed_at = Some(stamp.clone());
            }
            _ => {}
        }
        self.status = to;
        self.updated = stamp;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
