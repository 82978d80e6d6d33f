use crate::output::emit;
use chrono::Utc;
use std::path::Path;
use swarm_core::ops;

pub fn validate(story: &Path) -> anyhow::Result<()> {
    emit(ops::validate_story_file(story))
}

pub fn transition(story: &Path, status: &str, apply: bool) -> anyhow::Result<()> {
    emit(ops::transition_story_file(story, status, apply, Utc::now()))
}

pub fn task(story: &Path, task_id: &str, status: &str) -> anyhow::Result<()> {
    emit(ops::update_task_file(story, task_id, status, Utc::now()))
}

pub fn criterion(
    story: &Path,
    criterion_id: &str,
    status: &str,
    evidence: Option<&str>,
) -> anyhow::Result<()> {
    emit(ops::update_criterion_file(
        story,
        criterion_id,
        status,
        evidence,
        Utc::now(),
    ))
}
