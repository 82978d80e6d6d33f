//! Structural validation of untyped record headers.
//!
//! Every validator collects all violations in one pass and never fails:
//! callers always get a complete [`ValidationResult`].

use crate::types::{
    Complexity, Confidence, CriterionStatus, Dimension, Domain, Priority, Scope, StoryStatus,
    TaskStatus,
};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `field: message` lines, in the order the errors were found.
    pub fn details(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

/// Accumulates violations against one mapping, prefixing field paths.
struct Checker<'m, 'e> {
    map: Option<&'m Mapping>,
    prefix: String,
    errors: &'e mut Vec<ValidationError>,
}

impl<'m> Checker<'m, '_> {
    fn get(&self, key: &str) -> Option<&'m Value> {
        self.map.and_then(|m| m.get(key))
    }

    fn fail(&mut self, key: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: format!("{}{}", self.prefix, key),
            message: message.into(),
        });
    }

    fn string(&mut self, key: &str) {
        if !matches!(self.get(key), Some(Value::String(_))) {
            self.fail(key, "must be a string");
        }
    }

    fn array(&mut self, key: &str) {
        if !matches!(self.get(key), Some(Value::Sequence(_))) {
            self.fail(key, "must be an array");
        }
    }

    fn boolean(&mut self, key: &str) {
        if !matches!(self.get(key), Some(Value::Bool(_))) {
            self.fail(key, "must be a boolean");
        }
    }

    fn one_of(&mut self, key: &str, allowed: &[&str]) {
        let ok = self
            .get(key)
            .and_then(Value::as_str)
            .map(|s| allowed.contains(&s))
            .unwrap_or(false);
        if !ok {
            self.fail(key, format!("must be one of: {}", allowed.join(", ")));
        }
    }

    /// An optional sequence: absent is fine, present-but-not-a-sequence is not.
    fn optional_array(&mut self, key: &str) -> Option<&'m Vec<Value>> {
        match self.get(key) {
            None => None,
            Some(Value::Sequence(items)) => Some(items),
            Some(_) => {
                self.fail(key, "must be an array");
                None
            }
        }
    }
}

fn names<T: Copy>(all: &[T], as_str: fn(T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(|v| as_str(*v)).collect()
}

// ---------------------------------------------------------------------------
// Story
// ---------------------------------------------------------------------------

pub fn validate_story(meta: &Mapping) -> ValidationResult {
    let mut errors = Vec::new();
    let mut c = Checker {
        map: Some(meta),
        prefix: String::new(),
        errors: &mut errors,
    };

    c.string("id");
    c.string("title");
    c.one_of("status", &names(StoryStatus::all(), StoryStatus::as_str));
    c.one_of("priority", &names(Priority::all(), Priority::as_str));
    c.one_of("complexity", &names(Complexity::all(), Complexity::as_str));
    c.string("created");
    c.string("updated");
    c.string("author");
    c.array("tags");

    let criteria = c.optional_array("acceptance_criteria");
    let tasks = c.optional_array("tasks");

    let ac_statuses = names(CriterionStatus::all(), CriterionStatus::as_str);
    for (i, ac) in criteria.into_iter().flatten().enumerate() {
        let mut c = Checker {
            map: ac.as_mapping(),
            prefix: format!("acceptance_criteria[{i}]."),
            errors: &mut errors,
        };
        c.string("id");
        c.one_of("status", &ac_statuses);
    }

    let task_statuses = names(TaskStatus::all(), TaskStatus::as_str);
    for (i, task) in tasks.into_iter().flatten().enumerate() {
        let mut c = Checker {
            map: task.as_mapping(),
            prefix: format!("tasks[{i}]."),
            errors: &mut errors,
        };
        c.string("id");
        c.one_of("status", &task_statuses);
    }

    ValidationResult::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Knowledge item
// ---------------------------------------------------------------------------

pub fn validate_knowledge(meta: &Mapping) -> ValidationResult {
    let mut errors = Vec::new();
    let mut c = Checker {
        map: Some(meta),
        prefix: String::new(),
        errors: &mut errors,
    };

    c.string("id");
    c.string("source_story");
    c.string("source_repo");
    c.string("created");
    c.string("author");
    c.one_of("dimension", &names(Dimension::all(), Dimension::as_str));
    c.one_of("scope", &names(Scope::all(), Scope::as_str));
    c.boolean("hoistable");
    c.one_of("confidence", &names(Confidence::all(), Confidence::as_str));
    c.array("tags");
    c.one_of("domain", &names(Domain::all(), Domain::as_str));
    c.string("title");

    ValidationResult::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Retrospective
// ---------------------------------------------------------------------------

pub fn validate_retro(meta: &Mapping) -> ValidationResult {
    let mut errors = Vec::new();
    let mut c = Checker {
        map: Some(meta),
        prefix: String::new(),
        errors: &mut errors,
    };

    c.string("story_id");
    c.string("title");
    c.string("completed");
    c.string("duration");
    c.array("agents_involved");

    ValidationResult::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Project config
// ---------------------------------------------------------------------------

pub fn validate_config(meta: &Mapping) -> ValidationResult {
    let mut errors = Vec::new();
    let mut c = Checker {
        map: Some(meta),
        prefix: String::new(),
        errors: &mut errors,
    };

    c.string("prefix");
    match c.get("counter") {
        None | Some(Value::Null) => {}
        Some(v) if v.as_u64().is_some() => {}
        Some(_) => c.fail("counter", "must be a non-negative integer"),
    }
    c.optional_array("definition_of_ready");
    c.optional_array("definition_of_done");

    ValidationResult::from_errors(errors)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn map(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    const VALID_STORY: &str = "\
id: TEST-001
title: Test Story
status: ideating
priority: medium
complexity: moderate
created: '2026-01-01'
updated: '2026-01-01'
author: claude
tags: []
acceptance_criteria:
  - id: AC-1
    description: Test AC
    status: pending
    evidence: ''
tasks:
  - id: T-1
    title: Task 1
    agent: backend-dev
    status: done
    depends_on: []
why:
  problem: Test problem
";

    #[test]
    fn valid_story_passes() {
        let result = validate_story(&map(VALID_STORY));
        assert!(result.valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn reports_every_missing_field_at_once() {
        let result = validate_story(&map("priority: high\ncomplexity: simple\n"));
        assert!(!result.valid);
        for field in ["id", "title", "status", "created", "updated", "author", "tags"] {
            assert!(result.has_error_for(field), "missing error for {field}");
        }
        assert!(!result.has_error_for("priority"));
    }

    #[test]
    fn empty_mapping_reports_all_required_fields() {
        let result = validate_story(&Mapping::new());
        assert_eq!(result.errors.len(), 9);
    }

    #[test]
    fn wrong_types_and_enums() {
        let yaml = VALID_STORY
            .replace("id: TEST-001", "id: 42")
            .replace("status: ideating", "status: shipped")
            .replace("tags: []", "tags: backend");
        let result = validate_story(&map(&yaml));
        assert_eq!(
            result.errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
            vec!["id", "status", "tags"]
        );
        let status = &result.errors[1];
        assert_eq!(
            status.message,
            "must be one of: draft, ideating, planned, executing, verifying, done, archived, awaiting_input"
        );
    }

    #[test]
    fn nested_entries_use_indexed_paths() {
        let yaml = "\
id: X
title: X
status: draft
priority: low
complexity: epic
created: a
updated: b
author: c
tags: []
acceptance_criteria:
  - id: AC-1
    status: passing
  - status: passed
tasks:
  - id: T-1
    status: pending
  - id: T-2
    status: pending
  - id: T-3
    status: blocked
  - just a string
";
        let result = validate_story(&map(yaml));
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "acceptance_criteria[1].id",
                "acceptance_criteria[1].status",
                "tasks[2].status",
                "tasks[3].id",
                "tasks[3].status",
            ]
        );
        assert_eq!(
            result.errors[2].to_string(),
            "tasks[2].status: must be one of: pending, in_progress, done, skipped"
        );
    }

    #[test]
    fn non_sequence_criteria_and_tasks_are_reported() {
        let mut meta = map(VALID_STORY);
        meta.insert("tasks".into(), "none".into());
        meta.insert("acceptance_criteria".into(), Value::Null);
        let result = validate_story(&meta);
        assert!(result.has_error_for("tasks"));
        assert!(result.has_error_for("acceptance_criteria"));
    }

    #[test]
    fn missing_criteria_and_tasks_are_allowed() {
        let mut meta = map(VALID_STORY);
        meta.remove("tasks");
        meta.remove("acceptance_criteria");
        assert!(validate_story(&meta).valid);
    }

    #[test]
    fn knowledge_item_validation() {
        let valid = "\
id: K-001
source_story: PROJ-001
source_repo: api
created: '2026-01-01T00:00:00.000Z'
author: backend-dev
dimension: qualia
scope: team
hoistable: true
confidence: medium
tags: [sql]
domain: backend
title: SQLite needs explicit casts
";
        assert!(validate_knowledge(&map(valid)).valid);

        let bad = valid
            .replace("dimension: qualia", "dimension: pain")
            .replace("hoistable: true", "hoistable: 'yes'")
            .replace("domain: backend", "domain: mobile");
        let result = validate_knowledge(&map(&bad));
        assert_eq!(result.errors.len(), 3);
        assert!(result.has_error_for("dimension"));
        assert!(result.has_error_for("hoistable"));
        assert!(result.has_error_for("domain"));
    }

    #[test]
    fn retro_validation() {
        let valid = "story_id: P-1\ntitle: Retro\ncompleted: '2026-01-05'\nduration: 2d\nagents_involved: [backend-dev]\n";
        assert!(validate_retro(&map(valid)).valid);

        let result = validate_retro(&map("title: Retro\nagents_involved: backend-dev\n"));
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["story_id", "completed", "duration", "agents_involved"]);
    }

    #[test]
    fn config_validation() {
        assert!(validate_config(&map("project: demo\nprefix: DEMO\ncounter: 4\n")).valid);
        assert!(validate_config(&map("prefix: DEMO\n")).valid);

        let result = validate_config(&map("counter: -1\ndefinition_of_done: done\n"));
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["prefix", "counter", "definition_of_done"]);
    }
}
