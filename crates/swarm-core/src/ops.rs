//! Project operations: the file-owning layer behind the CLI and the tool server.
//!
//! Every operation takes explicit paths (never the process cwd) and returns
//! either a JSON payload or a [`CommandFailure`]. [`envelope`] folds both into
//! the `{"ok": ...}` object that callers print.

use crate::config::{bump_story_id, ConfigFile};
use crate::error::SwarmError;
use crate::extract::{extract_knowledge, ExtractionContext};
use crate::frontmatter::{self, Document};
use crate::io;
use crate::lifecycle::{can_transition, validate_transition};
use crate::paths;
use crate::retro::RetroMeta;
use crate::story::Story;
use crate::types::{CriterionStatus, StoryStatus, TaskStatus};
use crate::validate::{validate_story, ValidationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

/// Repo name recorded when neither the caller nor the retro header names one.
pub const UNKNOWN_REPO: &str = "unknown";

/// Author recorded on learnings that carry no agent sub-heading.
pub const DEFAULT_AUTHOR: &str = "swarm-cli";

// ---------------------------------------------------------------------------
// Failure + envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandFailure {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CommandFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(error: impl Into<String>, details: Vec<String>) -> Self {
        Self {
            error: error.into(),
            details,
        }
    }

    fn invalid(error: &str, check: &ValidationResult) -> Self {
        Self::with_details(error, check.details())
    }
}

impl std::fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)?;
        for detail in &self.details {
            write!(f, "\n  - {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CommandFailure {}

impl From<SwarmError> for CommandFailure {
    fn from(e: SwarmError) -> Self {
        match e {
            SwarmError::FileNotFound(path) => Self::new(format!("File not found: {path}")),
            SwarmError::MissingFrontmatter(_) => Self::with_details(
                "Failed to parse frontmatter",
                vec!["File does not contain valid YAML frontmatter".to_string()],
            ),
            SwarmError::InvalidStoryId(id) => Self::with_details(
                "Invalid story ID",
                vec![format!("'{id}' must be a single file name without '/', '\\' or '..'")],
            ),
            other => Self::new(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CommandFailure {
    fn from(e: std::io::Error) -> Self {
        SwarmError::from(e).into()
    }
}

pub type OpResult = std::result::Result<Value, CommandFailure>;

/// `{"ok": true, ...payload}` or `{"ok": false, "error", "details"?}`.
pub fn envelope(result: &OpResult) -> Value {
    let mut out = Map::new();
    match result {
        Ok(payload) => {
            out.insert("ok".to_string(), Value::Bool(true));
            match payload {
                Value::Object(fields) => {
                    out.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                }
                Value::Null => {}
                other => {
                    out.insert("result".to_string(), other.clone());
                }
            }
        }
        Err(failure) => {
            out.insert("ok".to_string(), Value::Bool(false));
            out.insert("error".to_string(), Value::String(failure.error.clone()));
            if !failure.details.is_empty() {
                out.insert("details".to_string(), json!(failure.details));
            }
        }
    }
    Value::Object(out)
}

fn parse_vocab<T>(value: &str, expected: String) -> std::result::Result<T, CommandFailure>
where
    T: FromStr<Err = SwarmError>,
{
    T::from_str(value).map_err(|e| {
        CommandFailure::with_details(e.to_string(), vec![format!("expected one of: {expected}")])
    })
}

/// Read a story, run structural validation, and decode it.
fn load_story(
    path: &Path,
    invalid: &str,
) -> std::result::Result<(Document, Story), CommandFailure> {
    let doc = io::read_document(path)?;
    let check = validate_story(&doc.header);
    if !check.valid {
        return Err(CommandFailure::invalid(invalid, &check));
    }
    let story = Story::from_header(&doc.header)
        .map_err(|e| CommandFailure::with_details(invalid, vec![e.to_string()]))?;
    Ok((doc, story))
}

/// Header of a record in a scanned directory. Unreadable or headerless
/// files yield `None` so one bad file never aborts a scan.
fn read_record(file: &Path) -> Option<Document> {
    let text = match std::fs::read_to_string(file) {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(file = %file.display(), error = %e, "skipping unreadable file");
            return None;
        }
    };
    let doc = frontmatter::parse(&text);
    if doc.is_none() {
        tracing::debug!(file = %file.display(), "skipping file without frontmatter");
    }
    doc
}

fn save_story(
    path: &Path,
    mut doc: Document,
    story: &Story,
) -> std::result::Result<(), CommandFailure> {
    doc.header = story.to_header()?;
    io::write_document(path, &doc)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Stories
// ---------------------------------------------------------------------------

pub fn validate_story_file(path: &Path) -> OpResult {
    let (_, story) = load_story(path, "Invalid story")?;
    Ok(json!({
        "id": story.id,
        "status": story.status,
        "ac_count": story.acceptance_criteria.len(),
        "task_count": story.tasks.len(),
        "ac_summary": story.ac_summary(),
        "task_summary": story.task_summary(),
    }))
}

/// Check (and with `apply`, perform) a status change on a story file.
pub fn transition_story_file(
    path: &Path,
    target: &str,
    apply: bool,
    now: DateTime<Utc>,
) -> OpResult {
    let (doc, mut story) = load_story(path, "Invalid story structure")?;
    let from = story.status;
    let to: StoryStatus = parse_vocab(target, StoryStatus::expected())?;

    let denied = |reason: Option<String>, fallback: &str| {
        CommandFailure::with_details(
            format!("Cannot transition from '{from}' to '{to}'"),
            vec![reason.unwrap_or_else(|| fallback.to_string())],
        )
    };

    let structural = can_transition(from, to);
    if !structural.allowed {
        return Err(denied(structural.reason, "Invalid transition"));
    }
    let guarded = validate_transition(&story, to);
    if !guarded.allowed {
        return Err(denied(guarded.reason, "Preconditions not met"));
    }

    if apply {
        story.apply_transition(to, now)?;
        save_story(path, doc, &story)?;
        tracing::info!(story = %story.id, %from, %to, "transition applied");
    }

    Ok(json!({ "from": from, "to": to, "applied": apply }))
}

pub fn update_task_file(path: &Path, task_id: &str, status: &str, now: DateTime<Utc>) -> OpResult {
    let (doc, mut story) = load_story(path, "Invalid story")?;
    let status: TaskStatus = parse_vocab(status, TaskStatus::expected())?;
    story.set_task_status(task_id, status, now)?;
    save_story(path, doc, &story)?;
    tracing::debug!(story = %story.id, task = task_id, %status, "task updated");
    Ok(json!({
        "id": story.id,
        "task": task_id,
        "status": status,
        "task_summary": story.task_summary(),
    }))
}

pub fn update_criterion_file(
    path: &Path,
    criterion_id: &str,
    status: &str,
    evidence: Option<&str>,
    now: DateTime<Utc>,
) -> OpResult {
    let (doc, mut story) = load_story(path, "Invalid story")?;
    let status: CriterionStatus = parse_vocab(status, CriterionStatus::expected())?;
    story.set_criterion_status(criterion_id, status, evidence, now)?;
    save_story(path, doc, &story)?;
    tracing::debug!(story = %story.id, criterion = criterion_id, %status, "criterion updated");
    Ok(json!({
        "id": story.id,
        "criterion": criterion_id,
        "status": status,
        "ac_summary": story.ac_summary(),
    }))
}

// ---------------------------------------------------------------------------
// Knowledge
// ---------------------------------------------------------------------------

/// Ids found in the headers of `.swarm/knowledge/*.md`. Files without a
/// parsable header or a string `id` are skipped.
pub fn existing_knowledge_ids(root: &Path) -> crate::Result<Vec<String>> {
    let mut ids = Vec::new();
    for file in io::markdown_files(&paths::knowledge_dir(root))? {
        let Some(doc) = read_record(&file) else {
            continue;
        };
        match doc.get_str("id") {
            Some(id) => ids.push(id.to_string()),
            None => tracing::debug!(file = %file.display(), "skipping knowledge file without id"),
        }
    }
    Ok(ids)
}

/// Turn a retrospective into knowledge files under `.swarm/knowledge/`.
///
/// Ids continue from the ones on disk at scan time. Two runs that scan the
/// same directory before either writes will mint the same ids; callers that
/// run extractions in parallel must serialize them.
pub fn extract_knowledge_file(
    root: &Path,
    retro_path: &Path,
    story_id: Option<&str>,
    repo: Option<&str>,
    author: &str,
    now: DateTime<Utc>,
) -> OpResult {
    let doc = io::read_document(retro_path)?;

    let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
    let Some(story_id) = non_empty(story_id).or_else(|| non_empty(doc.get_str("story_id"))) else {
        return Err(CommandFailure::with_details(
            "Missing story ID",
            vec!["Provide --story-id or include story_id in frontmatter".to_string()],
        ));
    };
    paths::validate_story_id(&story_id)?;
    let repo_name = non_empty(repo)
        .or_else(|| non_empty(doc.get_str("repo")))
        .unwrap_or_else(|| UNKNOWN_REPO.to_string());

    let ctx = ExtractionContext {
        story_id: story_id.clone(),
        repo_name,
        author: author.to_string(),
        existing_ids: existing_knowledge_ids(root)?,
    };
    let items = extract_knowledge(&doc.body, &ctx, now);

    let mut files_written = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let path = paths::knowledge_file(root, &story_id, i + 1);
        io::atomic_write(&path, item.to_text()?.as_bytes())?;
        files_written.push(paths::relative_display(root, &path));
    }
    tracing::info!(story = %story_id, count = items.len(), "knowledge extracted");

    let summary: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "dimension": item.dimension,
                "scope": item.scope,
                "title": item.title,
            })
        })
        .collect();

    Ok(json!({
        "items": summary,
        "count": items.len(),
        "files_written": files_written,
    }))
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Mint the next story id and persist the bumped counter. Only `counter`
/// changes in the file; every other key keeps its position.
pub fn next_id(config_path: &Path) -> OpResult {
    let mut doc = io::read_document(config_path)?;
    let Some(prefix) = doc.get_str("prefix").map(str::to_string) else {
        return Err(CommandFailure::with_details(
            "Invalid config",
            vec!["Missing \"prefix\" field in config frontmatter".to_string()],
        ));
    };
    let mut counter = doc
        .header
        .get("counter")
        .and_then(serde_yaml::Value::as_u64)
        .unwrap_or(0);
    let id = bump_story_id(&prefix, &mut counter);

    doc.header.insert("counter".into(), counter.into());
    io::write_document(config_path, &doc)?;
    tracing::debug!(%id, "minted story id");

    Ok(json!({ "id": id, "counter": counter }))
}

// ---------------------------------------------------------------------------
// Listing + status
// ---------------------------------------------------------------------------

pub fn list_records(dir: &Path, status: Option<&str>) -> OpResult {
    if !dir.is_dir() {
        return Err(CommandFailure::new(format!(
            "Directory not found: {}",
            dir.display()
        )));
    }

    let mut items = Vec::new();
    for file in io::markdown_files(dir)? {
        let Some(doc) = read_record(&file) else {
            continue;
        };
        let record_status = doc.get_str("status").unwrap_or("");
        if status.is_some_and(|want| !want.is_empty() && want != record_status) {
            continue;
        }
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        items.push(json!({
            "id": doc.get_str("id").map(str::to_string).unwrap_or(stem),
            "title": doc.get_str("title").unwrap_or(""),
            "status": record_status,
            "file": name,
        }));
    }

    let count = items.len();
    Ok(json!({ "items": items, "count": count }))
}

/// Presence of the well-known `.swarm/` layout, plus config, retrospective
/// and backlog summaries when those exist. A retrospective counts as pending
/// until its header lists extracted knowledge.
pub fn project_status(root: &Path) -> OpResult {
    let checks: Vec<Value> = paths::LAYOUT
        .iter()
        .map(|rel| json!({ "path": rel, "present": root.join(rel).exists() }))
        .collect();

    let mut out = json!({
        "initialized": paths::swarm_dir(root).is_dir(),
        "checks": checks,
    });

    let config_path = paths::config_path(root);
    if config_path.exists() {
        match ConfigFile::load(&config_path) {
            Ok(file) => {
                out["config"] = json!({
                    "project": file.config.project,
                    "prefix": file.config.prefix,
                    "counter": file.config.counter,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "config did not load");
                out["config_error"] = Value::String(e.to_string());
            }
        }
    }

    let retros = root.join(paths::RETROSPECTIVES_DIR);
    if retros.is_dir() {
        let mut total = 0;
        let mut pending = 0;
        for file in io::markdown_files(&retros)? {
            let Some(meta) = read_record(&file).and_then(|d| d.decode::<RetroMeta>().ok()) else {
                continue;
            };
            total += 1;
            if meta.knowledge_extracted.is_empty() {
                pending += 1;
            }
        }
        out["retrospectives"] = json!({ "total": total, "pending_extraction": pending });
    }

    let backlog = paths::backlog_dir(root);
    if backlog.is_dir() {
        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        for file in io::markdown_files(&backlog)? {
            if let Some(doc) = read_record(&file) {
                if let Some(status) = doc.get_str("status") {
                    *by_status.entry(status.to_string()).or_default() += 1;
                }
            }
        }
        out["backlog"] = json!(by_status);
    }

    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeItem;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap()
    }

    const STORY: &str = "---
id: PROJ-001
title: Login page
status: planned
priority: high
complexity: moderate
created: '2026-01-01'
updated: '2026-01-01'
author: pm
tags: [auth]
acceptance_criteria:
  - id: AC-1
    description: User can log in
    status: pending
    evidence: ''
tasks:
  - id: T-1
    title: Build form
    agent: frontend-dev
    status: pending
why:
  problem: Users cannot sign in
owner: team-auth
---

## Notes

Body text stays.
";

    const RETRO: &str = "---
story_id: AUTH-001
title: Auth retro
completed: '2026-01-20'
duration: 3d
repo: auth-service
---
## What Went Well
- Factory pattern kept the token module clean
- [Effective patterns, smooth workflows]

## Learnings by Agent
### backend-dev
- Gotcha: SQLite stores JWT tokens as TEXT
";

    fn write(dir: &Path, rel: &str, text: &str) -> std::path::PathBuf {
        let path = dir.join(rel);
        io::atomic_write(&path, text.as_bytes()).unwrap();
        path
    }

    #[test]
    fn envelope_shapes() {
        let ok = envelope(&Ok(json!({ "id": "X" })));
        assert_eq!(ok, json!({ "ok": true, "id": "X" }));

        let bare = envelope(&Err(CommandFailure::new("boom")));
        assert_eq!(bare, json!({ "ok": false, "error": "boom" }));

        let detailed = envelope(&Err(CommandFailure::with_details("bad", vec!["a: b".into()])));
        assert_eq!(detailed["details"], json!(["a: b"]));
    }

    #[test]
    fn missing_and_headerless_files() {
        let dir = TempDir::new().unwrap();
        let err = validate_story_file(&dir.path().join("nope.md")).unwrap_err();
        assert!(err.error.starts_with("File not found: "));

        let plain = write(dir.path(), "plain.md", "# hi\n");
        let err = validate_story_file(&plain).unwrap_err();
        assert_eq!(err.error, "Failed to parse frontmatter");
        assert_eq!(err.details, vec!["File does not contain valid YAML frontmatter"]);
    }

    #[test]
    fn validate_reports_counts_and_errors() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "s.md", STORY);
        let out = validate_story_file(&path).unwrap();
        assert_eq!(out["id"], "PROJ-001");
        assert_eq!(out["status"], "planned");
        assert_eq!(out["ac_count"], 1);
        assert_eq!(out["task_count"], 1);
        assert_eq!(out["task_summary"]["pending"], 1);

        let bad = write(dir.path(), "bad.md", "---\nid: X\nstatus: bogus\n---\n");
        let err = validate_story_file(&bad).unwrap_err();
        assert_eq!(err.error, "Invalid story");
        assert!(err.details.iter().any(|d| d.starts_with("status: ")));
        assert!(err.details.iter().any(|d| d.starts_with("title: ")));
    }

    #[test]
    fn transition_check_does_not_touch_file() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "s.md", STORY);
        let out = transition_story_file(&path, "executing", false, now()).unwrap();
        assert_eq!(out, json!({ "from": "planned", "to": "executing", "applied": false }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), STORY);
    }

    #[test]
    fn transition_apply_rewrites_status_and_keeps_body() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "s.md", STORY);
        transition_story_file(&path, "executing", true, now()).unwrap();

        let doc = io::read_document(&path).unwrap();
        assert_eq!(doc.get_str("status"), Some("executing"));
        assert_eq!(doc.get_str("owner"), Some("team-auth"));
        assert!(doc.body.contains("Body text stays."));
        let story = Story::from_header(&doc.header).unwrap();
        assert_eq!(
            story.execution.started_at.as_deref(),
            Some("2026-02-01T09:30:00.000Z")
        );
    }

    #[test]
    fn transition_failures() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "s.md", STORY);

        let err = transition_story_file(&path, "done", false, now()).unwrap_err();
        assert_eq!(err.error, "Cannot transition from 'planned' to 'done'");
        assert_eq!(err.details.len(), 1);
        assert!(err.details[0].contains("Valid targets: executing, awaiting_input"));

        let err = transition_story_file(&path, "bogus", false, now()).unwrap_err();
        assert!(err.error.contains("bogus"));

        let no_tasks = STORY.replace(
            "tasks:\n  - id: T-1\n    title: Build form\n    agent: frontend-dev\n    status: pending\n",
            "",
        );
        let path = write(dir.path(), "t.md", &no_tasks);
        let err = transition_story_file(&path, "executing", true, now()).unwrap_err();
        assert_eq!(err.details, vec!["Cannot execute: no tasks defined"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), no_tasks);

        let broken = write(dir.path(), "b.md", "---\nid: X\n---\n");
        let err = transition_story_file(&broken, "ideating", false, now()).unwrap_err();
        assert_eq!(err.error, "Invalid story structure");
    }

    #[test]
    fn task_and_criterion_updates() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "s.md", STORY);

        let out = update_task_file(&path, "T-1", "done", now()).unwrap();
        assert_eq!(out["task_summary"]["done"], 1);
        let out = update_criterion_file(&path, "AC-1", "passing", Some("e2e green"), now()).unwrap();
        assert_eq!(out["ac_summary"]["passing"], 1);

        let story = Story::from_header(&io::read_document(&path).unwrap().header).unwrap();
        assert_eq!(story.acceptance_criteria[0].evidence, "e2e green");
        assert_eq!(story.updated, "2026-02-01T09:30:00.000Z");

        assert!(update_task_file(&path, "T-9", "done", now())
            .unwrap_err()
            .error
            .contains("T-9"));
        assert!(update_task_file(&path, "T-1", "finished", now()).is_err());
    }

    #[test]
    fn extract_writes_files_and_reports_items() {
        let dir = TempDir::new().unwrap();
        let retro = write(dir.path(), ".swarm/retrospectives/AUTH-001.md", RETRO);

        let out =
            extract_knowledge_file(dir.path(), &retro, None, None, "swarm-cli", now()).unwrap();
        assert_eq!(out["count"], 2);
        assert_eq!(out["items"][0]["id"], "K-001");
        assert_eq!(out["items"][0]["dimension"], "epistemology");
        assert_eq!(out["items"][1]["dimension"], "qualia");
        assert_eq!(
            out["files_written"],
            json!([".swarm/knowledge/AUTH-001-1.md", ".swarm/knowledge/AUTH-001-2.md"])
        );

        let text = std::fs::read_to_string(dir.path().join(".swarm/knowledge/AUTH-001-2.md")).unwrap();
        let (item, body): (KnowledgeItem, String) = frontmatter::parse_as(&text).unwrap();
        assert_eq!(item.source_repo, "auth-service");
        assert_eq!(item.author, "backend-dev");
        assert!(body.contains("## Evidence"));
    }

    #[test]
    fn extract_arguments_override_header() {
        let dir = TempDir::new().unwrap();
        let retro = write(dir.path(), "retro.md", RETRO);
        extract_knowledge_file(dir.path(), &retro, Some("PAY-7"), Some("payments"), "me", now())
            .unwrap();
        let text = std::fs::read_to_string(dir.path().join(".swarm/knowledge/PAY-7-1.md")).unwrap();
        let (item, _): (KnowledgeItem, String) = frontmatter::parse_as(&text).unwrap();
        assert_eq!(item.source_story, "PAY-7");
        assert_eq!(item.source_repo, "payments");
        assert_eq!(item.author, "me");
    }

    #[test]
    fn extract_without_story_id_fails() {
        let dir = TempDir::new().unwrap();
        let retro = write(dir.path(), "retro.md", "---\ntitle: x\n---\n- something learned\n");
        let err = extract_knowledge_file(dir.path(), &retro, None, None, "a", now()).unwrap_err();
        assert_eq!(err.error, "Missing story ID");
    }

    #[test]
    fn extract_with_nothing_to_learn_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let retro = write(dir.path(), "retro.md", "---\nstory_id: X-1\n---\n## Summary\nAll fine.\n");
        let out = extract_knowledge_file(dir.path(), &retro, None, None, "a", now()).unwrap();
        assert_eq!(out, json!({ "items": [], "count": 0, "files_written": [] }));
        assert!(!paths::knowledge_dir(dir.path()).exists());
    }

    #[test]
    fn sequential_extractions_do_not_collide() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".swarm/knowledge/old.md", "---\nid: K-004\n---\n");
        write(dir.path(), ".swarm/knowledge/junk.md", "no header\n");
        let retro = write(dir.path(), "retro.md", RETRO);

        let first =
            extract_knowledge_file(dir.path(), &retro, Some("A-1"), None, "a", now()).unwrap();
        let second =
            extract_knowledge_file(dir.path(), &retro, Some("B-1"), None, "a", now()).unwrap();
        assert_eq!(first["items"][0]["id"], "K-005");
        assert_eq!(first["items"][1]["id"], "K-006");
        assert_eq!(second["items"][0]["id"], "K-007");

        let mut ids = existing_knowledge_ids(dir.path()).unwrap();
        ids.sort();
        assert_eq!(ids, vec!["K-004", "K-005", "K-006", "K-007", "K-008"]);
    }

    #[test]
    fn non_utf8_files_are_skipped_by_scans() {
        let dir = TempDir::new().unwrap();
        let binary = [0xffu8, 0xfe, 0x00];
        write(dir.path(), ".swarm/knowledge/K-002.md", "---\nid: K-002\nstatus: active\n---\n");
        std::fs::write(dir.path().join(".swarm/knowledge/bin.md"), binary).unwrap();
        write(dir.path(), ".swarm/backlog/PROJ-001.md", STORY);
        std::fs::write(dir.path().join(".swarm/backlog/bin.md"), binary).unwrap();
        write(dir.path(), ".swarm/retrospectives/AUTH-001.md", RETRO);
        std::fs::write(dir.path().join(".swarm/retrospectives/bin.md"), binary).unwrap();

        assert_eq!(existing_knowledge_ids(dir.path()).unwrap(), vec!["K-002"]);

        let listed = list_records(&paths::knowledge_dir(dir.path()), None).unwrap();
        assert_eq!(listed["count"], 1);
        assert_eq!(listed["items"][0]["id"], "K-002");

        let retro = dir.path().join(".swarm/retrospectives/AUTH-001.md");
        let out = extract_knowledge_file(dir.path(), &retro, None, None, "a", now()).unwrap();
        assert_eq!(out["items"][0]["id"], "K-003");

        let status = project_status(dir.path()).unwrap();
        assert_eq!(status["backlog"], json!({ "planned": 1 }));
        assert_eq!(status["retrospectives"]["total"], 1);
    }

    #[test]
    fn extract_rejects_story_ids_that_leave_the_knowledge_dir() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project");
        let escaping = RETRO.replace("story_id: AUTH-001", "story_id: ../../../escaped");
        let retro = write(&project, "retro.md", &escaping);

        let err = extract_knowledge_file(&project, &retro, None, None, "a", now()).unwrap_err();
        assert_eq!(err.error, "Invalid story ID");
        assert!(err.details[0].contains("../../../escaped"));

        for id in ["a/b", "a\\b", ".."] {
            let err =
                extract_knowledge_file(&project, &retro, Some(id), None, "a", now()).unwrap_err();
            assert_eq!(err.error, "Invalid story ID");
        }
        assert!(!paths::knowledge_dir(&project).exists());
        assert!(!dir.path().join("escaped-1.md").exists());
    }

    #[test]
    fn next_id_bumps_counter_in_place() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            ".swarm/config.md",
            "---\nproject: demo\nprefix: DEMO\ncounter: 9\ncustom: keep\n---\n\n# Config\n",
        );
        assert_eq!(next_id(&path).unwrap(), json!({ "id": "DEMO-010", "counter": 10 }));
        assert_eq!(next_id(&path).unwrap()["id"], "DEMO-011");

        let doc = io::read_document(&path).unwrap();
        assert_eq!(doc.get_str("custom"), Some("keep"));
        assert_eq!(doc.body, "\n# Config\n");
    }

    #[test]
    fn next_id_defaults_counter_and_requires_prefix() {
        let dir = TempDir::new().unwrap();
        let fresh = write(dir.path(), "a.md", "---\nprefix: NEW\n---\n");
        assert_eq!(next_id(&fresh).unwrap()["id"], "NEW-001");

        let no_prefix = write(dir.path(), "b.md", "---\nproject: x\n---\n");
        let err = next_id(&no_prefix).unwrap_err();
        assert_eq!(err.error, "Invalid config");
        assert_eq!(err.details, vec!["Missing \"prefix\" field in config frontmatter"]);
    }

    #[test]
    fn list_filters_and_falls_back_to_stem() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "b.md", STORY);
        write(dir.path(), "a.md", "---\ntitle: Untitled idea\nstatus: draft\n---\n");
        write(dir.path(), "c.md", "not a record\n");
        write(dir.path(), "notes.txt", "---\nid: N\n---\n");

        let out = list_records(dir.path(), None).unwrap();
        assert_eq!(out["count"], 2);
        assert_eq!(out["items"][0]["id"], "a");
        assert_eq!(out["items"][0]["file"], "a.md");
        assert_eq!(out["items"][1]["id"], "PROJ-001");

        let planned = list_records(dir.path(), Some("planned")).unwrap();
        assert_eq!(planned["count"], 1);

        let err = list_records(&dir.path().join("missing"), None).unwrap_err();
        assert!(err.error.starts_with("Directory not found: "));
    }

    #[test]
    fn status_reports_layout() {
        let dir = TempDir::new().unwrap();
        let out = project_status(dir.path()).unwrap();
        assert_eq!(out["initialized"], false);
        assert_eq!(out["checks"].as_array().unwrap().len(), paths::LAYOUT.len());

        write(dir.path(), ".swarm/config.md", "---\nproject: demo\nprefix: DEMO\ncounter: 2\n---\n");
        write(dir.path(), ".swarm/backlog/PROJ-001.md", STORY);
        let out = project_status(dir.path()).unwrap();
        assert_eq!(out["initialized"], true);
        assert_eq!(out["checks"][0], json!({ "path": ".swarm/config.md", "present": true }));
        assert_eq!(out["config"]["prefix"], "DEMO");
        assert_eq!(out["backlog"]["planned"], 1);
        assert!(out.get("retrospectives").is_none());

        write(dir.path(), ".swarm/retrospectives/AUTH-001.md", RETRO);
        write(
            dir.path(),
            ".swarm/retrospectives/OLD-001.md",
            "---\nstory_id: OLD-001\ntitle: Old\ncompleted: '2025-12-01'\nduration: 1d\nknowledge_extracted:\n  - id: K-001\n    dimension: qualia\n    title: Old gotcha\n---\n",
        );
        let out = project_status(dir.path()).unwrap();
        assert_eq!(out["retrospectives"], json!({ "total": 2, "pending_extraction": 1 }));
    }
}
