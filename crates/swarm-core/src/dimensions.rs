//! Keyword heuristics used to classify extracted learnings.
//!
//! Every classifier is a plain substring scan over the lower-cased text.
//! Keyword tables are slices, and categories are scored in declaration order,
//! so the highest score wins and ties go to the earlier category.

use crate::types::{Confidence, Dimension, Domain, Scope};

pub fn dimension_keywords(dimension: Dimension) -> &'static [&'static str] {
    match dimension {
        Dimension::Epistemology => &[
            "pattern",
            "architecture",
            "design",
            "structure",
            "abstraction",
            "module",
            "interface",
            "decomposition",
            "composition",
            "separation",
            "layering",
            "encapsulation",
            "polymorphism",
            "factory",
            "strategy",
            "observer",
            "adapter",
            "singleton",
        ],
        Dimension::Qualia => &[
            "gotcha",
            "pitfall",
            "surprise",
            "unexpected",
            "bug",
            "issue",
            "problem",
            "workaround",
            "hack",
            "caveat",
            "warning",
            "careful",
            "trap",
            "edge case",
            "subtle",
            "confusing",
            "misleading",
            "broken",
        ],
        Dimension::Praxeology => &[
            "best practice",
            "convention",
            "standard",
            "recommend",
            "should",
            "always",
            "never",
            "prefer",
            "avoid",
            "technique",
            "approach",
            "method",
            "workflow",
            "guideline",
            "rule",
            "practice",
            "proven",
            "effective",
        ],
    }
}

pub fn domain_keywords(domain: Domain) -> &'static [&'static str] {
    match domain {
        Domain::Frontend => &[
            "react",
            "component",
            "ui",
            "css",
            "style",
            "hook",
            "state",
            "render",
            "dom",
            "browser",
            "responsive",
        ],
        Domain::Backend => &[
            "api",
            "server",
            "database",
            "endpoint",
            "service",
            "middleware",
            "route",
            "query",
            "sql",
            "rest",
            "graphql",
        ],
        Domain::Devops => &[
            "deploy",
            "ci",
            "cd",
            "docker",
            "kubernetes",
            "pipeline",
            "infrastructure",
            "monitor",
            "log",
            "container",
        ],
        Domain::Architecture => &[
            "architecture",
            "design",
            "schema",
            "migration",
            "scale",
            "performance",
            "microservice",
            "monolith",
        ],
        Domain::Testing => &[
            "test",
            "spec",
            "assert",
            "mock",
            "stub",
            "fixture",
            "coverage",
            "integration",
            "unit",
            "e2e",
        ],
        Domain::Process => &[
            "workflow",
            "process",
            "agile",
            "sprint",
            "retrospective",
            "standup",
            "review",
            "planning",
        ],
        Domain::Documentation => &[
            "doc",
            "readme",
            "comment",
            "jsdoc",
            "typedoc",
            "changelog",
            "guide",
            "api doc",
        ],
        Domain::Security => &[
            "auth",
            "security",
            "permission",
            "token",
            "jwt",
            "oauth",
            "encrypt",
            "vulnerability",
            "cors",
            "csrf",
        ],
    }
}

/// Technology terms recorded as tags when they appear anywhere in the text.
pub const TECH_TAGS: &[&str] = &[
    "typescript",
    "javascript",
    "react",
    "bun",
    "node",
    "sql",
    "sqlite",
    "postgres",
    "docker",
    "kubernetes",
    "css",
    "html",
    "graphql",
    "rest",
    "api",
    "jwt",
    "oauth",
];

fn score(lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| lower.contains(*k)).count()
}

/// Highest strictly-greater score wins, so earlier candidates keep ties.
fn best<T: Copy>(
    text: &str,
    candidates: &[T],
    keywords: fn(T) -> &'static [&'static str],
    fallback: T,
) -> T {
    let lower = text.to_lowercase();
    let mut best = fallback;
    let mut best_score = 0;
    for &candidate in candidates {
        let s = score(&lower, keywords(candidate));
        if s > best_score {
            best_score = s;
            best = candidate;
        }
    }
    best
}

/// Zero hits everywhere falls back to praxeology.
pub fn suggest_dimension(text: &str) -> Dimension {
    best(
        text,
        Dimension::all(),
        dimension_keywords,
        Dimension::Praxeology,
    )
}

/// Zero hits everywhere falls back to backend.
pub fn suggest_domain(text: &str) -> Domain {
    best(text, Domain::all(), domain_keywords, Domain::Backend)
}

pub fn assess_scope(text: &str) -> Scope {
    let lower = text.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if any(&["enterprise", "organization", "company-wide"]) {
        Scope::Enterprise
    } else if any(&["department", "cross-team"]) {
        Scope::Department
    } else if any(&["team", "convention", "standard", "always", "never"]) {
        Scope::Team
    } else {
        Scope::Repo
    }
}

pub fn assess_confidence(text: &str) -> Confidence {
    let lower = text.to_lowercase();
    let any = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if any(&["proven", "confirmed", "consistently"]) {
        Confidence::High
    } else if any(&["might", "possibly", "unclear"]) {
        Confidence::Low
    } else {
        Confidence::Medium
    }
}

pub fn extract_tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TECH_TAGS
        .iter()
        .filter(|t| lower.contains(*t))
        .map(|t| t.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_examples() {
        assert_eq!(
            suggest_dimension("Gotcha: async functions swallow errors"),
            Dimension::Qualia
        );
        assert_eq!(
            suggest_dimension("Best practice: always validate input"),
            Dimension::Praxeology
        );
        assert_eq!(
            suggest_dimension("Factory pattern keeps the module boundary clean"),
            Dimension::Epistemology
        );
    }

    #[test]
    fn zero_hits_default_to_praxeology() {
        assert_eq!(suggest_dimension("Lunch was late"), Dimension::Praxeology);
        assert_eq!(suggest_dimension(""), Dimension::Praxeology);
    }

    #[test]
    fn dimension_ties_go_to_declaration_order() {
        // One epistemology hit ("pattern"), one qualia hit ("bug").
        assert_eq!(suggest_dimension("pattern bug"), Dimension::Epistemology);
        // One qualia hit ("bug"), one praxeology hit ("avoid").
        assert_eq!(suggest_dimension("avoid bug"), Dimension::Qualia);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(suggest_dimension("PITFALL"), Dimension::Qualia);
        assert_eq!(suggest_domain("KUBERNETES"), Domain::Devops);
    }

    #[test]
    fn domain_examples() {
        assert_eq!(
            suggest_domain("OAuth token refresh and CSRF protection"),
            Domain::Security
        );
        assert_eq!(
            suggest_domain("Mock the fixture in the unit test"),
            Domain::Testing
        );
        assert_eq!(suggest_domain("zzz"), Domain::Backend);
    }

    #[test]
    fn scope_priority() {
        assert_eq!(
            assess_scope("Company-wide team convention"),
            Scope::Enterprise
        );
        assert_eq!(assess_scope("Cross-team handoffs slow us"), Scope::Department);
        assert_eq!(
            assess_scope("Team convention: always use strict TypeScript"),
            Scope::Team
        );
        assert_eq!(assess_scope("Never commit secrets"), Scope::Team);
        assert_eq!(
            assess_scope("This specific API endpoint needs custom caching"),
            Scope::Repo
        );
    }

    #[test]
    fn confidence_levels() {
        assert_eq!(
            assess_confidence("Proven across three stories"),
            Confidence::High
        );
        assert_eq!(
            assess_confidence("Confirmed, but it might vary"),
            Confidence::High
        );
        assert_eq!(assess_confidence("This might help"), Confidence::Low);
        assert_eq!(assess_confidence("Retries help"), Confidence::Medium);
    }

    #[test]
    fn tags_are_substring_matches_in_list_order() {
        assert_eq!(
            extract_tags("SQLite stores JWT tokens"),
            vec!["sql", "sqlite", "jwt"]
        );
        assert_eq!(
            extract_tags("Use TypeScript strict mode"),
            vec!["typescript"]
        );
        assert!(extract_tags("nothing relevant").is_empty());
    }

    #[test]
    fn every_category_has_keywords() {
        assert!(Dimension::all()
            .iter()
            .all(|d| !dimension_keywords(*d).is_empty()));
        assert!(Domain::all().iter().all(|d| !domain_keywords(*d).is_empty()));
    }
}
