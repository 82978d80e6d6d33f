use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Closed vocabularies
// ---------------------------------------------------------------------------

/// Declares a closed string vocabulary: serde names, `all()` in declaration
/// order, `as_str()`, `Display` and `FromStr`.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Comma-separated list of every wire name, for error messages.
            pub fn expected() -> String {
                Self::all()
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::SwarmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(crate::error::SwarmError::UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

vocabulary! {
    /// Lifecycle state of a story. `Draft` is the only initial state.
    StoryStatus, "story status" {
        Draft => "draft",
        Ideating => "ideating",
        Planned => "planned",
        Executing => "executing",
        Verifying => "verifying",
        Done => "done",
        Archived => "archived",
        AwaitingInput => "awaiting_input",
    }
}

vocabulary! {
    Priority, "priority" {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

vocabulary! {
    Complexity, "complexity" {
        Trivial => "trivial",
        Simple => "simple",
        Moderate => "moderate",
        Complex => "complex",
        Epic => "epic",
    }
}

vocabulary! {
    CriterionStatus, "acceptance criterion status" {
        Pending => "pending",
        Passing => "passing",
        Failing => "failing",
    }
}

vocabulary! {
    TaskStatus, "task status" {
        Pending => "pending",
        InProgress => "in_progress",
        Done => "done",
        Skipped => "skipped",
    }
}

vocabulary! {
    /// E/Q/P classification axis. Declaration order is the tie-break order.
    Dimension, "dimension" {
        Epistemology => "epistemology",
        Qualia => "qualia",
        Praxeology => "praxeology",
    }
}

vocabulary! {
    /// Applicability level of a knowledge item, lowest first.
    Scope, "scope" {
        Repo => "repo",
        Team => "team",
        Department => "department",
        Enterprise => "enterprise",
    }
}

vocabulary! {
    Confidence, "confidence" {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

vocabulary! {
    /// Knowledge domain. Declaration order is the tie-break order.
    Domain, "domain" {
        Frontend => "frontend",
        Backend => "backend",
        Devops => "devops",
        Architecture => "architecture",
        Testing => "testing",
        Process => "process",
        Documentation => "documentation",
        Security => "security",
    }
}

// ---------------------------------------------------------------------------
// StoryStatus metadata
// ---------------------------------------------------------------------------

impl StoryStatus {
    pub fn label(self) -> &'static str {
        match self {
            StoryStatus::Draft => "Draft",
            StoryStatus::Ideating => "Ideating",
            StoryStatus::Planned => "Planned",
            StoryStatus::Executing => "Executing",
            StoryStatus::Verifying => "Verifying",
            StoryStatus::Done => "Done",
            StoryStatus::Archived => "Archived",
            StoryStatus::AwaitingInput => "Awaiting Input",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StoryStatus::Archived)
    }

    /// Work is underway on the story.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            StoryStatus::Ideating
                | StoryStatus::Planned
                | StoryStatus::Executing
                | StoryStatus::Verifying
        )
    }

    /// The expected route from creation to archive.
    pub fn happy_path() -> &'static [StoryStatus] {
        &[
            StoryStatus::Draft,
            StoryStatus::Ideating,
            StoryStatus::Planned,
            StoryStatus::Executing,
            StoryStatus::Verifying,
            StoryStatus::Done,
            StoryStatus::Archived,
        ]
    }
}

// ---------------------------------------------------------------------------
// Scope ordering
// ---------------------------------------------------------------------------

impl Scope {
    pub fn rank(self) -> usize {
        match self {
            Scope::Repo => 0,
            Scope::Team => 1,
            Scope::Department => 2,
            Scope::Enterprise => 3,
        }
    }

    pub fn is_higher_than(self, other: Scope) -> bool {
        self.rank() > other.rank()
    }
}

impl PartialOrd for Scope {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scope {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

// ---------------------------------------------------------------------------
// Dimension labels
// ---------------------------------------------------------------------------

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Epistemology => "Patterns",
            Dimension::Qualia => "Pain Points",
            Dimension::Praxeology => "Best Practices",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Dimension::Epistemology => "Reusable architectural and design patterns",
            Dimension::Qualia => "Gotchas, pitfalls, and surprises",
            Dimension::Praxeology => "Proven techniques and conventions",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
