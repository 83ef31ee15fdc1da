//! Core data types for tasklink.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Task identifier. Assigned sequentially, never reused within a collection.
pub type TaskId = u64;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 500;

/// A single trackable unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Unique, immutable identifier
    pub id: TaskId,

    /// Short description of the work (trimmed, never empty)
    pub title: String,

    /// Longer free text, may be empty
    #[serde(default)]
    pub description: String,

    /// Current state
    pub status: Status,

    /// Freeform tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// IDs of related tasks; the relation is symmetric
    #[serde(default)]
    pub links: Vec<TaskId>,

    /// When created
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    /// Last modification
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Task status states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Done,
    Blocked,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Status; 4] = [Status::Open, Status::InProgress, Status::Done, Status::Blocked];

    /// The persisted and user-facing name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in-progress",
            Status::Done => "done",
            Status::Blocked => "blocked",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidStatus(s.to_string()))
    }
}

/// Validation errors for task input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("title exceeds 500 characters")]
    TitleTooLong,

    #[error("title contains control characters")]
    InvalidCharacters,

    #[error("invalid tag '{0}': must be non-empty with no whitespace or control characters")]
    InvalidTag(String),

    #[error("invalid status '{0}': expected one of open, in-progress, done, blocked")]
    InvalidStatus(String),

    #[error("cannot link task {0} to itself")]
    SelfLink(TaskId),
}

impl Task {
    /// Validate the task's user-supplied fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Title: required after trimming, bounded, no control characters
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong);
        }
        if self.title.chars().any(|c| c.is_control()) {
            return Err(ValidationError::InvalidCharacters);
        }

        for tag in &self.tags {
            if tag.is_empty() || tag.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(ValidationError::InvalidTag(tag.clone()));
            }
        }

        Ok(())
    }

    /// Whether this task links to `id`.
    pub fn is_linked_to(&self, id: TaskId) -> bool {
        self.links.contains(&id)
    }

    /// Add a link to `id` unless already present. Returns true if added.
    pub(crate) fn add_link(&mut self, id: TaskId) -> bool {
        if self.is_linked_to(id) {
            return false;
        }
        self.links.push(id);
        true
    }

    /// Drop every link to `id`. Returns true if anything was removed.
    pub(crate) fn remove_link(&mut self, id: TaskId) -> bool {
        let before = self.links.len();
        self.links.retain(|&other| other != id);
        self.links.len() != before
    }

    /// Record a modification at `at`, never moving `updated_at` backwards.
    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at.max(self.updated_at);
    }
}

/// Sparse update for [`Task`]: `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub tags: Option<Vec<String>>,
}

impl TaskUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.into()).collect());
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none() && self.tags.is_none()
    }

    /// Apply the set fields to `task`. Returns true if any value changed.
    pub(crate) fn apply(&self, task: &mut Task) -> bool {
        let mut changed = false;

        if let Some(title) = &self.title {
            let title = title.trim();
            if task.title != title {
                task.title = title.to_string();
                changed = true;
            }
        }
        if let Some(description) = &self.description {
            let description = description.trim();
            if task.description != description {
                task.description = description.to_string();
                changed = true;
            }
        }
        if let Some(status) = self.status
            && task.status != status
        {
            task.status = status;
            changed = true;
        }
        if let Some(tags) = &self.tags
            && &task.tags != tags
        {
            task.tags = tags.clone();
            changed = true;
        }

        changed
    }
}

/// Conjunctive search filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    /// Whitespace-separated terms, each must occur in title or description
    pub text: Option<String>,

    /// Exact tag membership
    pub tag: Option<String>,

    /// Exact status match
    pub status: Option<Status>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Lowercased search terms from the text criterion.
    pub fn terms(&self) -> Vec<String> {
        self.text
            .as_deref()
            .map(|text| text.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    /// Check a task against every set criterion.
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_with_terms(task, &self.terms())
    }

    pub(crate) fn matches_with_terms(&self, task: &Task, terms: &[String]) -> bool {
        if let Some(status) = self.status
            && task.status != status
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !task.tags.iter().any(|t| t == tag)
        {
            return false;
        }
        if terms.is_empty() {
            return true;
        }

        let haystack = format!("{} {}", task.title, task.description).to_lowercase();
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

/// Task counts per status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    #[serde(flatten)]
    pub counts: BTreeMap<Status, usize>,
    pub total: usize,
}

impl StatusSummary {
    /// Count `tasks` by status. Every status appears, even with a zero count.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts: BTreeMap<Status, usize> = Status::ALL.into_iter().map(|s| (s, 0)).collect();
        for task in tasks {
            *counts.entry(task.status).or_insert(0) += 1;
        }
        Self {
            counts,
            total: tasks.len(),
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }
}

/// Current time at the whole-second precision the file format keeps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// RFC 3339 timestamps at seconds precision, `Z` suffix.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc).trunc_subsecs(0))
            .map_err(D::Error::custom)
    }
}
