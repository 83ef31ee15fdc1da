//! Plain-text digests of a task snapshot.
//!
//! A [`Summarizer`] reads a slice of tasks (normally the output of
//! `Repository::list`) and never touches the repository. [`summarize_with`]
//! turns any summarizer failure into a message string so callers always get
//! something printable.

use crate::types::{Status, StatusSummary, Task};
use log::warn;
use std::cmp::Ordering;
use std::collections::HashMap;
use thiserror::Error;

/// Default number of tags listed in a digest.
pub const DEFAULT_TOP_TAGS: usize = 3;

/// Errors a summarizer may report.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("summarizer unavailable: {0}")]
    Unavailable(String),

    #[error("summarizer failed: {0}")]
    Failed(String),
}

/// Something that can describe a task snapshot in prose.
pub trait Summarizer {
    fn summarize(&self, tasks: &[Task]) -> Result<String, SummaryError>;
}

/// Deterministic digest built from the tasks alone.
#[derive(Debug, Clone)]
pub struct LocalDigest {
    top_tags: usize,
}

impl LocalDigest {
    /// Digest listing at most `top_tags` tags.
    pub fn new(top_tags: usize) -> Self {
        Self { top_tags }
    }
}

impl Default for LocalDigest {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_TAGS)
    }
}

impl Summarizer for LocalDigest {
    fn summarize(&self, tasks: &[Task]) -> Result<String, SummaryError> {
        if tasks.is_empty() {
            return Ok("No tasks to summarize.".to_string());
        }

        let summary = StatusSummary::from_tasks(tasks);
        let counts: Vec<String> = Status::ALL
            .iter()
            .map(|status| format!("{} {}", summary.count(*status), status))
            .collect();
        let mut lines = vec![format!("{} task(s): {}", summary.total, counts.join(", "))];

        for (status, label) in [(Status::InProgress, "In progress"), (Status::Blocked, "Blocked")] {
            let titles: Vec<String> = tasks
                .iter()
                .filter(|t| t.status == status)
                .map(|t| format!("#{} {}", t.id, t.title))
                .collect();
            if !titles.is_empty() {
                lines.push(format!("{}: {}", label, titles.join("; ")));
            }
        }

        // Ties go to the older task
        let hub = tasks
            .iter()
            .filter(|t| !t.links.is_empty())
            .max_by(|a, b| a.links.len().cmp(&b.links.len()).then(b.id.cmp(&a.id)));
        if let Some(hub) = hub {
            lines.push(format!(
                "Most connected: #{} {} ({} link(s))",
                hub.id,
                hub.title,
                hub.links.len()
            ));
        }

        let tags = top_tags(tasks, self.top_tags);
        if !tags.is_empty() {
            let rendered: Vec<String> = tags.iter().map(|(tag, n)| format!("{} ({})", tag, n)).collect();
            lines.push(format!("Top tags: {}", rendered.join(", ")));
        }

        Ok(lines.join("\n"))
    }
}

/// Most used tags, by count then name.
fn top_tags(tasks: &[Task], limit: usize) -> Vec<(&str, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in tasks.iter().flat_map(|t| t.tags.iter()) {
        *counts.entry(tag.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| match b.1.cmp(&a.1) {
        Ordering::Equal => a.0.cmp(b.0),
        other => other,
    });
    ranked.truncate(limit);
    ranked
}

/// Digest `tasks` with the default [`LocalDigest`].
pub fn summarize(tasks: &[Task]) -> String {
    summarize_with(&LocalDigest::default(), tasks)
}

/// Digest `tasks` with `summarizer`, reporting failure as text.
pub fn summarize_with(summarizer: &dyn Summarizer, tasks: &[Task]) -> String {
    match summarizer.summarize(tasks) {
        Ok(text) => text,
        Err(e) => {
            warn!("Digest failed: {}", e);
            format!("error: {}", e)
        }
    }
}
