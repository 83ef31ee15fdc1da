//! Builder pattern API for creating tasks.

use crate::error::Result;
use crate::repository::Repository;
use crate::types::{Status, Task};

/// Builder for creating tasks with a fluent API.
///
/// # Example
///
/// ```ignore
/// let task = repo.build("Implement parser")
///     .status(Status::InProgress)
///     .tag("compiler")
///     .description("Recursive descent, no backtracking")
///     .create()?;
/// ```
pub struct TaskBuilder<'a> {
    repo: &'a mut Repository,
    title: String,
    description: String,
    status: Status,
    tags: Vec<String>,
}

impl<'a> TaskBuilder<'a> {
    /// Create a new builder with the given title.
    pub fn new(repo: &'a mut Repository, title: impl Into<String>) -> Self {
        Self {
            repo,
            title: title.into(),
            description: String::new(),
            status: Status::Open,
            tags: Vec::new(),
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the initial status.
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Create the task.
    pub fn create(self) -> Result<Task> {
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        self.repo.add(&self.title, &self.description, self.status, &tags)
    }
}
