//! Query API with flexible filtering.

use crate::error::Result;
use crate::repository::Repository;
use crate::types::{SearchFilter, Status, Task};

/// Query builder for fluent searches.
pub struct Query<'a> {
    repo: &'a mut Repository,
    filter: SearchFilter,
    limit: Option<usize>,
}

impl<'a> Query<'a> {
    /// Create a new query.
    pub(crate) fn new(repo: &'a mut Repository) -> Self {
        Self {
            repo,
            filter: SearchFilter::new(),
            limit: None,
        }
    }

    /// Require every whitespace-separated term in title or description.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.filter = self.filter.text(text);
        self
    }

    /// Filter by tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.filter = self.filter.tag(tag);
        self
    }

    /// Filter by status.
    pub fn status(mut self, status: Status) -> Self {
        self.filter = self.filter.status(status);
        self
    }

    /// Limit results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Execute the query and return matching tasks.
    pub fn execute(self) -> Result<Vec<Task>> {
        let mut tasks = self.repo.search(&self.filter)?;
        if let Some(limit) = self.limit {
            tasks.truncate(limit);
        }
        Ok(tasks)
    }

    /// Count matching tasks.
    pub fn count(self) -> Result<usize> {
        Ok(self.execute()?.len())
    }
}
