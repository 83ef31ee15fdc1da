//! Shared test infrastructure for tasklink integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use std::path::PathBuf;
use tasklink::{Repository, Status, Task, TaskId};
use tempfile::TempDir;

/// Test environment with automatic cleanup.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub repo: Repository,
}

impl TestEnv {
    /// Create a new test environment with an empty task file location.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::open(temp_dir.path().join("tasks.json"));
        Self { temp_dir, repo }
    }

    /// Path of the task file.
    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().join("tasks.json")
    }

    /// A second repository over the same file, as a new process would see it.
    pub fn reopen(&self) -> Repository {
        Repository::open(self.path())
    }

    /// Create an open task with no description or tags.
    pub fn create_task(&mut self, title: &str) -> Task {
        self.repo
            .add(title, "", Status::Open, &[])
            .expect("Failed to create task")
    }

    /// Create a task with tags.
    pub fn create_task_with_tags(&mut self, title: &str, tags: &[&str]) -> Task {
        self.repo
            .add(title, "", Status::Open, tags)
            .expect("Failed to create task")
    }

    /// Create a task with description.
    pub fn create_task_with_desc(&mut self, title: &str, description: &str) -> Task {
        self.repo
            .add(title, description, Status::Open, &[])
            .expect("Failed to create task")
    }

    /// Link two tasks.
    pub fn link(&mut self, a: &Task, b: &Task) {
        self.repo.link(a.id, b.id).expect("Failed to link tasks");
    }

    /// Fetch a task that must exist.
    pub fn fetch(&mut self, id: TaskId) -> Task {
        self.repo
            .get(id)
            .expect("Failed to get task")
            .unwrap_or_else(|| panic!("Task {} should exist", id))
    }

    /// Links of a task that must exist.
    pub fn links_of(&mut self, id: TaskId) -> Vec<TaskId> {
        self.fetch(id).links
    }

    /// Assert the link relation is symmetric, free of self links, and only
    /// points at existing tasks.
    pub fn assert_link_invariants(&mut self) {
        let tasks = self.repo.list().expect("Failed to list tasks");
        for task in &tasks {
            assert!(
                !task.links.contains(&task.id),
                "Task {} links to itself: {:?}",
                task.id,
                task.links
            );
            for other_id in &task.links {
                let other = tasks
                    .iter()
                    .find(|t| t.id == *other_id)
                    .unwrap_or_else(|| panic!("Task {} links to missing task {}", task.id, other_id));
                assert!(
                    other.links.contains(&task.id),
                    "Link {} -> {} has no reverse",
                    task.id,
                    other_id
                );
            }
        }
    }

    /// Get all tasks count.
    pub fn total_count(&mut self) -> usize {
        self.repo.list().expect("Failed to list tasks").len()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
