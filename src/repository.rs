//! High-level repository API for tasklink.

use crate::builder::TaskBuilder;
use crate::error::{RepoError, Result};
use crate::query::Query;
use crate::storage::Store;
use crate::types::{SearchFilter, Status, StatusSummary, Task, TaskId, TaskUpdate, ValidationError, now};
use log::{debug, warn};
use std::collections::HashSet;
use std::path::PathBuf;

/// The task collection and every operation on it.
///
/// Tasks are read from the [`Store`] on first use. Each mutation is applied
/// to a copy of the collection, saved, and only then kept, so a failed save
/// leaves both memory and disk unchanged.
pub struct Repository {
    store: Store,
    tasks: Vec<Task>,
    loaded: bool,
    /// Highest ID issued or deleted by this instance.
    high_water: TaskId,
}

impl Repository {
    /// Create a repository backed by `store`. Nothing is read yet.
    pub fn new(store: Store) -> Self {
        Self {
            store,
            tasks: Vec::new(),
            loaded: false,
            high_water: 0,
        }
    }

    /// Shorthand for a repository over the task file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Store::new(path))
    }

    /// The backing store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Read the task file if that has not happened yet.
    pub fn load(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }

        let mut tasks = self.store.load()?;
        let repairs = reconcile(&mut tasks);
        if repairs > 0 {
            warn!(
                "Repaired {} inconsistent record(s) loaded from {}",
                repairs,
                self.store.path().display()
            );
        }

        self.tasks = tasks;
        self.loaded = true;
        Ok(())
    }

    /// Create a new task with the next free ID.
    ///
    /// The ID is one past the highest ID in the collection or issued or
    /// deleted by this instance. Only the tasks are persisted, so a later
    /// process can reissue the ID of a deleted highest task.
    pub fn add(&mut self, title: &str, description: &str, status: Status, tags: &[&str]) -> Result<Task> {
        self.load()?;

        let at = now();
        let task = Task {
            id: self.next_id(),
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            status,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            links: Vec::new(),
            created_at: at,
            updated_at: at,
        };

        // Validate before persisting
        task.validate()?;

        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;
        self.high_water = task.id;

        debug!("Added task {}: {}", task.id, task.title);
        Ok(task)
    }

    /// Start a fluent [`TaskBuilder`] for a new task.
    pub fn build(&mut self, title: impl Into<String>) -> TaskBuilder<'_> {
        TaskBuilder::new(self, title)
    }

    /// Get a task by ID.
    pub fn get(&mut self, id: TaskId) -> Result<Option<Task>> {
        self.load()?;
        Ok(self.position(id).map(|i| self.tasks[i].clone()))
    }

    /// All tasks, in insertion order.
    pub fn list(&mut self) -> Result<Vec<Task>> {
        self.load()?;
        Ok(self.tasks.clone())
    }

    /// Apply a sparse update.
    ///
    /// `updated_at` moves only if some field value actually changed; an
    /// update that changes nothing returns the task without saving.
    pub fn edit(&mut self, id: TaskId, update: TaskUpdate) -> Result<Task> {
        self.load()?;
        let index = self.index_of(id)?;

        let mut task = self.tasks[index].clone();
        if !update.apply(&mut task) {
            debug!("Edit of task {} changed nothing", id);
            return Ok(task);
        }

        // Validate before persisting
        task.validate()?;
        task.touch(now());

        let mut next = self.tasks.clone();
        next[index] = task.clone();
        self.commit(next)?;

        debug!("Edited task {}", id);
        Ok(task)
    }

    /// Remove a task and every link pointing at it.
    ///
    /// Returns false if no task had this ID. Tasks that lose a link get a
    /// fresh `updated_at`.
    pub fn delete(&mut self, id: TaskId) -> Result<bool> {
        self.load()?;
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let at = now();
        let mut next = self.tasks.clone();
        next.remove(index);
        for other in &mut next {
            if other.remove_link(id) {
                other.touch(at);
            }
        }

        self.commit(next)?;
        self.high_water = self.high_water.max(id);

        debug!("Deleted task {}", id);
        Ok(true)
    }

    /// Link two tasks in both directions.
    ///
    /// Linking an already linked pair is a no-op: nothing is saved and no
    /// timestamp moves.
    pub fn link(&mut self, a: TaskId, b: TaskId) -> Result<(Task, Task)> {
        // No self links
        if a == b {
            return Err(ValidationError::SelfLink(a).into());
        }

        self.load()?;
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;

        if self.tasks[ia].is_linked_to(b) && self.tasks[ib].is_linked_to(a) {
            debug!("Tasks {} and {} already linked", a, b);
            return Ok((self.tasks[ia].clone(), self.tasks[ib].clone()));
        }

        let at = now();
        let mut next = self.tasks.clone();
        if next[ia].add_link(b) {
            next[ia].touch(at);
        }
        if next[ib].add_link(a) {
            next[ib].touch(at);
        }

        let pair = (next[ia].clone(), next[ib].clone());
        self.commit(next)?;

        debug!("Linked {} <-> {}", a, b);
        Ok(pair)
    }

    /// Remove the link between two tasks, if any.
    ///
    /// Both tasks must exist. Unlinking a pair that was never linked is a
    /// no-op and saves nothing.
    pub fn unlink(&mut self, a: TaskId, b: TaskId) -> Result<(Task, Task)> {
        self.load()?;
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;

        if !self.tasks[ia].is_linked_to(b) && !self.tasks[ib].is_linked_to(a) {
            debug!("Tasks {} and {} were not linked", a, b);
            return Ok((self.tasks[ia].clone(), self.tasks[ib].clone()));
        }

        let at = now();
        let mut next = self.tasks.clone();
        if next[ia].remove_link(b) {
            next[ia].touch(at);
        }
        if next[ib].remove_link(a) {
            next[ib].touch(at);
        }

        let pair = (next[ia].clone(), next[ib].clone());
        self.commit(next)?;

        debug!("Unlinked {} <-> {}", a, b);
        Ok(pair)
    }

    /// Tasks linked to `id`, in link order.
    pub fn linked(&mut self, id: TaskId) -> Result<Vec<Task>> {
        self.load()?;
        let index = self.index_of(id)?;

        Ok(self.tasks[index]
            .links
            .iter()
            .filter_map(|&other| self.position(other).map(|i| self.tasks[i].clone()))
            .collect())
    }

    /// Tasks matching every criterion set in `filter`, in insertion order.
    pub fn search(&mut self, filter: &SearchFilter) -> Result<Vec<Task>> {
        self.load()?;
        let terms = filter.terms();

        Ok(self
            .tasks
            .iter()
            .filter(|task| filter.matches_with_terms(task, &terms))
            .cloned()
            .collect())
    }

    /// Start a fluent [`Query`].
    pub fn query(&mut self) -> Query<'_> {
        Query::new(self)
    }

    /// Task counts per status, plus the total.
    pub fn summary(&mut self) -> Result<StatusSummary> {
        self.load()?;
        Ok(StatusSummary::from_tasks(&self.tasks))
    }

    fn next_id(&self) -> TaskId {
        let max_existing = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        max_existing.max(self.high_water) + 1
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    fn index_of(&self, id: TaskId) -> Result<usize> {
        self.position(id).ok_or(RepoError::NotFound(id))
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        self.store.save(&next)?;
        self.tasks = next;
        Ok(())
    }
}

/// Restore the collection invariants on freshly loaded tasks.
///
/// Drops records with ID 0 or fields that fail [`Task::validate`], then
/// duplicate IDs (first record wins), self links, duplicate links and links
/// to missing tasks, then adds any missing reverse link. Returns the number
/// of repairs made.
fn reconcile(tasks: &mut Vec<Task>) -> usize {
    let mut repairs = 0;

    let mut ids = HashSet::new();
    tasks.retain(|task| {
        if task.id == 0 {
            warn!("Dropping task record with invalid id 0: {}", task.title);
            repairs += 1;
            return false;
        }
        if let Err(e) = task.validate() {
            warn!("Dropping invalid task record {}: {}", task.id, e);
            repairs += 1;
            return false;
        }

        let fresh = ids.insert(task.id);
        if !fresh {
            repairs += 1;
        }
        fresh
    });

    for task in tasks.iter_mut() {
        let own = task.id;
        let before = task.links.len();
        let mut seen = HashSet::new();
        task.links
            .retain(|&other| other != own && ids.contains(&other) && seen.insert(other));
        repairs += before - task.links.len();
    }

    let edges: HashSet<(TaskId, TaskId)> = tasks
        .iter()
        .flat_map(|task| task.links.iter().map(move |&other| (task.id, other)))
        .collect();

    for task in tasks.iter_mut() {
        let mut missing: Vec<TaskId> = edges
            .iter()
            .filter(|&&(from, to)| to == task.id && !edges.contains(&(task.id, from)))
            .map(|&(from, _)| from)
            .collect();
        missing.sort_unstable();
        repairs += missing.len();
        task.links.extend(missing);
    }

    repairs
}
