//! tasklink: personal task tracking with symmetric links between tasks.
//!
//! Tasks live in one JSON file. A [`Repository`] reads it lazily through a
//! [`Store`] and writes the whole collection back after every change.
//!
//! # Example
//!
//! ```no_run
//! use tasklink::{Repository, SearchFilter, Status, TaskUpdate};
//!
//! let mut repo = Repository::open(".tasks.json");
//!
//! let parser = repo.add("Implement parser", "", Status::Open, &["compiler"]).unwrap();
//! let docs = repo.add("Write docs", "", Status::Open, &[]).unwrap();
//!
//! // Links are symmetric
//! repo.link(parser.id, docs.id).unwrap();
//! assert_eq!(repo.get(docs.id).unwrap().unwrap().links, vec![parser.id]);
//!
//! repo.edit(parser.id, TaskUpdate::new().status(Status::InProgress)).unwrap();
//!
//! let hits = repo.search(&SearchFilter::new().text("parser")).unwrap();
//! assert_eq!(hits.len(), 1);
//!
//! // Deleting purges the link from the other side
//! repo.delete(parser.id).unwrap();
//! assert!(repo.get(docs.id).unwrap().unwrap().links.is_empty());
//! ```

mod builder;
mod error;
mod query;
mod repository;
mod storage;
mod types;

pub mod config;
pub mod digest;

// Re-export public API
pub use builder::TaskBuilder;
pub use config::Config;
pub use digest::{LocalDigest, SummaryError, Summarizer, summarize, summarize_with};
pub use error::{RepoError, Result, StorageError};
pub use query::Query;
pub use repository::Repository;
pub use storage::{DEFAULT_FILE, Store};
pub use types::{SearchFilter, Status, StatusSummary, Task, TaskId, TaskUpdate, ValidationError};
