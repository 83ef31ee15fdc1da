//! Integration tests for edge cases.
//!
//! Tests ID assignment, search behaviour, unicode handling, and unusual
//! inputs.

mod common;

use common::TestEnv;
use tasklink::{SearchFilter, Status, TaskUpdate};

// =============================================================================
// Empty Store Operations
// =============================================================================

#[test]
fn test_empty_store_list() {
    let mut env = TestEnv::new();
    assert!(env.repo.list().unwrap().is_empty());
}

#[test]
fn test_empty_store_search() {
    let mut env = TestEnv::new();
    let results = env.repo.search(&SearchFilter::new()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_empty_store_summary() {
    let mut env = TestEnv::new();
    let summary = env.repo.summary().unwrap();

    assert_eq!(summary.total, 0);
    for status in Status::ALL {
        assert_eq!(summary.count(status), 0);
    }
    assert_eq!(summary.counts.len(), 4);
}

#[test]
fn test_reads_do_not_create_file() {
    let mut env = TestEnv::new();
    env.repo.list().unwrap();
    env.repo.summary().unwrap();
    assert!(!env.path().exists());
}

// =============================================================================
// ID Assignment
// =============================================================================

#[test]
fn test_first_id_is_one() {
    let mut env = TestEnv::new();
    let task = env.create_task("Study");
    assert_eq!(task.id, 1);
}

#[test]
fn test_ids_not_reused_after_delete() {
    let mut env = TestEnv::new();

    let first = env.create_task("Study");
    let second = env.create_task("Practice");
    assert_eq!(second.id, 2);

    env.repo.delete(first.id).unwrap();
    let third = env.create_task("Review");
    assert_eq!(third.id, 3);
}

#[test]
fn test_deleted_max_id_not_reissued_in_session() {
    let mut env = TestEnv::new();

    env.create_task("One");
    let two = env.create_task("Two");
    env.repo.delete(two.id).unwrap();

    let next = env.create_task("Three");
    assert_eq!(next.id, 3);
}

#[test]
fn test_ids_continue_after_gaps() {
    let mut env = TestEnv::new();

    for i in 0..5 {
        env.create_task(&format!("Task {}", i));
    }
    env.repo.delete(2).unwrap();
    env.repo.delete(3).unwrap();

    let next = env.create_task("After gaps");
    assert_eq!(next.id, 6);
}

#[test]
fn test_ids_continue_from_reloaded_file() {
    let mut env = TestEnv::new();
    env.create_task("One");
    env.create_task("Two");

    let mut fresh = env.reopen();
    let task = fresh.add("Three", "", Status::Open, &[]).unwrap();
    assert_eq!(task.id, 3);
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_search_text_example() {
    let mut env = TestEnv::new();
    let parser = env.create_task("Implement parser");
    env.create_task("Write docs");

    let results = env.repo.search(&SearchFilter::new().text("parser")).unwrap();
    assert_eq!(results, vec![parser]);
}

#[test]
fn test_search_text_is_case_insensitive() {
    let mut env = TestEnv::new();
    env.create_task("Implement Parser");

    let results = env.repo.search(&SearchFilter::new().text("pArSeR")).unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn test_search_terms_span_title_and_description() {
    let mut env = TestEnv::new();
    let task = env.create_task_with_desc("Implement parser", "for the config language");
    env.create_task("Implement lexer");

    let results = env
        .repo
        .search(&SearchFilter::new().text("implement  CONFIG"))
        .unwrap();
    assert_eq!(results, vec![task]);

    let results = env
        .repo
        .search(&SearchFilter::new().text("parser missing"))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_search_tag_exact_membership() {
    let mut env = TestEnv::new();
    let backend = env.create_task_with_tags("API", &["backend"]);
    env.create_task_with_tags("UI", &["backend-ui"]);

    let results = env.repo.search(&SearchFilter::new().tag("backend")).unwrap();
    assert_eq!(results, vec![backend]);
}

#[test]
fn test_search_conjunction() {
    let mut env = TestEnv::new();
    let a = env.create_task_with_tags("Fix parser", &["bug"]);
    let b = env.create_task_with_tags("Fix lexer", &["bug"]);
    env.create_task_with_tags("Fix parser docs", &["docs"]);
    env.repo
        .edit(b.id, TaskUpdate::new().status(Status::Done))
        .unwrap();

    let filter = SearchFilter::new().text("fix").tag("bug").status(Status::Open);
    let results = env.repo.search(&filter).unwrap();
    assert_eq!(results, vec![a]);
}

#[test]
fn test_search_without_filters_returns_all_in_order() {
    let mut env = TestEnv::new();
    for title in ["C", "A", "B"] {
        env.create_task(title);
    }

    let titles: Vec<_> = env
        .repo
        .search(&SearchFilter::new())
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["C", "A", "B"]);
}

// =============================================================================
// Summary
// =============================================================================

#[test]
fn test_summary_counts() {
    let mut env = TestEnv::new();
    env.create_task("Open one");
    env.create_task("Open two");
    let blocked = env.create_task("Stuck");
    env.repo
        .edit(blocked.id, TaskUpdate::new().status(Status::Blocked))
        .unwrap();

    let summary = env.repo.summary().unwrap();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.count(Status::Open), 2);
    assert_eq!(summary.count(Status::Blocked), 1);
    assert_eq!(summary.count(Status::Done), 0);
    assert_eq!(summary.count(Status::InProgress), 0);
}

// =============================================================================
// Edits
// =============================================================================

#[test]
fn test_noop_edit_keeps_timestamp() {
    let mut env = TestEnv::new();
    let task = env.create_task_with_tags("Same", &["x"]);

    let edited = env
        .repo
        .edit(task.id, TaskUpdate::new().title("Same").tags(["x"]))
        .unwrap();
    assert_eq!(edited, task);

    let edited = env.repo.edit(task.id, TaskUpdate::new()).unwrap();
    assert_eq!(edited, task);
}

#[test]
fn test_edit_preserves_links_and_created_at() {
    let mut env = TestEnv::new();
    let a = env.create_task("A");
    let b = env.create_task("B");
    env.link(&a, &b);

    let edited = env
        .repo
        .edit(a.id, TaskUpdate::new().description("more detail"))
        .unwrap();

    assert_eq!(edited.links, vec![b.id]);
    assert_eq!(edited.created_at, a.created_at);
    assert!(edited.updated_at >= edited.created_at);
}

#[test]
fn test_edit_clears_tags() {
    let mut env = TestEnv::new();
    let task = env.create_task_with_tags("Tagged", &["a", "b"]);

    let edited = env
        .repo
        .edit(task.id, TaskUpdate::new().tags(Vec::<String>::new()))
        .unwrap();
    assert!(edited.tags.is_empty());
}

#[test]
fn test_edit_description_to_empty() {
    let mut env = TestEnv::new();
    let task = env.create_task_with_desc("Task", "Original description");

    let edited = env
        .repo
        .edit(task.id, TaskUpdate::new().description(""))
        .unwrap();
    assert!(edited.description.is_empty());
}

// =============================================================================
// Unicode and Special Characters
// =============================================================================

#[test]
fn test_unicode_title_emoji() {
    let mut env = TestEnv::new();

    let task = env.create_task("Task with emoji: \u{1F680}");
    let retrieved = env.fetch(task.id);
    assert_eq!(retrieved.title, task.title);
}

#[test]
fn test_unicode_search() {
    let mut env = TestEnv::new();
    let task = env.create_task("\u{4E2D}\u{6587}\u{4EFB}\u{52A1}");

    let results = env
        .repo
        .search(&SearchFilter::new().text("\u{4EFB}\u{52A1}"))
        .unwrap();
    assert_eq!(results, vec![task]);
}

#[test]
fn test_unicode_title_length_counts_chars() {
    let mut env = TestEnv::new();

    let title = "\u{00E9}".repeat(500);
    let task = env.repo.add(&title, "", Status::Open, &[]).unwrap();
    assert_eq!(task.title.chars().count(), 500);
}

#[test]
fn test_description_with_newlines() {
    let mut env = TestEnv::new();

    let task = env.create_task_with_desc("Task", "Line 1\nLine 2\nLine 3");
    assert_eq!(task.description, "Line 1\nLine 2\nLine 3");
}

#[test]
fn test_duplicate_tags_accepted() {
    let mut env = TestEnv::new();

    let task = env.create_task_with_tags("Task", &["dup", "dup"]);
    assert_eq!(task.tags, vec!["dup", "dup"]);
}
