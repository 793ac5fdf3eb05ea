//! Rights Determinism Tests
//!
//! Invariants of the in-memory permission catalog:
//! - Flattening preserves declaration order
//! - Sorting is stable; ties keep flatten order
//! - Chunked pagination matches the persisted contract
//! - Out-of-range pages surface as iteration errors, not panics

use configdb::manager::{IterationError, IterationResult, ResourceManager};
use configdb::query::{CollectionParameters, QueryError, SortOrder};
use configdb::rights::{flatten, tree_to_document, Level, PermissionNode, Right, RightManager};
use serde_json::Value;

// =============================================================================
// Helper Functions
// =============================================================================

fn leaf(name: &str, level: Level) -> PermissionNode {
    PermissionNode::Leaf(Right::new(name, level))
}

fn params(limit: u64, skip: u64, sort: &str, order: SortOrder) -> CollectionParameters {
    CollectionParameters::new(Value::Null, limit, skip, sort, order).unwrap()
}

fn names(result: &IterationResult<Right>) -> Vec<&str> {
    result.results.iter().map(|r| r.name.as_str()).collect()
}

// =============================================================================
// Pagination
// =============================================================================

/// Five rights a..e, limit 2, skip 2, ascending by name: page ["c", "d"],
/// total 5.
#[test]
fn test_second_page_of_five() {
    let tree = vec![
        leaf("a", Level::Protected),
        leaf("b", Level::Protected),
        leaf("c", Level::Protected),
        leaf("d", Level::Protected),
        leaf("e", Level::Protected),
    ];
    let manager = RightManager::new(&tree);

    let result = manager
        .iterate(&params(2, 2, "name", SortOrder::Ascending))
        .unwrap();
    assert_eq!(names(&result), ["c", "d"]);
    assert_eq!(result.total, 5);
}

/// Total is the catalog size on every page, including short last pages.
#[test]
fn test_total_is_catalog_size() {
    let tree = vec![
        leaf("a", Level::Protected),
        leaf("b", Level::Protected),
        leaf("c", Level::Protected),
    ];
    let manager = RightManager::new(&tree);

    let last = manager
        .iterate(&params(2, 2, "name", SortOrder::Ascending))
        .unwrap();
    assert_eq!(names(&last), ["c"]);
    assert_eq!(last.total, 3);
}

/// Skip past the last chunk is an iteration error, not a panic.
#[test]
fn test_skip_beyond_catalog_is_error() {
    let tree = vec![leaf("a", Level::Protected), leaf("b", Level::Protected)];
    let manager = RightManager::new(&tree);

    let err = manager
        .iterate(&params(2, 6, "name", SortOrder::Ascending))
        .unwrap_err();
    assert!(matches!(
        err,
        IterationError::PageOutOfRange { index: 3, pages: 1 }
    ));
}

/// Non-aligned skip is rejected when the request is built, before any
/// manager sees it.
#[test]
fn test_misaligned_skip_rejected_at_construction() {
    let err = CollectionParameters::new(Value::Null, 2, 3, "name", SortOrder::Ascending)
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::MisalignedSkip { skip: 3, limit: 2 }
    ));
}

/// Limit zero serves the whole sorted catalog.
#[test]
fn test_limit_zero_returns_everything() {
    let manager = RightManager::with_defaults();
    let result = manager
        .iterate(&params(0, 0, "name", SortOrder::Ascending))
        .unwrap();
    assert_eq!(result.len() as u64, result.total);
    assert_eq!(result.total, manager.rights().len() as u64);
}

// =============================================================================
// Sort Determinism
// =============================================================================

/// Sorting by a field with duplicates keeps flatten order among ties.
#[test]
fn test_stable_sort_preserves_flatten_order_on_ties() {
    let tree = vec![
        leaf("gamma", Level::Secure),
        leaf("alpha", Level::Secure),
        PermissionNode::Branch(vec![leaf("beta", Level::Protected)]),
        leaf("delta", Level::Protected),
    ];
    let manager = RightManager::new(&tree);

    let result = manager
        .iterate(&params(0, 0, "level", SortOrder::Ascending))
        .unwrap();
    // PROTECTED ties: beta before delta (flatten order);
    // SECURE ties: gamma before alpha (flatten order).
    assert_eq!(names(&result), ["beta", "delta", "gamma", "alpha"]);
}

/// Descending order reverses the key comparison only; ties still keep
/// flatten order.
#[test]
fn test_descending_keeps_tie_order() {
    let tree = vec![
        leaf("gamma", Level::Secure),
        leaf("alpha", Level::Secure),
        leaf("beta", Level::Protected),
    ];
    let manager = RightManager::new(&tree);

    let result = manager
        .iterate(&params(0, 0, "level", SortOrder::Descending))
        .unwrap();
    assert_eq!(names(&result), ["gamma", "alpha", "beta"]);
}

/// Repeated identical calls return identical pages.
#[test]
fn test_iterate_idempotent() {
    let manager = RightManager::with_defaults();
    let request = params(4, 8, "name", SortOrder::Ascending);

    let first = manager.iterate(&request).unwrap();
    let second = manager.iterate(&request).unwrap();
    assert_eq!(first.results, second.results);
    assert_eq!(first.total, second.total);
}

/// Sorting on a field rights do not have fails as an iteration error.
#[test]
fn test_unknown_sort_field_is_error() {
    let manager = RightManager::with_defaults();
    let err = manager
        .iterate(&params(10, 0, "public_id", SortOrder::Ascending))
        .unwrap_err();
    assert!(matches!(err, IterationError::UnknownSortField(field) if field == "public_id"));
}

// =============================================================================
// Catalog Shape
// =============================================================================

/// The flat list and the tree document describe the same rights.
#[test]
fn test_tree_document_matches_flat_list() {
    let manager = RightManager::with_defaults();
    let document = tree_to_document(&configdb::rights::default_tree());

    fn collect_names(value: &Value, into: &mut Vec<String>) {
        match value {
            Value::Array(items) => {
                for item in items {
                    collect_names(item, into);
                }
            }
            Value::Object(map) => {
                if let Some(name) = map.get("name").and_then(Value::as_str) {
                    into.push(name.to_string());
                }
            }
            _ => {}
        }
    }

    let mut from_tree = Vec::new();
    collect_names(&document, &mut from_tree);
    let from_list: Vec<String> = manager.rights().iter().map(|r| r.name.clone()).collect();
    assert_eq!(from_tree, from_list);
}

/// The default catalog flattens deterministically with the master right
/// first.
#[test]
fn test_default_catalog_order() {
    let rights = flatten(&configdb::rights::default_tree());
    assert_eq!(rights[0].name, "base.*");
    assert_eq!(rights[0].level, Level::Critical);

    let again = flatten(&configdb::rights::default_tree());
    assert_eq!(rights, again);
}
