//! Aggregation stage grammar.
//!
//! Stages are immutable values built through validating constructors and
//! composed only by ordered append into a [`Pipeline`](super::Pipeline).
//! Stage order is semantically significant: match precedes sort/skip/limit,
//! and count terminates a counting pipeline.

use regex::{Regex, RegexBuilder};
use serde_json::{json, Map, Value};

use super::errors::{QueryError, QueryResult};
use super::params::SortOrder;

/// Upper bound on the compiled size of a user-supplied pattern.
///
/// Quick-search patterns come straight from request input; the compile step
/// rejects anything whose automaton would exceed this many bytes. Matching
/// itself is linear-time in the regex engine, so a pattern that compiles
/// cannot blow up at evaluation.
pub const REGEX_SIZE_LIMIT: usize = 1 << 16;

/// One sort key of a `$sort` stage
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }
}

/// A single aggregation operation
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep documents matching the predicate
    Match(Value),
    /// Order documents by the given keys, applied left to right
    Sort(Vec<SortKey>),
    /// Drop the first n documents
    Skip(u64),
    /// Keep at most n documents
    Limit(u64),
    /// Collapse the stream into one document `{field: count}`;
    /// yields no document at all when the stream is empty
    Count(String),
    /// Group documents by an id expression
    Group(Value),
}

impl Stage {
    /// Match stage over a predicate document.
    pub fn match_(predicate: Value) -> QueryResult<Self> {
        match predicate {
            Value::Object(_) => Ok(Stage::Match(predicate)),
            Value::Null => Err(QueryError::InvalidFilter("null")),
            Value::Bool(_) => Err(QueryError::InvalidFilter("a boolean")),
            Value::Number(_) => Err(QueryError::InvalidFilter("a number")),
            Value::String(_) => Err(QueryError::InvalidFilter("a string")),
            Value::Array(_) => Err(QueryError::InvalidFilter("an array")),
        }
    }

    /// Single-key sort stage.
    pub fn sort(field: impl Into<String>, order: SortOrder) -> Self {
        Stage::Sort(vec![SortKey::new(field, order)])
    }

    /// Multi-key sort stage.
    pub fn sort_keys(keys: Vec<SortKey>) -> Self {
        Stage::Sort(keys)
    }

    pub fn skip(count: u64) -> Self {
        Stage::Skip(count)
    }

    pub fn limit(count: u64) -> Self {
        Stage::Limit(count)
    }

    /// Terminal counting stage writing the count into `field`.
    pub fn count(field: impl Into<String>) -> Self {
        Stage::Count(field.into())
    }

    /// Group stage over an id expression (`"$field"` or a constant).
    pub fn group(id: Value) -> Self {
        Stage::Group(id)
    }

    /// Builds a `$regex` predicate document for use inside a match stage.
    ///
    /// The pattern is treated as untrusted input: it must compile within
    /// [`REGEX_SIZE_LIMIT`] and may only carry the flags i, m, s and x.
    pub fn regex(field: impl Into<String>, pattern: &str, flags: &str) -> QueryResult<Value> {
        compile_pattern(pattern, flags)?;
        let mut predicate = Map::new();
        predicate.insert(
            field.into(),
            json!({ "$regex": pattern, "$options": flags }),
        );
        Ok(Value::Object(predicate))
    }

    /// Stage operator name
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Match(_) => "$match",
            Stage::Sort(_) => "$sort",
            Stage::Skip(_) => "$skip",
            Stage::Limit(_) => "$limit",
            Stage::Count(_) => "$count",
            Stage::Group(_) => "$group",
        }
    }

    /// Renders the stage in its document form, for logging and for
    /// wire-level stores.
    pub fn to_document(&self) -> Value {
        match self {
            Stage::Match(predicate) => json!({ "$match": predicate }),
            Stage::Sort(keys) => {
                let mut spec = Map::new();
                for key in keys {
                    spec.insert(key.field.clone(), json!(key.order.as_int()));
                }
                json!({ "$sort": spec })
            }
            Stage::Skip(count) => json!({ "$skip": count }),
            Stage::Limit(count) => json!({ "$limit": count }),
            Stage::Count(field) => json!({ "$count": field }),
            Stage::Group(id) => json!({ "$group": { "_id": id } }),
        }
    }
}

/// Compiles an untrusted pattern with the stage flag set.
///
/// Shared with the in-memory evaluator so construction-time and
/// evaluation-time behavior cannot drift apart.
pub(crate) fn compile_pattern(pattern: &str, flags: &str) -> QueryResult<Regex> {
    let mut builder = RegexBuilder::new(pattern);
    builder.size_limit(REGEX_SIZE_LIMIT);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            other => return Err(QueryError::UnknownRegexFlag(other)),
        }
    }
    builder.build().map_err(|err| QueryError::InvalidRegex {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_requires_document() {
        assert!(Stage::match_(json!({"name": "switch"})).is_ok());
        assert!(matches!(
            Stage::match_(json!([1, 2])),
            Err(QueryError::InvalidFilter("an array"))
        ));
        assert!(matches!(
            Stage::match_(json!("name")),
            Err(QueryError::InvalidFilter("a string"))
        ));
    }

    #[test]
    fn test_stage_documents() {
        let stage = Stage::match_(json!({"active": true})).unwrap();
        assert_eq!(stage.to_document(), json!({"$match": {"active": true}}));

        assert_eq!(Stage::skip(4).to_document(), json!({"$skip": 4}));
        assert_eq!(Stage::limit(10).to_document(), json!({"$limit": 10}));
        assert_eq!(
            Stage::count("total").to_document(),
            json!({"$count": "total"})
        );
    }

    #[test]
    fn test_sort_document_preserves_key_order() {
        let stage = Stage::sort_keys(vec![
            SortKey::new("name", SortOrder::Descending),
            SortKey::new("public_id", SortOrder::Ascending),
        ]);
        let doc = stage.to_document();
        let spec = doc["$sort"].as_object().unwrap();
        let keys: Vec<&String> = spec.keys().collect();
        assert_eq!(keys, ["name", "public_id"]);
        assert_eq!(spec["name"], json!(-1));
        assert_eq!(spec["public_id"], json!(1));
    }

    #[test]
    fn test_regex_predicate() {
        let predicate = Stage::regex("fields.value", "core-.*", "ims").unwrap();
        assert_eq!(
            predicate,
            json!({"fields.value": {"$regex": "core-.*", "$options": "ims"}})
        );
    }

    #[test]
    fn test_regex_rejects_malformed_pattern() {
        let err = Stage::regex("name", "(unclosed", "i").unwrap_err();
        assert!(matches!(err, QueryError::InvalidRegex { .. }));
    }

    #[test]
    fn test_regex_rejects_unknown_flag() {
        let err = Stage::regex("name", "router", "ig").unwrap_err();
        assert!(matches!(err, QueryError::UnknownRegexFlag('g')));
    }

    #[test]
    fn test_regex_rejects_oversized_pattern() {
        // Nested bounded repetitions multiply past the compile limit.
        let pattern = "(a{1000}){1000}";
        assert!(matches!(
            Stage::regex("name", pattern, ""),
            Err(QueryError::InvalidRegex { .. })
        ));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::skip(0).name(), "$skip");
        assert_eq!(Stage::count("total").name(), "$count");
        assert_eq!(Stage::group(json!("$name")).name(), "$group");
    }
}
