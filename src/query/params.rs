//! Collection parameters — the uniform filter/sort/pagination request shape.
//!
//! Every `iterate` call, regardless of backend, is described by one
//! [`CollectionParameters`] value. The HTTP layer parses query strings into
//! this shape; this module only validates it.

use serde_json::Value;

use super::errors::{QueryError, QueryResult};

/// Default sort field for every resource collection
pub const DEFAULT_SORT_FIELD: &str = "public_id";

/// Default page size when the caller does not specify one
pub const DEFAULT_LIMIT: u64 = 10;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parses the wire encoding (1 ascending, -1 descending)
    pub fn from_int(order: i8) -> Option<Self> {
        match order {
            1 => Some(SortOrder::Ascending),
            -1 => Some(SortOrder::Descending),
            _ => None,
        }
    }

    /// Returns the wire encoding
    pub fn as_int(&self) -> i8 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, SortOrder::Descending)
    }
}

/// A validated filter/sort/pagination request.
///
/// Invariants enforced at construction:
/// - `filter` is a document or empty (null / `{}` means match-all)
/// - `skip` is a multiple of `limit` whenever `limit > 0`
#[derive(Debug, Clone)]
pub struct CollectionParameters {
    /// Match predicate; `Value::Null` or an empty document matches everything
    pub filter: Value,
    /// Maximum page size; 0 means no limit
    pub limit: u64,
    /// Number of leading matches to skip
    pub skip: u64,
    /// Sort field name
    pub sort: String,
    /// Sort direction
    pub order: SortOrder,
}

impl CollectionParameters {
    /// Builds a validated parameter set.
    pub fn new(
        filter: Value,
        limit: u64,
        skip: u64,
        sort: impl Into<String>,
        order: SortOrder,
    ) -> QueryResult<Self> {
        if !matches!(filter, Value::Null | Value::Object(_)) {
            return Err(QueryError::InvalidFilter(value_kind(&filter)));
        }
        if limit > 0 && skip % limit != 0 {
            return Err(QueryError::MisalignedSkip { skip, limit });
        }
        Ok(Self {
            filter,
            limit,
            skip,
            sort: sort.into(),
            order,
        })
    }

    /// Match-all request for the first page of `limit` records.
    pub fn first_page(limit: u64) -> Self {
        Self {
            filter: Value::Null,
            limit,
            skip: 0,
            sort: DEFAULT_SORT_FIELD.to_string(),
            order: SortOrder::Ascending,
        }
    }

    /// Returns true when the filter matches every record.
    pub fn is_match_all(&self) -> bool {
        match &self.filter {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Page index implied by skip and limit. Only meaningful when `limit > 0`.
    pub fn page_index(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.skip / self.limit
        }
    }
}

impl Default for CollectionParameters {
    fn default() -> Self {
        Self::first_page(DEFAULT_LIMIT)
    }
}

/// Value type name for error messages
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a document",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_order_wire_encoding() {
        assert_eq!(SortOrder::from_int(1), Some(SortOrder::Ascending));
        assert_eq!(SortOrder::from_int(-1), Some(SortOrder::Descending));
        assert_eq!(SortOrder::from_int(0), None);
        assert_eq!(SortOrder::Descending.as_int(), -1);
    }

    #[test]
    fn test_match_all_detection() {
        let params = CollectionParameters::default();
        assert!(params.is_match_all());

        let params =
            CollectionParameters::new(json!({}), 10, 0, "name", SortOrder::Ascending).unwrap();
        assert!(params.is_match_all());

        let params = CollectionParameters::new(
            json!({"name": "router"}),
            10,
            0,
            "name",
            SortOrder::Ascending,
        )
        .unwrap();
        assert!(!params.is_match_all());
    }

    #[test]
    fn test_non_document_filter_rejected() {
        let err = CollectionParameters::new(json!("name"), 10, 0, "name", SortOrder::Ascending)
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter("a string")));
    }

    #[test]
    fn test_misaligned_skip_rejected() {
        let err =
            CollectionParameters::new(Value::Null, 2, 3, "name", SortOrder::Ascending).unwrap_err();
        assert!(matches!(
            err,
            QueryError::MisalignedSkip { skip: 3, limit: 2 }
        ));
    }

    #[test]
    fn test_aligned_skip_accepted() {
        let params =
            CollectionParameters::new(Value::Null, 2, 4, "name", SortOrder::Ascending).unwrap();
        assert_eq!(params.page_index(), 2);

        // skip is unconstrained when there is no limit
        let params =
            CollectionParameters::new(Value::Null, 0, 7, "name", SortOrder::Ascending).unwrap();
        assert_eq!(params.page_index(), 0);
    }
}
