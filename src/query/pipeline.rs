//! Pipeline assembly and the pagination/count composer.
//!
//! [`PipelineBuilder::build`] and [`PipelineBuilder::count`] derive the two
//! pipelines behind every `iterate` call. Both are guaranteed to start from
//! the identical match predicate, so the returned page and the reported
//! total always agree on what is being counted.

use serde_json::Value;

use super::errors::QueryResult;
use super::params::CollectionParameters;
use super::stage::{SortKey, Stage};
use super::SortOrder;

/// Field name carrying the total in a count pipeline result
pub const TOTAL_FIELD: &str = "total";

/// Field name carrying the quick-search counter result
pub const QUICK_COUNT_FIELD: &str = "count";

/// Regex flags applied to quick-search patterns
pub const QUICK_SEARCH_FLAGS: &str = "imsx";

/// Secondary sort key appended to every page pipeline so pagination stays
/// deterministic when the primary sort key has duplicates
const TIEBREAK_FIELD: &str = "public_id";

/// An ordered sequence of aggregation stages
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Leading run of match stages; two pipelines derived from one request
    /// share this prefix.
    pub fn match_prefix(&self) -> &[Stage] {
        let end = self
            .stages
            .iter()
            .position(|stage| !matches!(stage, Stage::Match(_)))
            .unwrap_or(self.stages.len());
        &self.stages[..end]
    }

    /// Renders the pipeline in its document form.
    pub fn to_documents(&self) -> Vec<Value> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a Stage;
    type IntoIter = std::slice::Iter<'a, Stage>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

/// Accumulates stages into a pipeline.
///
/// Append-only; one builder instance per request. Builders are not shared
/// across threads.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    stages: Vec<Stage>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one stage.
    pub fn add_stage(&mut self, stage: Stage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    /// Finishes the accumulated pipeline.
    pub fn finish(self) -> Pipeline {
        Pipeline::new(self.stages)
    }

    /// Composes the page pipeline for a request:
    /// `[match?, sort(field + public_id tiebreak), skip, limit?]`.
    ///
    /// The match stage is omitted for a match-all filter. The limit stage is
    /// omitted when `limit == 0`; executing such a pipeline returns the full
    /// match set, so managers gate that path behind an explicit opt-in.
    pub fn build(mut self, params: &CollectionParameters) -> QueryResult<Pipeline> {
        if !params.is_match_all() {
            self.add_stage(Stage::match_(params.filter.clone())?);
        }

        let mut keys = vec![SortKey::new(params.sort.clone(), params.order)];
        if params.sort != TIEBREAK_FIELD {
            keys.push(SortKey::new(TIEBREAK_FIELD, SortOrder::Ascending));
        }
        self.add_stage(Stage::sort_keys(keys));

        self.add_stage(Stage::skip(params.skip));
        if params.limit > 0 {
            self.add_stage(Stage::limit(params.limit));
        }
        Ok(self.finish())
    }

    /// Composes the count pipeline for the same request:
    /// `[match?, count("total")]`, with the identical match predicate.
    ///
    /// Executing it yields zero or one document; absence means a total of
    /// zero, not an error.
    pub fn count(mut self, filter: &Value) -> QueryResult<Pipeline> {
        if !is_match_all(filter) {
            self.add_stage(Stage::match_(filter.clone())?);
        }
        self.add_stage(Stage::count(TOTAL_FIELD));
        Ok(self.finish())
    }

    /// Composes the quick-search counting pipeline: a case-insensitive
    /// regex match over `field` followed by a count.
    pub fn quick_count(mut self, field: &str, pattern: &str) -> QueryResult<Pipeline> {
        let predicate = Stage::regex(field, pattern, QUICK_SEARCH_FLAGS)?;
        self.add_stage(Stage::match_(predicate)?);
        self.add_stage(Stage::count(QUICK_COUNT_FIELD));
        Ok(self.finish())
    }
}

fn is_match_all(filter: &Value) -> bool {
    match filter {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
