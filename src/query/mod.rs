//! # Query subsystem
//!
//! The aggregation stage grammar, the pagination/count composer and the
//! uniform request shape. Stages are immutable values; pipelines compose by
//! ordered append; the page and count pipelines derived from one request
//! always share an identical match prefix.

mod errors;
mod params;
mod pipeline;
mod stage;

pub use errors::{QueryError, QueryResult};
pub use params::{CollectionParameters, SortOrder, DEFAULT_LIMIT, DEFAULT_SORT_FIELD};
pub use pipeline::{
    Pipeline, PipelineBuilder, QUICK_COUNT_FIELD, QUICK_SEARCH_FLAGS, TOTAL_FIELD,
};
pub use stage::{SortKey, Stage, REGEX_SIZE_LIMIT};

pub(crate) use stage::compile_pattern;
