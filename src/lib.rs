//! configdb - a strict, typed query and iteration core for a configuration
//! management database
//!
//! One uniform request shape (filter, sort, skip, limit) is turned into
//! either a composed aggregation pipeline against a document store, or an
//! equivalent in-memory traversal over the static permission catalog. Both
//! paths return the same envelope: a page of typed records plus the exact
//! total match count.

pub mod manager;
pub mod model;
pub mod observability;
pub mod query;
pub mod rights;
pub mod store;
