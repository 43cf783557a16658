//! deprewatch match engine
//!
//! Computes every word-bounded occurrence of each catalog entry's API name
//! in a document's text. Pure: no caching, no incremental state; every
//! invocation rescans the full text.

pub mod matcher;

pub use matcher::{scan, MatchError};
