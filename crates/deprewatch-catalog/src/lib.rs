//! Catalog acquisition pipeline and durable catalog store
//!
//! Turns a remote deprecation-notes document into a structured, cached
//! [`Catalog`](deprewatch_core::Catalog): fetch the document, extract
//! heading/body sections, ask a generative-inference capability to structure
//! them, and persist the result per catalog version.
//!
//! Every failure past the initial fetch degrades to an empty catalog rather
//! than surfacing an error; consumers always receive a valid (possibly
//! empty) catalog.

pub mod acquirer;
pub mod extract;
pub mod fetch;
pub mod inference;
pub mod mock;
pub mod parse;
pub mod store;

pub use acquirer::CatalogAcquirer;
pub use extract::{Section, SectionExtractor};
pub use fetch::{DocumentFetcher, FetchError, HttpFetcher};
pub use inference::{AnthropicProvider, InferenceError, InferenceProvider, UnavailableProvider};
pub use mock::{MockFetcher, MockProvider};
pub use parse::{parse_records, try_parse_records, ParseError};
pub use store::{CatalogStore, StoreError};
