//! deprewatch Core
//!
//! Core domain model shared by every deprewatch crate: deprecation
//! records, catalogs, match results, and configuration.

pub mod annotation;
pub mod config;
pub mod record;

pub use annotation::{AnnotationStyle, ApiMatch, Severity};
pub use config::{CatalogConfig, Config, ConfigError, InferenceConfig};
pub use record::{Catalog, DeprecationRecord};
