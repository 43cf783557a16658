//! deprewatch language server
//!
//! Bridges the match engine to an LSP client: tracks open documents,
//! re-scans their full text on open and on every change, and publishes the
//! resulting matches as replace-all diagnostic sets.

pub mod backend;

pub use backend::Backend;
