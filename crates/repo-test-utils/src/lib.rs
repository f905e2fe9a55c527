//! Shared test utilities for the content repository workspace.
//!
//! Standardised fixtures used across crate test suites. Dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`content`]: [`content::TestContentRoot`] builder for temp repository roots

pub mod content;
