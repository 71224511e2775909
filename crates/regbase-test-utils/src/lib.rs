//! Shared test utilities for the regbase workspace.
//!
//! This crate provides standardised test fixtures for the crate test suites.
//! It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`] builder for baseline/ledger/revision layouts

pub mod workspace;

pub use workspace::TestWorkspace;
