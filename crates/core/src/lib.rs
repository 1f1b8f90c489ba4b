//! harvest-core
//!
//! Core library for acquiring historical builds of a Windows module and the
//! PDBs that go with them.
//!
//! The pipeline fetches the module's Winbindex index, filters it down to the
//! Windows versions and architectures of interest, downloads each binary from
//! the public symbol server into a content-addressed cache, runs an external
//! tool to pull the matching PDB, and writes a CSV report sorted by PDB size.
//!
//! Network and process boundaries sit behind the [`services::transport::Transport`]
//! and [`services::extract::Extractor`] traits so the whole flow is testable offline.

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod platform;
pub mod services;

pub use error::{HarvestError, HarvestResult};

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
