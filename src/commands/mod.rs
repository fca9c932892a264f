//! Command handlers. Each one calls a single collaborator, renders the result
//! and returns an error for `main` to report.

pub mod config;
pub mod regions;
pub mod update;
