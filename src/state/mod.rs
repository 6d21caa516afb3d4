/// State management module
///
/// This module handles all gallery state, including:
/// - Shared data structures (data.rs)
/// - Address query parsing and rewriting (query.rs)
/// - The gallery view model: filtering, pagination, copy highlights (gallery.rs)

pub mod data;
pub mod gallery;
pub mod query;
