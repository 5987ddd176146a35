//! quickopen - Quick search over browser tabs, bookmarks and history.
//!
//! This library routes a typed query to a search mode, matches it against
//! normalized browser records, scores and ranks the matches, and appends
//! search engine shortcuts. Text matching uses an in-memory Tantivy index
//! with either precise (prefix) or fuzzy (typo tolerant) matching.
//!
//! # Modules
//!
//! - [`commands`] - High-level operations (search, sources)
//! - [`query`] - Query routing into mode and term
//! - [`record`] - Normalized record types and browser data conversion
//! - [`provider`] - Data provider trait and implementations
//! - [`search`] - Match index trait, tag/folder lookup and search engines
//! - [`score`] - Final score calculation
//! - [`rank`] - Sorting, filtering and truncation
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod provider;
pub mod query;
pub mod rank;
pub mod record;
pub mod score;
pub mod search;

#[cfg(feature = "mcp")]
pub mod mcp;
