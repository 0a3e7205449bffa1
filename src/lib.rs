/// Satchel: the data core of the Studivance study planner
///
/// This library provides local-first persistence for a student's planner:
/// subjects, tasks, exams, notes, goals, timetable events, and chat
/// sessions with a study assistant, all stored as JSON documents in a
/// SQLite database.
///
/// ### Modules
///
/// - `store`: Schema-versioned document store over SQLite
/// - `repo`: Repository layer with in-memory snapshots per collection
/// - `exchange`: CSV import/export and JSON backup/restore
/// - `suggest`: Planner snapshots and applying suggested records
///
/// The repository is the main entry point: open a `store::LocalStore`,
/// wrap it in a `repo::Repository`, and every planner operation hangs off
/// that handle.

/// Configuration loading and merging
pub mod config;

/// Minimal CSV dialect shared by the exchange formats
pub mod csv;

/// Database connection management
pub mod db;

/// Data transfer objects accepted by the repository
pub mod dto;

/// Error types for the crate
pub mod errors;

/// CSV import/export and JSON backup/restore
pub mod exchange;

/// Identifier and timestamp helpers
pub mod ids;

/// Data models for planner records and chat sessions
pub mod models;

/// Repository layer for domain operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Persistent document store
pub mod store;

/// Planner snapshots and suggested records
pub mod suggest;

/// Shared proptest strategies and sample data for tests
#[cfg(test)]
pub mod test_utils;

pub use errors::{Error, Result};
