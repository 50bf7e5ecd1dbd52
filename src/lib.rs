//! pm-migrate - project management migration library
//!
//! Converts project exports into import documents for a target system.
//!
//! # Core Concepts
//!
//! - **Classification**: a project is either a client project or a team
//!   member's personal project, decided from its name
//! - **Deduplication**: a task listed under several projects is emitted
//!   once per batch, preferring the client project's copy
//! - **Mapping**: categories, titles and sections map to activity types,
//!   phases and tracking labels through ordered rule tables
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.pm-migrate.toml`
//! - `error`: Error types and result aliases
//! - `model`: Source export and target document types
//! - `fields`: Custom field, description and priority extraction
//! - `classify`: Client vs team member project classification
//! - `mapping`: Activity, phase and tracking label tables
//! - `users`: User name validation and alias resolution
//! - `dedup`: Cross-project deduplication tracker
//! - `dates`: Lenient date parsing
//! - `transform`: Project and task transformation, batch façade
//! - `output`: Human and JSON output rendering

pub mod classify;
pub mod cli;
pub mod config;
pub mod dates;
pub mod dedup;
pub mod error;
pub mod fields;
pub mod mapping;
pub mod model;
pub mod output;
pub mod transform;
pub mod users;

pub use error::{Error, Result};
