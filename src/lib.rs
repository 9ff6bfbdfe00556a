//! todo - Local To-Do List Library
//!
//! This library provides the core of the todo CLI: a durable task store,
//! input validation, and the filtered views the command line renders.
//!
//! # Core Concepts
//!
//! - **Tasks**: flat records with a name, description, and completion flag
//! - **Store**: the authoritative collection; every mutation is persisted
//! - **Persistence**: a JSON array under one key of a local key-value store
//! - **Filters**: `all` / `active` / `completed` views, incomplete first
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output envelopes
//! - `storage`: Key-value stores and the task persistence adapter
//! - `task`: Task records and the task store
//! - `validate`: Name/description validation
//! - `view`: Filtering, sorting, and counts

pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;
pub mod validate;
pub mod view;

pub use error::{Error, Result};
