// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! CLI module for running pose inference.
//!
//! This module contains the command-line interface logic, including argument
//! parsing and the `predict` command implementation.

// Modules
/// CLI arguments.
pub mod args;

/// Logging helpers and macros.
pub mod logging;

/// Prediction logic.
pub mod predict;
