//! Printer migration engine.
//!
//! Walks a tree of Windows logon scripts, extracts every `/i` and `/id`
//! printer install directive, merges duplicates so that a printer marked as
//! default anywhere stays default, and renders the canonical printer
//! repository file that the new print server publishes.
//!
//! The public API is organised into layers:
//!
//! - **[`directive`]**, **[`scan`]**, **[`walk`]**: find directives in lines, files, and trees
//! - **[`merge`]**, **[`report`]**: deduplicate and render
//! - **[`discover`]**: the single entry point combining the above
//! - **[`migrate`]**, **[`probe`]**: move the result between servers
//! - **[`commands`]**: top-level subcommand orchestration (`scan`, `migrate`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod directive;
pub mod discover;
pub mod error;
pub mod logging;
pub mod merge;
pub mod migrate;
pub mod platform;
pub mod probe;
pub mod report;
pub mod scan;
pub mod walk;
