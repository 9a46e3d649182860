//! Buckets and command-line front end for rbaclens
//!
//! This crate provides:
//! - the bucket framework ([`Bucket`], [`BucketSpec`], [`BucketRegistry`])
//! - the built-in `authorization` and `version` buckets
//! - table and JSON rendering of [`Results`]
//! - argument parsing and dispatch for the `rbaclens` binary

pub mod bucket;
pub mod buckets;
pub mod cli;
mod error;
pub mod output;

pub use bucket::{Bucket, BucketConfig, BucketFactory, BucketRegistry, BucketSpec, Cell, Results};
pub use cli::{dig, run, select_buckets, Args, Command, DigArgs};
pub use error::{BucketError, CliError};
pub use output::{render_human, write_results, OutputFormat};
