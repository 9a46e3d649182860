//! Bucket framework
//!
//! A bucket is one named check. It is built from a [`BucketConfig`] by the
//! factory in its [`BucketSpec`], runs once, and returns a table of
//! [`Results`].
//!
//! ```rust
//! use rbaclens_cli::{BucketConfig, BucketRegistry};
//! use rbaclens_kube::{test_utils::MockCluster, VersionInfo};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let cluster = MockCluster::new().with_version(VersionInfo {
//!     git_version: "v1.30.0".into(),
//!     ..Default::default()
//! });
//! let config = BucketConfig {
//!     client: Some(Arc::new(cluster)),
//!     namespace: "default".into(),
//! };
//!
//! let registry = BucketRegistry::with_defaults();
//! let results = registry.build("v", &config)?.run().await?;
//! assert_eq!(results.rows[0][0].to_string(), "v1.30.0");
//! # Ok::<(), rbaclens_cli::BucketError>(())
//! # }).unwrap();
//! ```

mod registry;

pub use registry::BucketRegistry;

use crate::error::BucketError;
use rbaclens_kube::ClusterApi;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Results
// ============================================================================

/// One table cell: plain text or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::List(items) => write!(f, "[{}]", items.join(" ")),
        }
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<Vec<String>> for Cell {
    fn from(items: Vec<String>) -> Self {
        Cell::List(items)
    }
}

/// Output of a bucket run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Results {
    pub bucket: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    /// Free-form notes shown after the table.
    pub comments: Vec<String>,
}

impl Results {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.comments.push(comment.into());
    }

    pub fn set_headers<I, S>(&mut self, headers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        debug_assert!(
            self.headers.is_empty() || row.len() == self.headers.len(),
            "row width does not match headers"
        );
        self.rows.push(row);
    }
}

// ============================================================================
// Buckets
// ============================================================================

/// A runnable check
#[async_trait::async_trait]
pub trait Bucket: Send + Sync {
    async fn run(&self) -> Result<Results, BucketError>;
}

/// Everything a bucket factory may use.
#[derive(Clone, Default)]
pub struct BucketConfig {
    pub client: Option<Arc<dyn ClusterApi>>,
    pub namespace: String,
}

impl fmt::Debug for BucketConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketConfig")
            .field("client", &self.client.as_ref().map(|c| c.server().to_string()))
            .field("namespace", &self.namespace)
            .finish()
    }
}

pub type BucketFactory = fn(&BucketConfig) -> Result<Box<dyn Bucket>, BucketError>;

/// Registration entry for a bucket.
#[derive(Clone)]
pub struct BucketSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: &'static [&'static str],
    /// Running the bucket changes cluster state. Such buckets are skipped by `--all`.
    pub side_effects: bool,
    pub require_client: bool,
    pub factory: BucketFactory,
}

impl BucketSpec {
    /// True if `name` is this bucket's name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl fmt::Debug for BucketSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("side_effects", &self.side_effects)
            .field("require_client", &self.require_client)
            .finish()
    }
}
