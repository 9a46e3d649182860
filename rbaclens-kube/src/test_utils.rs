//! Test utilities for rbaclens-kube.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! rbaclens-kube = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use rbaclens_kube::{test_utils::MockCluster, ClusterApi, VersionInfo};
//!
//! # async fn example() -> Result<(), rbaclens_kube::KubeError> {
//! let cluster = MockCluster::new().with_version(VersionInfo {
//!     git_version: "v1.30.0".into(),
//!     ..Default::default()
//! });
//!
//! let info = cluster.server_version().await?;
//! assert_eq!(info.git_version, "v1.30.0");
//! # Ok(())
//! # }
//! ```

use crate::api::ClusterApi;
use crate::error::KubeError;
use crate::types::VersionInfo;
use rbaclens_core::SubjectRulesReviewStatus;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type Queue<T> = Arc<Mutex<VecDeque<Result<T, KubeError>>>>;

/// A mock API server.
///
/// Each call pops the next pre-programmed response for that endpoint.
#[derive(Clone)]
pub struct MockCluster {
    server: String,
    reviews: Queue<SubjectRulesReviewStatus>,
    versions: Queue<VersionInfo>,
    namespaces: Arc<Mutex<Vec<String>>>,
}

impl MockCluster {
    pub fn new() -> Self {
        Self {
            server: "https://mock.cluster.local".to_string(),
            reviews: Arc::default(),
            versions: Arc::default(),
            namespaces: Arc::default(),
        }
    }

    /// Queue a successful rules review.
    pub fn with_review(self, status: SubjectRulesReviewStatus) -> Self {
        self.reviews.lock().unwrap().push_back(Ok(status));
        self
    }

    /// Queue a failed rules review.
    pub fn with_review_error(self, error: KubeError) -> Self {
        self.reviews.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue a successful version response.
    pub fn with_version(self, info: VersionInfo) -> Self {
        self.versions.lock().unwrap().push_back(Ok(info));
        self
    }

    /// Queue a failed version response.
    pub fn with_version_error(self, error: KubeError) -> Self {
        self.versions.lock().unwrap().push_back(Err(error));
        self
    }

    /// Namespaces passed to `self_subject_rules_review`, in call order.
    pub fn requested_namespaces(&self) -> Vec<String> {
        self.namespaces.lock().unwrap().clone()
    }
}

impl Default for MockCluster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ClusterApi for MockCluster {
    fn server(&self) -> &str {
        &self.server
    }

    async fn self_subject_rules_review(
        &self,
        namespace: &str,
    ) -> Result<SubjectRulesReviewStatus, KubeError> {
        self.namespaces.lock().unwrap().push(namespace.to_string());
        self.reviews.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(KubeError::Other(
                "MockCluster: no more reviews configured".to_string(),
            ))
        })
    }

    async fn server_version(&self) -> Result<VersionInfo, KubeError> {
        self.versions.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(KubeError::Other(
                "MockCluster: no more versions configured".to_string(),
            ))
        })
    }
}
