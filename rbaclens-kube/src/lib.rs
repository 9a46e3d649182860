//! Minimal Kubernetes API client for rbaclens
//!
//! This crate talks to exactly two endpoints: `SelfSubjectRulesReview`
//! creation and `GET /version`. It resolves credentials from a kubeconfig
//! file or the in-cluster service account.
//!
//! # Quick Start
//!
//! ```no_run
//! use rbaclens_kube::{ClusterConfig, ConfigOptions, KubeClient};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClusterConfig::load(&ConfigOptions::default())?;
//! let client = KubeClient::from_config(&config)?;
//!
//! let status = client
//!     .authorization()
//!     .self_subject_rules_review(&config.namespace)
//!     .await?;
//! println!("{} resource rules", status.resource_rules.len());
//!
//! let version = client.discovery().server_version().await?;
//! println!("server {}", version.git_version);
//! # Ok(())
//! # }
//! ```
//!
//! # Explicit configuration
//!
//! ```no_run
//! use rbaclens_kube::KubeClient;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), rbaclens_kube::KubeError> {
//! let client = KubeClient::builder()
//!     .server("https://10.0.0.1:6443")
//!     .bearer_token("eyJhbGciOi...")
//!     .insecure_skip_tls_verify(true)
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//! # let _ = client;
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod config;
mod error;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::ClusterApi;
pub use client::{Authorization, Discovery, KubeClient, KubeClientBuilder};
pub use config::{ClusterConfig, ConfigOptions, DEFAULT_NAMESPACE, SERVICE_ACCOUNT_DIR};
pub use error::{ApiStatus, KubeError};
pub use types::{
    SelfSubjectRulesReview, SelfSubjectRulesReviewSpec, VersionInfo, AUTHORIZATION_API_VERSION,
    SELF_SUBJECT_RULES_REVIEW_KIND,
};
