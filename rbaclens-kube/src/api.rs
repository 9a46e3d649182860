use crate::client::KubeClient;
use crate::error::KubeError;
use crate::types::VersionInfo;
use rbaclens_core::SubjectRulesReviewStatus;

/// The API server calls the buckets need.
///
/// [`KubeClient`] is the real implementation. Tests substitute canned
/// responses.
#[async_trait::async_trait]
pub trait ClusterApi: Send + Sync {
    /// Base URL of the API server, for display
    fn server(&self) -> &str;

    /// Rules the current identity holds in `namespace`
    async fn self_subject_rules_review(
        &self,
        namespace: &str,
    ) -> Result<SubjectRulesReviewStatus, KubeError>;

    /// API server build information
    async fn server_version(&self) -> Result<VersionInfo, KubeError>;
}

#[async_trait::async_trait]
impl ClusterApi for KubeClient {
    fn server(&self) -> &str {
        KubeClient::server(self)
    }

    async fn self_subject_rules_review(
        &self,
        namespace: &str,
    ) -> Result<SubjectRulesReviewStatus, KubeError> {
        self.authorization()
            .self_subject_rules_review(namespace)
            .await
    }

    async fn server_version(&self) -> Result<VersionInfo, KubeError> {
        self.discovery().server_version().await
    }
}
