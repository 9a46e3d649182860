//! Permissions of the current identity.

use crate::bucket::{Bucket, BucketConfig, BucketSpec, Cell, Results};
use crate::error::BucketError;
use rbaclens_core::normalize_review;
use rbaclens_kube::ClusterApi;
use std::sync::Arc;

pub const NAME: &str = "authorization";
const DESCRIPTION: &str =
    "Authorization checks your API permissions with the current context or the available token.";
const ALIASES: &[&str] = &["authorizations", "auth"];
const HEADERS: [&str; 4] = ["resources", "nonResourceURLs", "resourceNames", "verbs"];

pub fn spec() -> BucketSpec {
    BucketSpec {
        name: NAME,
        description: DESCRIPTION,
        aliases: ALIASES,
        side_effects: false,
        require_client: true,
        factory: AuthorizationBucket::from_config,
    }
}

/// Lists what the current identity may do in one namespace, compacted.
pub struct AuthorizationBucket {
    client: Arc<dyn ClusterApi>,
    namespace: String,
}

impl AuthorizationBucket {
    pub fn from_config(config: &BucketConfig) -> Result<Box<dyn Bucket>, BucketError> {
        let client = config
            .client
            .clone()
            .ok_or_else(|| BucketError::MissingClient(NAME.to_string()))?;
        Ok(Box::new(Self {
            client,
            namespace: config.namespace.clone(),
        }))
    }
}

#[async_trait::async_trait]
impl Bucket for AuthorizationBucket {
    async fn run(&self) -> Result<Results, BucketError> {
        let mut results = Results::new(NAME);
        results.add_comment(format!(
            "Checking current context/token permissions in the {:?} namespace.",
            self.namespace
        ));

        let status = self
            .client
            .self_subject_rules_review(&self.namespace)
            .await?;
        let normalized = normalize_review(&status)?;

        results.set_headers(HEADERS);
        for row in normalized.rows() {
            results.add_row(vec![
                Cell::from(row.resources),
                Cell::from(row.non_resource_urls),
                Cell::from(row.resource_names),
                Cell::from(row.verbs),
            ]);
        }
        if let Some(warning) = normalized.warning {
            results.add_comment(warning);
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbaclens_core::{NonResourceRuleRecord, ResourceRuleRecord, SubjectRulesReviewStatus};
    use rbaclens_kube::test_utils::MockCluster;
    use rbaclens_kube::KubeError;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn resource(verbs: &[&str], groups: &[&str], resources: &[&str]) -> ResourceRuleRecord {
        ResourceRuleRecord {
            verbs: strings(verbs),
            api_groups: strings(groups),
            resources: strings(resources),
            resource_names: Vec::new(),
        }
    }

    fn bucket_for(cluster: MockCluster, namespace: &str) -> Box<dyn Bucket> {
        AuthorizationBucket::from_config(&BucketConfig {
            client: Some(Arc::new(cluster)),
            namespace: namespace.to_string(),
        })
        .unwrap_or_else(|e| panic!("bucket should build: {e}"))
    }

    #[test]
    fn test_requires_client() {
        let result = AuthorizationBucket::from_config(&BucketConfig::default());
        assert!(matches!(result, Err(BucketError::MissingClient(_))));
    }

    #[tokio::test]
    async fn test_compacted_rows() {
        let cluster = MockCluster::new().with_review(SubjectRulesReviewStatus {
            resource_rules: vec![
                resource(&["get", "list"], &[""], &["pods"]),
                resource(&["watch"], &[""], &["pods"]),
                resource(&["get"], &["apps"], &["deployments/scale"]),
            ],
            non_resource_rules: vec![NonResourceRuleRecord {
                verbs: strings(&["get"]),
                non_resource_urls: strings(&["/healthz", "/version"]),
            }],
            incomplete: false,
            evaluation_error: String::new(),
        });

        let results = bucket_for(cluster.clone(), "team-a").run().await.unwrap();

        assert_eq!(cluster.requested_namespaces(), vec!["team-a"]);
        assert_eq!(results.bucket, "authorization");
        assert_eq!(
            results.headers,
            vec!["resources", "nonResourceURLs", "resourceNames", "verbs"]
        );
        assert_eq!(
            results.comments,
            vec!["Checking current context/token permissions in the \"team-a\" namespace."]
        );

        assert_eq!(
            results.rows[0],
            vec![
                Cell::List(strings(&["pods"])),
                Cell::List(Vec::new()),
                Cell::List(Vec::new()),
                Cell::List(strings(&["get", "list", "watch"])),
            ]
        );
        assert!(results
            .rows
            .iter()
            .any(|row| row[0] == Cell::List(strings(&["deployments.apps/scale"]))));
        for url in ["/healthz", "/version"] {
            assert!(results
                .rows
                .iter()
                .any(|row| row[1] == Cell::List(strings(&[url]))));
        }
    }

    #[tokio::test]
    async fn test_incomplete_review() {
        let cluster = MockCluster::new().with_review(SubjectRulesReviewStatus {
            resource_rules: vec![resource(&["get"], &[""], &["pods"])],
            non_resource_rules: Vec::new(),
            incomplete: true,
            evaluation_error: "webhook authorizer failed".into(),
        });

        let results = bucket_for(cluster, "default").run().await.unwrap();

        assert!(results.rows.is_empty());
        assert_eq!(results.headers.len(), 4);
        assert_eq!(
            results.comments.last().unwrap(),
            "warning: the list may be incomplete: webhook authorizer failed"
        );
    }

    #[tokio::test]
    async fn test_api_error_propagates() {
        let cluster =
            MockCluster::new().with_review_error(KubeError::Forbidden("not allowed".into()));

        let err = bucket_for(cluster, "default").run().await.unwrap_err();
        assert!(matches!(err, BucketError::Kube(KubeError::Forbidden(_))));
    }
}
