//! Request and response bodies for the endpoints the client calls.

use rbaclens_core::SubjectRulesReviewStatus;
use serde::{Deserialize, Serialize};

pub const AUTHORIZATION_API_VERSION: &str = "authorization.k8s.io/v1";
pub const SELF_SUBJECT_RULES_REVIEW_KIND: &str = "SelfSubjectRulesReview";

/// A `SelfSubjectRulesReview` object, used both as request and response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfSubjectRulesReview {
    pub api_version: String,
    pub kind: String,
    pub spec: SelfSubjectRulesReviewSpec,
    /// Filled in by the API server; absent on requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubjectRulesReviewStatus>,
}

impl SelfSubjectRulesReview {
    /// Build a review request for one namespace.
    pub fn for_namespace(namespace: impl Into<String>) -> Self {
        Self {
            api_version: AUTHORIZATION_API_VERSION.to_string(),
            kind: SELF_SUBJECT_RULES_REVIEW_KIND.to_string(),
            spec: SelfSubjectRulesReviewSpec {
                namespace: namespace.into(),
            },
            status: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfSubjectRulesReviewSpec {
    #[serde(default)]
    pub namespace: String,
}

/// Body of `GET /version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub minor: String,
    #[serde(default)]
    pub git_version: String,
    #[serde(default)]
    pub git_commit: String,
    #[serde(default)]
    pub build_date: String,
    #[serde(default)]
    pub go_version: String,
    #[serde(default)]
    pub platform: String,
}
