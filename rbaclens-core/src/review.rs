//! Rules review wire types.
//!
//! These mirror the `status` of an `authorization.k8s.io/v1`
//! `SelfSubjectRulesReview`. The API server omits empty lists, so every list
//! field defaults to empty on deserialization.

use serde::{Deserialize, Serialize};

/// Result of a rules review for one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRulesReviewStatus {
    /// Rules on API resources.
    #[serde(default)]
    pub resource_rules: Vec<ResourceRuleRecord>,

    /// Rules on non-resource URLs such as `/healthz`.
    #[serde(default)]
    pub non_resource_rules: Vec<NonResourceRuleRecord>,

    /// True when the authorizer could not enumerate every rule.
    #[serde(default)]
    pub incomplete: bool,

    /// Why the review is incomplete, if the authorizer said so.
    #[serde(default)]
    pub evaluation_error: String,
}

/// One resource rule as reported by the authorizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRuleRecord {
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default)]
    pub api_groups: Vec<String>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default)]
    pub resource_names: Vec<String>,
}

/// One non-resource rule as reported by the authorizer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonResourceRuleRecord {
    #[serde(default)]
    pub verbs: Vec<String>,
    #[serde(default, rename = "nonResourceURLs")]
    pub non_resource_urls: Vec<String>,
}
