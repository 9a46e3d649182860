//! Conversion of review records into compound rules.

use crate::review::{NonResourceRuleRecord, ResourceRuleRecord, SubjectRulesReviewStatus};
use crate::rule::{NonResourceRule, PolicyRule, ResourceRule};

impl From<&ResourceRuleRecord> for ResourceRule {
    fn from(record: &ResourceRuleRecord) -> Self {
        Self {
            verbs: record.verbs.clone(),
            api_groups: record.api_groups.clone(),
            resources: record.resources.clone(),
            resource_names: record.resource_names.clone(),
        }
    }
}

impl From<&NonResourceRuleRecord> for NonResourceRule {
    fn from(record: &NonResourceRuleRecord) -> Self {
        Self {
            verbs: record.verbs.clone(),
            non_resource_urls: record.non_resource_urls.clone(),
        }
    }
}

/// Map every record of a review into a compound rule.
///
/// Resource rules come first, then non-resource rules, each in input order.
/// Records are copied as-is; degenerate ones (no verbs, no resources) are
/// left for the compactor to drop.
pub fn to_policy_rules(status: &SubjectRulesReviewStatus) -> Vec<PolicyRule> {
    let resources = status
        .resource_rules
        .iter()
        .map(|record| PolicyRule::Resource(record.into()));
    let non_resources = status
        .non_resource_rules
        .iter()
        .map(|record| PolicyRule::NonResource(record.into()));
    resources.chain(non_resources).collect()
}
