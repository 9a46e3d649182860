//! Display rows for compacted rules.

use crate::rule::{PolicyRule, CORE_GROUP};
use serde::Serialize;
use std::collections::BTreeSet;

/// The four columns shown for one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRow {
    /// `resource.group` for every resource/group pair; bare `resource` for the core group.
    pub resources: Vec<String>,
    #[serde(rename = "nonResourceURLs")]
    pub non_resource_urls: Vec<String>,
    pub resource_names: Vec<String>,
    pub verbs: Vec<String>,
}

impl From<&PolicyRule> for RuleRow {
    fn from(rule: &PolicyRule) -> Self {
        let resources = match rule {
            PolicyRule::Resource(r) => {
                let groups = r.effective_api_groups();
                r.resources
                    .iter()
                    .flat_map(|resource| {
                        groups
                            .iter()
                            .map(move |group| combine_resource_group(resource, group))
                    })
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            }
            PolicyRule::NonResource(_) => Vec::new(),
        };

        Self {
            resources,
            non_resource_urls: rule.non_resource_urls().to_vec(),
            resource_names: rule.resource_names().to_vec(),
            verbs: rule.verbs().to_vec(),
        }
    }
}

/// Join a resource and its API group the way `kubectl` prints them.
///
/// A subresource suffix stays after the group: `deployments/scale` in `apps`
/// becomes `deployments.apps/scale`.
pub fn combine_resource_group(resource: &str, group: &str) -> String {
    let (base, subresource) = match resource.split_once('/') {
        Some((base, sub)) => (base, Some(sub)),
        None => (resource, None),
    };

    let mut combined = base.to_string();
    if group != CORE_GROUP {
        combined.push('.');
        combined.push_str(group);
    }
    if let Some(sub) = subresource {
        combined.push('/');
        combined.push_str(sub);
    }
    combined
}
