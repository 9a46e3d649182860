//! Deterministic display order for compacted rules.

use crate::rule::{normalized, PolicyRule};
use std::cmp::{Ordering, Reverse};

/// Sort key over the normalized fields of a rule.
///
/// Field order is the comparison order: rules granting more verbs come first,
/// then verbs, resources, groups, resource names and URLs are compared as
/// sorted lists. The variant breaks the last tie so that two rules only
/// compare equal when they grant the same thing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    verb_count: Reverse<usize>,
    verbs: Vec<String>,
    resources: Vec<String>,
    api_groups: Vec<String>,
    resource_names: Vec<String>,
    non_resource_urls: Vec<String>,
    non_resource: bool,
}

impl SortKey {
    fn of(rule: &PolicyRule) -> Self {
        let verbs = normalized(rule.verbs());
        Self {
            verb_count: Reverse(verbs.len()),
            verbs,
            resources: normalized(rule.resources()),
            api_groups: match rule {
                PolicyRule::Resource(r) => r
                    .effective_api_groups()
                    .into_iter()
                    .map(str::to_string)
                    .collect::<std::collections::BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                PolicyRule::NonResource(_) => Vec::new(),
            },
            resource_names: normalized(rule.resource_names()),
            non_resource_urls: normalized(rule.non_resource_urls()),
            non_resource: !rule.is_resource(),
        }
    }
}

/// Total order used by [`sort_rules`].
pub fn compare_rules(a: &PolicyRule, b: &PolicyRule) -> Ordering {
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// Sort rules in place into display order.
///
/// The sort is stable, so rules with identical content keep their relative
/// order.
pub fn sort_rules(rules: &mut [PolicyRule]) {
    rules.sort_by_cached_key(SortKey::of);
}
