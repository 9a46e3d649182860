//! Compaction of atomic rules into a minimal set of compound rules.
//!
//! Resource atoms are merged in two phases:
//!
//! 1. Atoms sharing a verb and a set of resource names are merged into
//!    group/resource rectangles. A rectangle only ever joins groups that hold
//!    the identical set of resources, so a merged rule never grants a
//!    group/resource pair that was absent from the input.
//! 2. Rectangles sharing the same groups, resources and resource names are
//!    merged by unioning their verbs.
//!
//! Non-resource atoms only go through the second phase, keyed by URL.
//!
//! All grouping keys are built from `BTreeSet`s, which makes the output
//! independent of the order and duplication of the input.

use crate::error::CompactionError;
use crate::rule::{AtomicRule, NonResourceRule, Permission, PolicyRule, ResourceRule};
use std::collections::{BTreeMap, BTreeSet};

type Set = BTreeSet<String>;

/// Key of the first phase: one verb and one set of resource names.
type VerbKey = (String, Set);

/// Key of the second phase: groups, resources and resource names.
type ShapeKey = (Set, Set, Set);

/// Merge atomic rules into the smallest equivalent list of compound rules.
///
/// The result grants exactly the permissions of the input, contains no more
/// rules than the input, and is returned in a deterministic order. Running
/// the result back through [`crate::breakdown`] and `compact` yields the
/// same rules.
///
/// # Errors
///
/// Returns [`CompactionError::CoverageMismatch`] if the merged rules do not
/// cover exactly the distinct input permissions. That indicates a bug in the
/// merge, not bad input.
pub fn compact(
    atoms: impl IntoIterator<Item = AtomicRule>,
) -> Result<Vec<PolicyRule>, CompactionError> {
    let mut by_verb: BTreeMap<VerbKey, BTreeSet<(String, String)>> = BTreeMap::new();
    let mut by_url: BTreeMap<String, Set> = BTreeMap::new();
    let mut distinct: BTreeSet<Permission> = BTreeSet::new();

    for atom in atoms {
        distinct.insert(atom.permission());
        match atom {
            AtomicRule::Resource {
                verb,
                api_group,
                resource,
                resource_names,
            } => {
                let names: Set = resource_names.into_iter().collect();
                by_verb
                    .entry((verb, names))
                    .or_default()
                    .insert((api_group, resource));
            }
            AtomicRule::NonResource { verb, url } => {
                by_url.entry(url).or_default().insert(verb);
            }
        }
    }

    let mut by_shape: BTreeMap<ShapeKey, Set> = BTreeMap::new();
    for ((verb, names), pairs) in by_verb {
        for (groups, resources) in rectangles(pairs) {
            by_shape
                .entry((groups, resources, names.clone()))
                .or_default()
                .insert(verb.clone());
        }
    }

    let mut compacted = Vec::with_capacity(by_shape.len() + by_url.len());
    for ((groups, resources, names), verbs) in by_shape {
        if verbs.is_empty() || resources.is_empty() {
            continue;
        }
        compacted.push(PolicyRule::Resource(ResourceRule {
            verbs: verbs.into_iter().collect(),
            api_groups: groups.into_iter().collect(),
            resources: resources.into_iter().collect(),
            resource_names: names.into_iter().collect(),
        }));
    }
    for (url, verbs) in by_url {
        if verbs.is_empty() {
            continue;
        }
        compacted.push(PolicyRule::NonResource(NonResourceRule {
            verbs: verbs.into_iter().collect(),
            non_resource_urls: vec![url],
        }));
    }

    check_coverage(distinct.len(), &compacted)?;
    Ok(compacted)
}

/// Partition group/resource pairs into exact cross products.
///
/// Groups are bucketed by the set of resources they hold; each bucket is one
/// rectangle. Every input pair lands in exactly one rectangle.
fn rectangles(pairs: BTreeSet<(String, String)>) -> Vec<(Set, Set)> {
    let mut resources_by_group: BTreeMap<String, Set> = BTreeMap::new();
    for (group, resource) in pairs {
        resources_by_group.entry(group).or_default().insert(resource);
    }

    let mut groups_by_resources: BTreeMap<Set, Set> = BTreeMap::new();
    for (group, resources) in resources_by_group {
        groups_by_resources.entry(resources).or_default().insert(group);
    }

    groups_by_resources
        .into_iter()
        .map(|(resources, groups)| (groups, resources))
        .collect()
}

/// Rules produced by `compact` are pairwise disjoint, so the number of
/// permissions they grant is the sum of their cross-product sizes.
fn check_coverage(expected: usize, rules: &[PolicyRule]) -> Result<(), CompactionError> {
    let actual: usize = rules
        .iter()
        .map(|rule| match rule {
            PolicyRule::Resource(r) => r.verbs.len() * r.api_groups.len() * r.resources.len(),
            PolicyRule::NonResource(r) => r.verbs.len() * r.non_resource_urls.len(),
        })
        .sum();

    if actual != expected {
        return Err(CompactionError::CoverageMismatch { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::breakdown;
    use crate::rule::permissions_of;

    fn atom(verb: &str, group: &str, resource: &str, names: &[&str]) -> AtomicRule {
        AtomicRule::Resource {
            verb: verb.into(),
            api_group: group.into(),
            resource: resource.into(),
            resource_names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    fn url(verb: &str, url: &str) -> AtomicRule {
        AtomicRule::NonResource {
            verb: verb.into(),
            url: url.into(),
        }
    }

    #[test]
    fn test_round_trip_example() {
        let rule: PolicyRule =
            ResourceRule::new(["get", "list"], [""], ["pods", "services"]).into();
        let atoms = breakdown(std::slice::from_ref(&rule));
        assert_eq!(atoms.len(), 4);

        let compacted = compact(atoms).unwrap();
        assert_eq!(compacted, vec![rule]);
    }

    #[test]
    fn test_different_resource_names_stay_separate() {
        let compacted = compact(vec![
            atom("get", "", "pods", &[]),
            atom("get", "", "pods", &["my-pod"]),
        ])
        .unwrap();

        assert_eq!(compacted.len(), 2);
        assert!(compacted[0].resource_names().is_empty());
        assert_eq!(compacted[1].resource_names(), ["my-pod"]);
    }

    #[test]
    fn test_resource_names_order_is_ignored() {
        let compacted = compact(vec![
            atom("get", "", "pods", &["b", "a"]),
            atom("list", "", "pods", &["a", "b"]),
        ])
        .unwrap();

        assert_eq!(compacted.len(), 1);
        assert_eq!(compacted[0].verbs(), ["get", "list"]);
        assert_eq!(compacted[0].resource_names(), ["a", "b"]);
    }

    #[test]
    fn test_no_cross_product_widening() {
        // get on core/pods and apps/deployments must not become a rule that
        // also grants core/deployments or apps/pods.
        let atoms = vec![
            atom("get", "", "pods", &[]),
            atom("get", "apps", "deployments", &[]),
        ];
        let expected: BTreeSet<_> = atoms.iter().map(AtomicRule::permission).collect();

        let compacted = compact(atoms).unwrap();
        assert_eq!(compacted.len(), 2);
        assert_eq!(permissions_of(&compacted), expected);
    }

    #[test]
    fn test_groups_with_same_resources_merge() {
        let compacted = compact(vec![
            atom("get", "", "events", &[]),
            atom("get", "events.k8s.io", "events", &[]),
            atom("list", "", "events", &[]),
            atom("list", "events.k8s.io", "events", &[]),
        ])
        .unwrap();

        assert_eq!(
            compacted,
            vec![PolicyRule::Resource(ResourceRule::new(
                ["get", "list"],
                ["", "events.k8s.io"],
                ["events"]
            ))]
        );
    }

    #[test]
    fn test_non_resource_merges_verbs_per_url() {
        let compacted = compact(vec![
            url("get", "/healthz"),
            url("post", "/healthz"),
            url("get", "/version"),
        ])
        .unwrap();

        assert_eq!(
            compacted,
            vec![
                PolicyRule::NonResource(NonResourceRule::new(["get", "post"], ["/healthz"])),
                PolicyRule::NonResource(NonResourceRule::new(["get"], ["/version"])),
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        let compacted = compact(vec![
            atom("get", "", "pods", &[]),
            atom("get", "", "pods", &[]),
            url("get", "/api"),
            url("get", "/api"),
        ])
        .unwrap();
        assert_eq!(compacted.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(compact(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_rectangles_partition_pairs() {
        let pairs: BTreeSet<(String, String)> = [
            ("", "pods"),
            ("", "services"),
            ("apps", "pods"),
            ("apps", "services"),
            ("batch", "jobs"),
        ]
        .iter()
        .map(|(g, r)| (g.to_string(), r.to_string()))
        .collect();

        let rects = rectangles(pairs);
        assert_eq!(rects.len(), 2);

        let total: usize = rects.iter().map(|(g, r)| g.len() * r.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_check_coverage_reports_mismatch() {
        let rules = vec![PolicyRule::Resource(ResourceRule::new(
            ["get", "list"],
            [""],
            ["pods"],
        ))];
        assert_eq!(
            check_coverage(3, &rules),
            Err(CompactionError::CoverageMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(check_coverage(2, &rules).is_ok());
    }
}
