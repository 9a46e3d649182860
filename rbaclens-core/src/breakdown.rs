//! Expansion of compound rules into atomic rules.

use crate::rule::{AtomicRule, PolicyRule};

/// Expand one compound rule into the atomic rules it grants.
///
/// Resource rules yield one atom per `(verb, group, resource)` triple, each
/// keeping the full `resource_names` list. Non-resource rules yield one atom
/// per `(verb, url)` pair. A rule with no verbs, resources or URLs yields
/// nothing.
pub fn breakdown_rule(rule: &PolicyRule) -> Vec<AtomicRule> {
    match rule {
        PolicyRule::Resource(r) => {
            let groups = r.effective_api_groups();
            let mut atoms = Vec::with_capacity(r.verbs.len() * groups.len() * r.resources.len());
            for verb in &r.verbs {
                for group in &groups {
                    for resource in &r.resources {
                        atoms.push(AtomicRule::Resource {
                            verb: verb.clone(),
                            api_group: group.to_string(),
                            resource: resource.clone(),
                            resource_names: r.resource_names.clone(),
                        });
                    }
                }
            }
            atoms
        }
        PolicyRule::NonResource(r) => r
            .verbs
            .iter()
            .flat_map(|verb| {
                r.non_resource_urls.iter().map(move |url| AtomicRule::NonResource {
                    verb: verb.clone(),
                    url: url.clone(),
                })
            })
            .collect(),
    }
}

/// Expand every rule in order.
pub fn breakdown(rules: &[PolicyRule]) -> Vec<AtomicRule> {
    rules.iter().flat_map(breakdown_rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{permissions_of, NonResourceRule, ResourceRule};
    use std::collections::BTreeSet;

    #[test]
    fn test_breakdown_cross_product_order() {
        let rule: PolicyRule =
            ResourceRule::new(["get", "list"], [""], ["pods", "services"]).into();
        let atoms = breakdown_rule(&rule);

        let pairs: Vec<(&str, String)> = atoms
            .iter()
            .map(|a| match a {
                AtomicRule::Resource { verb, resource, .. } => (verb.as_str(), resource.clone()),
                AtomicRule::NonResource { .. } => unreachable!(),
            })
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("get", "pods".to_string()),
                ("get", "services".to_string()),
                ("list", "pods".to_string()),
                ("list", "services".to_string()),
            ]
        );
    }

    #[test]
    fn test_breakdown_keeps_resource_names_whole() {
        let rule: PolicyRule = ResourceRule::new(["get"], ["apps"], ["deployments", "statefulsets"])
            .with_resource_names(["web", "db"])
            .into();
        for atom in breakdown_rule(&rule) {
            match atom {
                AtomicRule::Resource { resource_names, .. } => {
                    assert_eq!(resource_names, vec!["web", "db"])
                }
                AtomicRule::NonResource { .. } => panic!("unexpected non-resource atom"),
            }
        }
    }

    #[test]
    fn test_breakdown_empty_groups_use_core() {
        let rule: PolicyRule = ResourceRule::new(["get"], Vec::<String>::new(), ["pods"]).into();
        let atoms = breakdown_rule(&rule);
        assert_eq!(atoms.len(), 1);
        assert!(matches!(
            &atoms[0],
            AtomicRule::Resource { api_group, .. } if api_group.is_empty()
        ));
    }

    #[test]
    fn test_breakdown_non_resource() {
        let rule: PolicyRule = NonResourceRule::new(["get", "post"], ["/healthz", "/livez"]).into();
        assert_eq!(breakdown_rule(&rule).len(), 4);
    }

    #[test]
    fn test_breakdown_degenerate_rules_yield_nothing() {
        let rules: Vec<PolicyRule> = vec![
            ResourceRule::new(Vec::<String>::new(), [""], ["pods"]).into(),
            ResourceRule::new(["get"], [""], Vec::<String>::new()).into(),
            NonResourceRule::new(["get"], Vec::<String>::new()).into(),
            NonResourceRule::new(Vec::<String>::new(), ["/healthz"]).into(),
        ];
        assert!(breakdown(&rules).is_empty());
    }

    #[test]
    fn test_breakdown_preserves_permissions() {
        let rules: Vec<PolicyRule> = vec![
            ResourceRule::new(["get", "watch"], ["", "batch"], ["jobs", "pods"])
                .with_resource_names(["a"])
                .into(),
            NonResourceRule::new(["get"], ["/api", "/apis/*"]).into(),
        ];
        let atoms = breakdown(&rules);
        let from_atoms: BTreeSet<_> = atoms.iter().map(AtomicRule::permission).collect();
        assert_eq!(from_atoms, permissions_of(&rules));
    }
}
