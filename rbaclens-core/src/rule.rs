//! Permission rule types.
//!
//! A [`PolicyRule`] is a compound rule: each field may hold several values and
//! the rule grants their cross product. An [`AtomicRule`] is the same grant
//! reduced to one verb and one group/resource pair, or one verb and one URL.
//!
//! Both are tagged enums so that a rule can never carry resource fields and
//! non-resource URLs at the same time.

use crate::error::CompactionError;
use std::collections::BTreeSet;

/// The API group that holds core resources such as pods and services.
pub const CORE_GROUP: &str = "";

/// A rule on API resources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceRule {
    pub verbs: Vec<String>,

    /// API groups; an empty list means the core group.
    pub api_groups: Vec<String>,

    pub resources: Vec<String>,

    /// Instance names the rule is restricted to; empty means all instances.
    pub resource_names: Vec<String>,
}

impl ResourceRule {
    /// Create a rule covering every instance of the given resources.
    pub fn new(
        verbs: impl IntoIterator<Item = impl Into<String>>,
        api_groups: impl IntoIterator<Item = impl Into<String>>,
        resources: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            verbs: to_strings(verbs),
            api_groups: to_strings(api_groups),
            resources: to_strings(resources),
            resource_names: Vec::new(),
        }
    }

    /// Restrict the rule to specific instance names.
    pub fn with_resource_names(
        mut self,
        resource_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.resource_names = to_strings(resource_names);
        self
    }

    /// API groups with the empty list expanded to the core group.
    pub fn effective_api_groups(&self) -> Vec<&str> {
        if self.api_groups.is_empty() {
            vec![CORE_GROUP]
        } else {
            self.api_groups.iter().map(String::as_str).collect()
        }
    }
}

/// A rule on non-resource URLs such as `/healthz` or `/api/*`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonResourceRule {
    pub verbs: Vec<String>,
    pub non_resource_urls: Vec<String>,
}

impl NonResourceRule {
    pub fn new(
        verbs: impl IntoIterator<Item = impl Into<String>>,
        non_resource_urls: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            verbs: to_strings(verbs),
            non_resource_urls: to_strings(non_resource_urls),
        }
    }
}

/// A compound permission rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRule {
    Resource(ResourceRule),
    NonResource(NonResourceRule),
}

impl PolicyRule {
    pub fn verbs(&self) -> &[String] {
        match self {
            PolicyRule::Resource(rule) => &rule.verbs,
            PolicyRule::NonResource(rule) => &rule.verbs,
        }
    }

    /// API groups as stored; empty for non-resource rules.
    pub fn api_groups(&self) -> &[String] {
        match self {
            PolicyRule::Resource(rule) => &rule.api_groups,
            PolicyRule::NonResource(_) => &[],
        }
    }

    pub fn resources(&self) -> &[String] {
        match self {
            PolicyRule::Resource(rule) => &rule.resources,
            PolicyRule::NonResource(_) => &[],
        }
    }

    pub fn resource_names(&self) -> &[String] {
        match self {
            PolicyRule::Resource(rule) => &rule.resource_names,
            PolicyRule::NonResource(_) => &[],
        }
    }

    pub fn non_resource_urls(&self) -> &[String] {
        match self {
            PolicyRule::Resource(_) => &[],
            PolicyRule::NonResource(rule) => &rule.non_resource_urls,
        }
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, PolicyRule::Resource(_))
    }

    /// True if the rule grants nothing at all.
    pub fn is_empty(&self) -> bool {
        match self {
            PolicyRule::Resource(rule) => rule.verbs.is_empty() || rule.resources.is_empty(),
            PolicyRule::NonResource(rule) => {
                rule.verbs.is_empty() || rule.non_resource_urls.is_empty()
            }
        }
    }

    /// The set of permissions this rule grants.
    pub fn permissions(&self) -> BTreeSet<Permission> {
        let mut out = BTreeSet::new();
        match self {
            PolicyRule::Resource(rule) => {
                let names = normalized(&rule.resource_names);
                for verb in &rule.verbs {
                    for group in rule.effective_api_groups() {
                        for resource in &rule.resources {
                            out.insert(Permission::Resource {
                                verb: verb.clone(),
                                group: group.to_string(),
                                resource: resource.clone(),
                                resource_names: names.clone(),
                            });
                        }
                    }
                }
            }
            PolicyRule::NonResource(rule) => {
                for verb in &rule.verbs {
                    for url in &rule.non_resource_urls {
                        out.insert(Permission::NonResource {
                            verb: verb.clone(),
                            url: url.clone(),
                        });
                    }
                }
            }
        }
        out
    }
}

impl From<ResourceRule> for PolicyRule {
    fn from(rule: ResourceRule) -> Self {
        PolicyRule::Resource(rule)
    }
}

impl From<NonResourceRule> for PolicyRule {
    fn from(rule: NonResourceRule) -> Self {
        PolicyRule::NonResource(rule)
    }
}

impl std::fmt::Display for PolicyRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyRule::Resource(rule) => write!(
                f,
                "verbs={:?} apiGroups={:?} resources={:?} resourceNames={:?}",
                rule.verbs, rule.api_groups, rule.resources, rule.resource_names
            ),
            PolicyRule::NonResource(rule) => write!(
                f,
                "verbs={:?} nonResourceURLs={:?}",
                rule.verbs, rule.non_resource_urls
            ),
        }
    }
}

/// A single granted permission.
///
/// Two rule lists are equivalent when they grant the same set of permissions.
/// `resource_names` is kept sorted and deduplicated so that permissions
/// compare equal regardless of the order the authorizer listed the names in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    Resource {
        verb: String,
        group: String,
        resource: String,
        resource_names: Vec<String>,
    },
    NonResource {
        verb: String,
        url: String,
    },
}

/// The union of permissions granted by a list of rules.
pub fn permissions_of(rules: &[PolicyRule]) -> BTreeSet<Permission> {
    rules.iter().flat_map(PolicyRule::permissions).collect()
}

/// A rule with exactly one verb and one resource axis value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AtomicRule {
    Resource {
        verb: String,
        api_group: String,
        resource: String,
        /// Carried over unchanged from the compound rule.
        resource_names: Vec<String>,
    },
    NonResource {
        verb: String,
        url: String,
    },
}

impl AtomicRule {
    pub fn verb(&self) -> &str {
        match self {
            AtomicRule::Resource { verb, .. } | AtomicRule::NonResource { verb, .. } => verb,
        }
    }

    pub fn permission(&self) -> Permission {
        match self {
            AtomicRule::Resource {
                verb,
                api_group,
                resource,
                resource_names,
            } => Permission::Resource {
                verb: verb.clone(),
                group: api_group.clone(),
                resource: resource.clone(),
                resource_names: normalized(resource_names),
            },
            AtomicRule::NonResource { verb, url } => Permission::NonResource {
                verb: verb.clone(),
                url: url.clone(),
            },
        }
    }
}

impl From<AtomicRule> for PolicyRule {
    fn from(atom: AtomicRule) -> Self {
        match atom {
            AtomicRule::Resource {
                verb,
                api_group,
                resource,
                resource_names,
            } => PolicyRule::Resource(ResourceRule {
                verbs: vec![verb],
                api_groups: vec![api_group],
                resources: vec![resource],
                resource_names,
            }),
            AtomicRule::NonResource { verb, url } => PolicyRule::NonResource(NonResourceRule {
                verbs: vec![verb],
                non_resource_urls: vec![url],
            }),
        }
    }
}

impl TryFrom<&PolicyRule> for AtomicRule {
    type Error = CompactionError;

    /// Accepts only rules with a single verb and a single group/resource or
    /// URL. An empty group list counts as the core group.
    fn try_from(rule: &PolicyRule) -> Result<Self, Self::Error> {
        match rule {
            PolicyRule::Resource(r) => {
                let groups = r.effective_api_groups();
                match (r.verbs.as_slice(), groups.as_slice(), r.resources.as_slice()) {
                    ([verb], [group], [resource]) => Ok(AtomicRule::Resource {
                        verb: verb.clone(),
                        api_group: group.to_string(),
                        resource: resource.clone(),
                        resource_names: r.resource_names.clone(),
                    }),
                    _ => Err(CompactionError::NotAtomic(rule.to_string())),
                }
            }
            PolicyRule::NonResource(r) => {
                match (r.verbs.as_slice(), r.non_resource_urls.as_slice()) {
                    ([verb], [url]) => Ok(AtomicRule::NonResource {
                        verb: verb.clone(),
                        url: url.clone(),
                    }),
                    _ => Err(CompactionError::NotAtomic(rule.to_string())),
                }
            }
        }
    }
}

/// Sorted, deduplicated copy of a string list.
pub(crate) fn normalized(values: &[String]) -> Vec<String> {
    values
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn to_strings(values: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    values.into_iter().map(Into::into).collect()
}
