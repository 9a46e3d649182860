//! # rbaclens-core
//!
//! Policy rule normalization for Kubernetes permission reviews.
//!
//! The authorization service answers a `SelfSubjectRulesReview` with a list
//! of rules that is often redundant and overlapping. This crate turns that
//! list into the smallest equivalent set of rules, sorted deterministically
//! so the output is stable for display and diffing.
//!
//! ## Pipeline
//!
//! | Stage | Function | Input → Output |
//! |-------|----------|----------------|
//! | Convert | [`to_policy_rules`] | review status → compound rules |
//! | Breakdown | [`breakdown`] | compound rules → atomic rules |
//! | Compact | [`compact`] | atomic rules → minimal compound rules |
//! | Sort | [`sort_rules`] | compound rules → display order |
//!
//! [`normalize_review`] runs all four stages.
//!
//! ## Example
//!
//! ```rust
//! use rbaclens_core::{normalize_rules, PolicyRule, ResourceRule};
//!
//! let rules: Vec<PolicyRule> = vec![
//!     ResourceRule::new(["get"], [""], ["pods", "services"]).into(),
//!     ResourceRule::new(["list"], [""], ["services", "pods"]).into(),
//! ];
//!
//! let compacted = normalize_rules(&rules).unwrap();
//! assert_eq!(compacted.len(), 1);
//! assert_eq!(compacted[0].verbs(), ["get", "list"]);
//! ```
//!
//! ## Incomplete reviews
//!
//! When the authorizer flags a review as incomplete, [`normalize_review`]
//! returns no rules and a warning carrying the evaluation error:
//!
//! ```rust
//! use rbaclens_core::{normalize_review, SubjectRulesReviewStatus};
//!
//! let status = SubjectRulesReviewStatus {
//!     incomplete: true,
//!     evaluation_error: "etcd timeout".to_string(),
//!     ..Default::default()
//! };
//!
//! let result = normalize_review(&status).unwrap();
//! assert!(result.rules.is_empty());
//! assert!(result.warning.unwrap().contains("etcd timeout"));
//! ```

pub mod breakdown;
pub mod compact;
pub mod convert;
pub mod display;
pub mod error;
pub mod normalize;
pub mod review;
pub mod rule;
pub mod sort;

pub use breakdown::{breakdown, breakdown_rule};
pub use compact::compact;
pub use convert::to_policy_rules;
pub use display::{combine_resource_group, RuleRow};
pub use error::CompactionError;
pub use normalize::{normalize_review, normalize_rules, NormalizedRules, INCOMPLETE_WARNING_PREFIX};
pub use review::{NonResourceRuleRecord, ResourceRuleRecord, SubjectRulesReviewStatus};
pub use rule::{
    permissions_of, AtomicRule, NonResourceRule, Permission, PolicyRule, ResourceRule, CORE_GROUP,
};
pub use sort::{compare_rules, sort_rules};
