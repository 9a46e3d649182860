//! Shared rule fixtures for the integration tests.
#![allow(dead_code)]

use rbaclens_core::{NonResourceRule, PolicyRule, ResourceRule};

/// Rules as a typical namespaced service account sees them.
pub fn service_account_rules() -> Vec<PolicyRule> {
    vec![
        ResourceRule::new(
            ["create"],
            ["authorization.k8s.io"],
            ["selfsubjectaccessreviews", "selfsubjectrulesreviews"],
        )
        .into(),
        ResourceRule::new(["get", "list", "watch"], [""], ["pods", "services"]).into(),
        ResourceRule::new(["get"], [""], ["pods", "configmaps"]).into(),
        ResourceRule::new(["get"], [""], ["configmaps"])
            .with_resource_names(["kube-root-ca.crt"])
            .into(),
        ResourceRule::new(["update", "patch"], ["apps"], ["deployments", "deployments/scale"])
            .with_resource_names(["web", "api"])
            .into(),
        ResourceRule::new(["patch"], ["apps"], ["deployments"])
            .with_resource_names(["api", "web"])
            .into(),
        NonResourceRule::new(
            ["get"],
            ["/api", "/api/*", "/apis", "/apis/*", "/healthz", "/livez"],
        )
        .into(),
        NonResourceRule::new(["get"], ["/healthz", "/readyz", "/version", "/version/"]).into(),
    ]
}

/// Rules as a cluster administrator sees them.
pub fn cluster_admin_rules() -> Vec<PolicyRule> {
    vec![
        ResourceRule::new(["*"], ["*"], ["*"]).into(),
        NonResourceRule::new(["*"], ["*"]).into(),
        ResourceRule::new(["get"], [""], ["pods"]).into(),
    ]
}

/// Rules spread over several groups with partially overlapping resources.
pub fn overlapping_group_rules() -> Vec<PolicyRule> {
    vec![
        ResourceRule::new(["get", "list"], ["", "apps"], ["pods", "replicasets"]).into(),
        ResourceRule::new(["get"], ["apps", "batch"], ["jobs"]).into(),
        ResourceRule::new(["delete"], ["batch"], ["jobs", "cronjobs"]).into(),
        ResourceRule::new(["list"], Vec::<String>::new(), ["events"]).into(),
        ResourceRule::new(["list"], ["events.k8s.io"], ["events"]).into(),
    ]
}

/// Every fixture, for property checks.
pub fn all_fixtures() -> Vec<Vec<PolicyRule>> {
    vec![
        service_account_rules(),
        cluster_admin_rules(),
        overlapping_group_rules(),
        Vec::new(),
    ]
}
