use super::{Bucket, BucketConfig, BucketSpec};
use crate::buckets;
use crate::error::BucketError;

/// Name-indexed collection of bucket specs.
///
/// Built once at startup and passed by reference.
#[derive(Debug, Default, Clone)]
pub struct BucketRegistry {
    specs: Vec<BucketSpec>,
}

impl BucketRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in bucket
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(buckets::authorization::spec());
        registry.register(buckets::version::spec());
        registry
    }

    /// Add a bucket, replacing any bucket of the same name.
    pub fn register(&mut self, spec: BucketSpec) {
        if let Some(existing) = self.specs.iter_mut().find(|s| s.name == spec.name) {
            log::warn!("bucket {:?} registered twice, keeping the latest", spec.name);
            *existing = spec;
            return;
        }
        self.specs.push(spec);
        self.specs.sort_by_key(|s| s.name);
    }

    /// Find a bucket by name or alias.
    pub fn resolve(&self, name: &str) -> Option<&BucketSpec> {
        self.specs.iter().find(|s| s.answers_to(name))
    }

    /// Canonical bucket names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.name).collect()
    }

    /// Every spec, sorted by name.
    pub fn specs(&self) -> &[BucketSpec] {
        &self.specs
    }

    /// Instantiate a bucket by name or alias.
    pub fn build(&self, name: &str, config: &BucketConfig) -> Result<Box<dyn Bucket>, BucketError> {
        let spec = self
            .resolve(name)
            .ok_or_else(|| BucketError::UnknownBucket(name.to_string()))?;
        if spec.require_client && config.client.is_none() {
            return Err(BucketError::MissingClient(spec.name.to_string()));
        }
        (spec.factory)(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::Results;
    use rbaclens_kube::test_utils::MockCluster;
    use std::sync::Arc;

    struct Static;

    #[async_trait::async_trait]
    impl Bucket for Static {
        async fn run(&self) -> Result<Results, BucketError> {
            Ok(Results::new("static"))
        }
    }

    fn static_spec(description: &'static str) -> BucketSpec {
        BucketSpec {
            name: "static",
            description,
            aliases: &["s"],
            side_effects: true,
            require_client: false,
            factory: |_| Ok(Box::new(Static) as Box<dyn Bucket>),
        }
    }

    #[test]
    fn test_defaults() {
        let registry = BucketRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["authorization", "version"]);
    }

    #[test]
    fn test_resolve_by_alias() {
        let registry = BucketRegistry::with_defaults();
        assert_eq!(registry.resolve("auth").unwrap().name, "authorization");
        assert_eq!(registry.resolve("authorizations").unwrap().name, "authorization");
        assert_eq!(registry.resolve("v").unwrap().name, "version");
        assert!(registry.resolve("secrets").is_none());
    }

    #[test]
    fn test_register_keeps_names_sorted() {
        let mut registry = BucketRegistry::with_defaults();
        registry.register(static_spec("first"));
        assert_eq!(registry.names(), vec!["authorization", "static", "version"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = BucketRegistry::new();
        registry.register(static_spec("first"));
        registry.register(static_spec("second"));
        assert_eq!(registry.specs().len(), 1);
        assert_eq!(registry.specs()[0].description, "second");
    }

    #[test]
    fn test_build_unknown() {
        let registry = BucketRegistry::with_defaults();
        let err = registry
            .build("secrets", &BucketConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, BucketError::UnknownBucket(ref n) if n == "secrets"));
    }

    #[test]
    fn test_build_without_client() {
        let registry = BucketRegistry::with_defaults();
        let err = registry.build("auth", &BucketConfig::default()).err().unwrap();
        assert!(matches!(err, BucketError::MissingClient(ref n) if n == "authorization"));
    }

    #[test]
    fn test_build_with_client() {
        let registry = BucketRegistry::with_defaults();
        let config = BucketConfig {
            client: Some(Arc::new(MockCluster::new())),
            namespace: "default".into(),
        };
        assert!(registry.build("version", &config).is_ok());
    }

    #[tokio::test]
    async fn test_build_clientless_bucket() {
        let mut registry = BucketRegistry::new();
        registry.register(static_spec("no client"));

        let bucket = registry.build("s", &BucketConfig::default()).unwrap();
        assert_eq!(bucket.run().await.unwrap().bucket, "static");
    }
}
