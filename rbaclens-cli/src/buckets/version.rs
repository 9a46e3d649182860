//! API server build information.

use crate::bucket::{Bucket, BucketConfig, BucketSpec, Cell, Results};
use crate::error::BucketError;
use rbaclens_kube::ClusterApi;
use std::sync::Arc;

pub const NAME: &str = "version";
const DESCRIPTION: &str = "Version dumps the API server version informations.";
const ALIASES: &[&str] = &["versions", "v"];

pub fn spec() -> BucketSpec {
    BucketSpec {
        name: NAME,
        description: DESCRIPTION,
        aliases: ALIASES,
        side_effects: false,
        require_client: true,
        factory: VersionBucket::from_config,
    }
}

pub struct VersionBucket {
    client: Arc<dyn ClusterApi>,
}

impl VersionBucket {
    pub fn from_config(config: &BucketConfig) -> Result<Box<dyn Bucket>, BucketError> {
        let client = config
            .client
            .clone()
            .ok_or_else(|| BucketError::MissingClient(NAME.to_string()))?;
        Ok(Box::new(Self { client }))
    }
}

#[async_trait::async_trait]
impl Bucket for VersionBucket {
    async fn run(&self) -> Result<Results, BucketError> {
        let info = self.client.server_version().await?;

        let mut results = Results::new(NAME);
        results.set_headers(["version", "buildDate", "platform", "goVersion"]);
        results.add_row(vec![
            Cell::from(info.git_version),
            Cell::from(info.build_date),
            Cell::from(info.platform),
            Cell::from(info.go_version),
        ]);
        Ok(results)
    }
}
