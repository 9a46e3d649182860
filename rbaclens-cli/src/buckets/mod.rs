//! Built-in buckets

pub mod authorization;
pub mod version;

pub use authorization::AuthorizationBucket;
pub use version::VersionBucket;
