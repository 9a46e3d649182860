//! Command-line arguments and command dispatch

use crate::bucket::{BucketConfig, BucketRegistry, BucketSpec, Results};
use crate::error::{BucketError, CliError};
use crate::output::{bucket_listing, write_results, OutputFormat};
use clap::{ArgAction, Parser, Subcommand};
use rbaclens_kube::{ClusterApi, ClusterConfig, ConfigOptions, KubeClient, DEFAULT_NAMESPACE};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Inspect what the current Kubernetes identity is allowed to do
#[derive(Parser, Debug)]
#[command(name = "rbaclens")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run buckets against the current cluster
    #[command(alias = "d")]
    Dig(DigArgs),

    /// List available buckets
    #[command(alias = "list")]
    Ls,
}

#[derive(clap::Args, Debug, Default)]
pub struct DigArgs {
    /// Bucket names or aliases, run in the given order
    #[arg(required_unless_present = "all")]
    pub buckets: Vec<String>,

    /// Run every bucket without side effects
    #[arg(short, long)]
    pub all: bool,

    /// Namespace to inspect (defaults to the context's namespace)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human, env = "RBACLENS_OUTPUT")]
    pub output: OutputFormat,

    /// Path to a kubeconfig file
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of current-context
    #[arg(long)]
    pub context: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,
}

impl DigArgs {
    fn config_options(&self) -> ConfigOptions {
        ConfigOptions {
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            insecure_skip_tls_verify: self.insecure,
        }
    }
}

/// Resolve the buckets to run.
///
/// With `all`, every bucket without side effects is selected. Named buckets
/// keep the requested order; a bucket named twice runs once.
pub fn select_buckets<'a>(
    registry: &'a BucketRegistry,
    names: &[String],
    all: bool,
) -> Result<Vec<&'a BucketSpec>, BucketError> {
    if all {
        return Ok(registry.specs().iter().filter(|s| !s.side_effects).collect());
    }

    let mut selected: Vec<&BucketSpec> = Vec::new();
    for name in names {
        let spec = registry
            .resolve(name)
            .ok_or_else(|| BucketError::UnknownBucket(name.clone()))?;
        if !selected.iter().any(|s| s.name == spec.name) {
            selected.push(spec);
        }
    }
    Ok(selected)
}

/// Build and run each bucket in order, stopping at the first failure.
pub async fn dig(
    registry: &BucketRegistry,
    specs: &[&BucketSpec],
    config: &BucketConfig,
) -> Result<Vec<Results>, BucketError> {
    let mut results = Vec::with_capacity(specs.len());
    for spec in specs {
        log::info!("running bucket {}", spec.name);
        let bucket = registry.build(spec.name, config)?;
        results.push(bucket.run().await?);
    }
    Ok(results)
}

/// Execute the parsed command, writing to `out`.
pub async fn run(args: Args, out: &mut impl Write, color: bool) -> Result<(), CliError> {
    let registry = BucketRegistry::with_defaults();

    match args.command {
        Command::Ls => write_results(
            out,
            &[bucket_listing(&registry)],
            OutputFormat::Human,
            color,
        ),
        Command::Dig(dig_args) => {
            let specs = select_buckets(&registry, &dig_args.buckets, dig_args.all)?;
            let config = bucket_config(&dig_args, &specs)?;
            let results = dig(&registry, &specs, &config).await?;
            write_results(out, &results, dig_args.output, color)
        }
    }
}

/// Load cluster credentials only when a selected bucket needs them.
fn bucket_config(args: &DigArgs, specs: &[&BucketSpec]) -> Result<BucketConfig, CliError> {
    if !specs.iter().any(|s| s.require_client) {
        return Ok(BucketConfig {
            client: None,
            namespace: args
                .namespace
                .clone()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        });
    }

    let cluster = ClusterConfig::load(&args.config_options())?;
    log::debug!("using cluster configuration {:?}", cluster);
    let client: Arc<dyn ClusterApi> = Arc::new(KubeClient::from_config(&cluster)?);

    Ok(BucketConfig {
        client: Some(client),
        namespace: args.namespace.clone().unwrap_or(cluster.namespace),
    })
}
