//! rbaclens - Kubernetes permission inspector
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: log filter, overrides `-v`
//! - `KUBECONFIG`: kubeconfig path (first entry is used)
//! - `RBACLENS_OUTPUT`: default output format (`human` or `json`)

use anyhow::Result;
use clap::Parser;
use rbaclens_cli::{run, Args};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    run(args, &mut stdout.lock(), color).await?;
    Ok(())
}
