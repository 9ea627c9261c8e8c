//! CLI wrapper running a batch against an authority

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use merkle_proof_client::{BatchOutcome, BatchRequestBuilder, ClientConfig, MerkleClient};
use merkle_proof_verify::HashAlgorithm;
use tracing::info;

/// CLI arguments for the `check` subcommand
#[derive(Clone, Debug, Args)]
pub struct CheckArgs {
    /// Authority host name or IP address
    #[arg(long, env = "MERKLE_AUTHORITY_HOST", default_value = "127.0.0.1")]
    host: String,
    /// Authority port
    #[arg(long, env = "MERKLE_AUTHORITY_PORT")]
    port: u16,
    /// Known Merkle root the proofs must lead to
    #[arg(long, env = "MERKLE_ROOT")]
    root: String,
    /// Path to a JSON client config (optional, uses defaults if not provided)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hash algorithm used by the authority (overrides config)
    #[arg(long)]
    hash: Option<HashAlgorithm>,
    /// Connect timeout in seconds (overrides config)
    #[arg(long)]
    connect_timeout_secs: Option<u64>,
    /// Read timeout in seconds (overrides config)
    #[arg(long)]
    read_timeout_secs: Option<u64>,
    /// File with one transaction identifier per line, appended after positional ones
    #[arg(long)]
    ids_file: Option<PathBuf>,
    /// Transaction identifiers to check, in request order
    identifiers: Vec<String>,
}

/// Run the `check` subcommand: verify every identifier and print the report as JSON
pub fn run(args: CheckArgs) -> Result<(), anyhow::Error> {
    let mut config = match &args.config {
        Some(path) => ClientConfig::load_from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(hash) = args.hash {
        config.hash = hash;
    }
    if args.connect_timeout_secs.is_some() {
        config.connect_timeout_secs = args.connect_timeout_secs;
    }
    if args.read_timeout_secs.is_some() {
        config.read_timeout_secs = args.read_timeout_secs;
    }

    let mut identifiers = args.identifiers;
    if let Some(path) = &args.ids_file {
        identifiers.extend(read_identifiers(path)?);
    }

    let request = BatchRequestBuilder::new(args.host, args.port, args.root)
        .digest_width(config.digest_width())
        .add_identifiers(identifiers)
        .build()?;

    info!(
        "Checking {} transactions against {} ...",
        request.len(),
        request.endpoint()
    );

    let client = MerkleClient::new(config);
    match client.run_batch(request)? {
        BatchOutcome::Completed(report) => {
            info!(
                "{} valid, {} invalid transactions",
                report.valid.len(),
                report.invalid.len()
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        BatchOutcome::NotAttempted { endpoint, reason } => Err(anyhow::anyhow!(
            "Batch not attempted, authority {} is unreachable: {}",
            endpoint,
            reason
        )),
    }
}

/// Read identifiers from a file, one per line, skipping blank lines
fn read_identifiers(path: &Path) -> Result<Vec<String>, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read identifiers from {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}
