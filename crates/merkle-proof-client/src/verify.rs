//! CLI wrapper for offline proof verification

use clap::Args;
use merkle_proof_verify::{verify_strict, HashAlgorithm};
use tracing::info;

/// CLI arguments for the `verify` subcommand
#[derive(Clone, Debug, Args)]
pub struct VerifyArgs {
    /// Known Merkle root
    #[arg(long, env = "MERKLE_ROOT")]
    root: String,
    /// Transaction identifier (the leaf)
    #[arg(long)]
    id: String,
    /// Hash algorithm used to build the tree
    #[arg(long, default_value = "md5")]
    hash: HashAlgorithm,
    /// Proof nodes, from the leaf toward the root
    nodes: Vec<String>,
}

/// Run the `verify` subcommand: recompute the root from the leaf and its proof
pub fn run(args: VerifyArgs) -> Result<(), anyhow::Error> {
    let hasher = args.hash.hasher();
    info!(
        "Verifying {} against root {} with {} proof nodes ...",
        args.id,
        args.root,
        args.nodes.len()
    );

    verify_strict(hasher.as_ref(), &args.id, &args.nodes, &args.root)?;

    info!("Verification successful!");
    println!("{}: valid", args.id);
    Ok(())
}
