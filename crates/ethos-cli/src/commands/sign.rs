//! Sign a stored graph file.

use std::path::Path;

use anyhow::{Context, Result};
use ethos_core::crypto::sign_graph;
use ethos_core::Keypair;

use super::read_json_value;

/// Signs the canonical JSON of a graph file and writes the signature
/// document.
pub fn run(in_file: &Path, key: &Path, out: &Path, force: bool) -> Result<()> {
    let signing_key = Keypair::load_signing_key(key)
        .with_context(|| format!("failed to load signing key {} (run `ethos init` first)", key.display()))?;
    let graph = read_json_value(in_file)?;

    let document = sign_graph(&graph, &signing_key)?;
    document
        .write_to(out, force)
        .with_context(|| format!("failed to write {}", out.display()))?;

    println!("Wrote signature to {}", out.display());
    Ok(())
}
