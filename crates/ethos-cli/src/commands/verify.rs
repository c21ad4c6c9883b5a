//! Verify a signature document against a stored graph file.

use std::path::Path;

use anyhow::{Context, Result};
use ethos_core::crypto::{SignatureDocument, verify_graph};
use ethos_core::Keypair;

use super::read_json_value;

/// Verifies a signature document against the canonical JSON of a graph
/// file. Returns whether verification succeeded.
///
/// The graph is re-read as raw JSON so that any field injected into the
/// stored file, known to the schema or not, participates in the hash.
pub fn run(sig: &Path, in_file: &Path, pubkey: &Path) -> Result<bool> {
    let document = SignatureDocument::from_file(sig)?;
    let graph = read_json_value(in_file)?;
    let verifying_key = Keypair::load_verifying_key(pubkey)
        .with_context(|| format!("failed to load public key {}", pubkey.display()))?;

    let outcome = verify_graph(&document, &graph, &verifying_key)?;
    println!("{outcome}");
    Ok(outcome.is_verified())
}
