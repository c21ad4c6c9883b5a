//! Initialize configuration and signing keys.

use std::path::Path;

use anyhow::{Result, bail};
use ethos_core::{EthosConfig, Keypair};

/// Writes the default config and generates a keypair, skipping artifacts
/// that already exist.
pub fn run(config_path: &Path, private_key: &Path, public_key: &Path) -> Result<()> {
    if config_path.exists() {
        tracing::info!(path = %config_path.display(), "config already exists, leaving it");
    } else {
        EthosConfig::write_default(config_path)?;
    }

    match (private_key.exists(), public_key.exists()) {
        (true, true) => {
            tracing::info!("signing keys already exist, leaving them");
        }
        (false, false) => {
            Keypair::generate().persist(private_key, public_key)?;
        }
        _ => bail!(
            "key material is incomplete: exactly one of {} and {} exists; \
             remove the orphan before re-running init",
            private_key.display(),
            public_key.display()
        ),
    }

    println!(
        "Initialized {}, {}, and {}",
        config_path.display(),
        private_key.display(),
        public_key.display()
    );
    Ok(())
}
