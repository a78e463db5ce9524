use anyhow::{Context, Result};
use std::process::Command;

use crate::constants::CHIP;

/// Attach to the running target and stream its defmt log.
pub fn attach(elf_path: &str) -> Result<()> {
    let mut cmd = Command::new("probe-rs");
    cmd.args(["attach", "--chip", CHIP, elf_path]);

    let status = cmd.status().context("Failed to attach probe-rs")?;

    if !status.success() {
        anyhow::bail!("probe-rs attach failed");
    }

    Ok(())
}
