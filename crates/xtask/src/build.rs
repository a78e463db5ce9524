use crate::cli::FirmwareArgs;
use crate::constants::{APP_MANIFEST, TARGET};
use anyhow::{Context, Result};
use std::process::Command;

/// Build the firmware image with exactly the features `firmware` selects.
pub fn build_firmware(firmware: &FirmwareArgs) -> Result<()> {
    let features = firmware.features();
    let mut cargo_build = Command::new("cargo");
    cargo_build
        .arg("build")
        .arg("--manifest-path")
        .arg(APP_MANIFEST)
        .arg("--target")
        .arg(TARGET)
        .args(["--no-default-features", "--features", &features]);

    if firmware.release {
        cargo_build.arg("--release");
    }

    println!("Building {} with features [{}]...", APP_MANIFEST, features);
    let status = cargo_build
        .status()
        .with_context(|| format!("Failed to build {}", APP_MANIFEST))?;

    if !status.success() {
        anyhow::bail!("Build failed for {}", APP_MANIFEST);
    }

    Ok(())
}
