use anyhow::{Context, Result};
use std::process::Command;

use crate::cli::FirmwareArgs;
use crate::constants::{app_elf, CHIP};

pub fn flash_firmware(firmware: &FirmwareArgs, force: bool) -> Result<()> {
    crate::build::build_firmware(firmware)?;

    if force {
        println!("Erasing chip...");
        let mut cmd = Command::new("probe-rs");
        cmd.args(["erase", "--chip", CHIP, "--allow-erase-all"]);
        let status = cmd.status().context("Failed to erase chip")?;
        if !status.success() {
            anyhow::bail!("Failed to erase chip");
        }
    }

    println!("Flashing firmware...");
    let elf = app_elf(firmware.release);
    let mut cmd = Command::new("probe-rs");
    cmd.args([
        "download",
        "--chip",
        CHIP,
        &elf,
        "--preverify",
        "--restore-unwritten",
    ]);

    let status = cmd.status().context("Failed to flash firmware")?;
    if !status.success() {
        anyhow::bail!("Failed to flash {}", elf);
    }

    Ok(())
}
