//! This build script copies the `memory.x` file from the crate root into
//! a directory where the linker can always find it at build time, and
//! exports the firmware and board versions to the crate.

use std::{env, fs::File, io::Write, path::PathBuf};

#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
enum HwVersion {
    #[default]
    R1,
    Dk,
}

impl HwVersion {
    fn as_str(self) -> &'static str {
        match self {
            Self::R1 => "r1",
            Self::Dk => "nrf52840-dk",
        }
    }
}

fn linker_data() -> &'static [u8] {
    include_bytes!("memory.x")
}

fn main() {
    let hw_features = [
        (cfg!(feature = "r1"), HwVersion::R1),
        (cfg!(feature = "dk"), HwVersion::Dk),
    ];

    let enabled_hw: Vec<HwVersion> = hw_features
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, version)| version)
        .collect();

    if enabled_hw.len() > 1 {
        panic!("At most one hardware feature may be enabled.");
    }

    let hw_ver = enabled_hw.first().cloned().unwrap_or_default();

    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(linker_data())
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var("CARGO_FEATURE_DEFMT").is_ok() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Build info. Builds outside a git checkout get "unknown".
    let pkg_version = env!("CARGO_PKG_VERSION");
    let git_hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|hash| hash.trim().to_owned())
        .unwrap_or_else(|| "unknown".to_owned());

    println!("cargo:rustc-env=COMMIT_HASH={git_hash}");
    println!("cargo:rustc-env=FW_VERSION={pkg_version}-{git_hash}");
    println!("cargo:rustc-env=HW_VERSION={}", hw_ver.as_str());
}
