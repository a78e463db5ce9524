pub const TARGET: &str = "thumbv7em-none-eabihf";
pub const CHIP: &str = "nRF52840_xxAA";

pub const APP_MANIFEST: &str = "crates/twi-master-app/Cargo.toml";
pub const APP_NAME: &str = "twi-master-app";

/// Path of the firmware ELF produced by `cargo build` for this profile.
pub fn app_elf(release: bool) -> String {
    let profile = if release { "release" } else { "debug" };
    format!("target/{TARGET}/{profile}/{APP_NAME}")
}
