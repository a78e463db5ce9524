const _ENABLED_FEATURES: u32 = 0
    + if cfg!(feature = "r1") { 1 } else { 0 }
    + if cfg!(feature = "dk") { 1 } else { 0 };
const _: () = if _ENABLED_FEATURES > 1 {
    panic!("At most one board feature may be enabled.");
};

cfg_if::cfg_if! {
    if #[cfg(feature = "dk")] {
        pub mod dk;
        pub use dk::*;
    } else {
        // The r1 carrier is the default board.
        pub mod r1;
        pub use r1::*;
    }
}
