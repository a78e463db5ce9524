use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(author, version, about = "Firmware helper for the two-wire bus master")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the firmware image
    Build(FirmwareArgs),
    /// Build and flash the firmware image
    Flash {
        #[command(flatten)]
        firmware: FirmwareArgs,

        /// Erase the whole chip first
        #[arg(long)]
        force: bool,
    },
    /// Build, flash, then stream the defmt log
    Run(FirmwareArgs),
    /// Stream the defmt log of an already flashed image
    Attach {
        #[arg(long)]
        release: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Board {
    /// Custom carrier with the hot-plug header
    R1,
    /// nRF52840-DK, bus on the Arduino header
    Dk,
}

impl Board {
    fn feature(self) -> &'static str {
        match self {
            Board::R1 => "r1",
            Board::Dk => "dk",
        }
    }
}

/// Selects the app's cargo features from named options.
#[derive(Args, Clone, Debug)]
pub struct FirmwareArgs {
    #[arg(long, value_enum, default_value_t = Board::R1)]
    pub board: Board,

    /// Only refresh the roster on the console `l` command
    #[arg(long)]
    pub no_hot_plug: bool,

    /// Log over RTT with defmt
    #[arg(long)]
    pub defmt: bool,

    #[arg(long)]
    pub release: bool,
}

impl FirmwareArgs {
    /// Comma-separated feature list for `cargo build --features`.
    pub fn features(&self) -> String {
        let mut features = vec![self.board.feature()];
        if !self.no_hot_plug {
            features.push("hot-plug");
        }
        if self.defmt {
            features.push("defmt");
        }
        features.join(",")
    }
}
