use std::path::PathBuf;

use clap::Parser;

/// Lights one of three traffic LEDs from a terminal window
#[derive(Debug, Parser)]
#[command(name = "traffic_light", version)]
pub struct Cli {
    /// Keep the LEDs in memory instead of driving the GPIO header
    #[arg(long)]
    pub simulate: bool,

    /// Where log lines go, the terminal belongs to the UI
    #[arg(long, default_value = "traffic-light.log")]
    pub log_file: PathBuf,

    /// Default level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
