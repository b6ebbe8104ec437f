use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use famulus_core::controller::Button;
use tracing::Level;

/// Headless runner for the Famulus NES core.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to an iNES (NROM) image
    #[arg(required = true)]
    pub rom: PathBuf,

    /// Frames to run before exiting
    #[arg(long, default_value_t = 60)]
    pub frames: u64,

    /// Write the last frame as a binary PPM
    #[arg(long, value_name = "PATH")]
    pub screenshot: Option<PathBuf>,

    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,

    /// Log every instruction the CPU runs (very noisy)
    #[arg(long)]
    pub trace: bool,

    /// Run the console on the background emulation thread
    #[arg(long)]
    pub threaded: bool,

    /// Hold a pad 1 button for the whole run; may repeat
    #[arg(long, value_enum)]
    pub hold: Vec<PadButton>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PadButton {
    A,
    B,
    Select,
    Start,
    Up,
    Down,
    Left,
    Right,
}

impl From<PadButton> for Button {
    fn from(button: PadButton) -> Self {
        match button {
            PadButton::A => Button::A,
            PadButton::B => Button::B,
            PadButton::Select => Button::Select,
            PadButton::Start => Button::Start,
            PadButton::Up => Button::Up,
            PadButton::Down => Button::Down,
            PadButton::Left => Button::Left,
            PadButton::Right => Button::Right,
        }
    }
}
