use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

const TICK_RATE_RANGE: std::ops::RangeInclusive<u32> = 1..=240;
const FRAME_MS_RANGE: std::ops::RangeInclusive<u64> = 1..=1000;
const HOLD_MS_RANGE: std::ops::RangeInclusive<u64> = 10..=2000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tick rate must be between {min} and {max} ticks per second, got {value}")]
    TickRate { value: u32, min: u32, max: u32 },
    #[error("frame interval must be between {min} and {max} ms, got {value}")]
    FrameInterval { value: u64, min: u64, max: u64 },
    #[error("key hold window must be between {min} and {max} ms, got {value}")]
    HoldWindow { value: u64, min: u64, max: u64 },
}

/// Command-line options for the terminal front end.
#[derive(Debug, Clone, Parser)]
#[command(name = "asteroids", version, about = "Asteroids in the terminal")]
pub struct Config {
    /// Simulation ticks per second
    #[arg(long, default_value_t = 60)]
    pub tick_rate: u32,

    /// Milliseconds between rendered frames
    #[arg(long, default_value_t = 16)]
    pub frame_ms: u64,

    /// How long a key stays held after its last press when the terminal
    /// does not report key releases
    #[arg(long, default_value_t = 150)]
    pub hold_ms: u64,

    /// Seed for asteroid spawns; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file (filtered with RUST_LOG, default "info")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            frame_ms: 16,
            hold_ms: 150,
            seed: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TICK_RATE_RANGE.contains(&self.tick_rate) {
            return Err(ConfigError::TickRate {
                value: self.tick_rate,
                min: *TICK_RATE_RANGE.start(),
                max: *TICK_RATE_RANGE.end(),
            });
        }
        if !FRAME_MS_RANGE.contains(&self.frame_ms) {
            return Err(ConfigError::FrameInterval {
                value: self.frame_ms,
                min: *FRAME_MS_RANGE.start(),
                max: *FRAME_MS_RANGE.end(),
            });
        }
        if !HOLD_MS_RANGE.contains(&self.hold_ms) {
            return Err(ConfigError::HoldWindow {
                value: self.hold_ms,
                min: *HOLD_MS_RANGE.start(),
                max: *HOLD_MS_RANGE.end(),
            });
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }

    pub fn hold_window(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}
