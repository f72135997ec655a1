//! Command-line configuration: policy tuning files and board size parsing.

use std::{fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use robotron_autopilot_core::{PolicyConfig, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH};
use thiserror::Error;

/// Board size used when none is given on the command line.
pub const DEFAULT_BOARD: (u32, u32) = BoardSize::DEFAULT.dimensions();

/// Board size argument written as `WIDTHxHEIGHT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl BoardSize {
    /// Board reported by the game when no other size is known.
    pub const DEFAULT: Self = Self {
        width: DEFAULT_BOARD_WIDTH,
        height: DEFAULT_BOARD_HEIGHT,
    };

    /// Size as a `(width, height)` pair.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for BoardSize {
    type Err = InvalidBoardSize;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (width, height) = parse_board_size(value)?;
        Ok(Self { width, height })
    }
}

/// Board size argument that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("board size '{0}' must look like WIDTHxHEIGHT with non-zero dimensions")]
pub struct InvalidBoardSize(pub String);

/// Parses a `WIDTHxHEIGHT` board size such as `665x492`.
pub fn parse_board_size(value: &str) -> Result<(u32, u32), InvalidBoardSize> {
    let invalid = || InvalidBoardSize(value.to_owned());
    let (width, height) = value.trim().split_once(['x', 'X']).ok_or_else(invalid)?;

    let width = width.trim().parse::<u32>().map_err(|_| invalid())?;
    let height = height.trim().parse::<u32>().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(invalid());
    }

    Ok((width, height))
}

/// Loads policy tuning from a TOML file, or the defaults when no path is given.
///
/// Omitted top-level entries keep their default values.
pub fn load_policy_config(path: Option<&Path>) -> Result<PolicyConfig> {
    let Some(path) = path else {
        return Ok(PolicyConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read policy config {}", path.display()))?;
    let config: PolicyConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse policy config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid policy config {}", path.display()))?;

    tracing::debug!(path = %path.display(), ?config, "loaded policy config");
    Ok(config)
}
