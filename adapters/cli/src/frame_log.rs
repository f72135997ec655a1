//! Environment that replays frames recorded as JSON lines.
//!
//! Each non-blank line holds one observation:
//!
//! ```text
//! {"entities": [[337, 246, "Player"], [489, 15, "Grunt"]], "dead": false}
//! ```

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use thiserror::Error;

use crate::host::{Environment, Observation};

/// Errors raised while replaying a frame log.
#[derive(Debug, Error)]
pub enum FrameLogError {
    /// The log could not be read.
    #[error("could not read frame log")]
    Io(#[from] io::Error),
    /// A line did not hold a valid observation.
    #[error("line {line} of the frame log is not a valid frame")]
    InvalidFrame {
        /// One-based line number of the offending entry.
        line: usize,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// The log was asked to restart after replay began.
    #[error("frame log cannot be rewound after {consumed} lines")]
    Rewind {
        /// Lines consumed before the reset request.
        consumed: usize,
    },
}

/// Replays recorded observations, ignoring the actions it is sent.
#[derive(Debug)]
pub struct FrameLogEnvironment<R> {
    reader: R,
    board: (u32, u32),
    line: usize,
    buffer: String,
}

impl FrameLogEnvironment<BufReader<File>> {
    /// Opens a frame log stored on disk.
    pub fn open(path: impl AsRef<Path>, board: (u32, u32)) -> Result<Self, FrameLogError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), board))
    }
}

impl<R: BufRead> FrameLogEnvironment<R> {
    /// Wraps a reader positioned at the first recorded frame.
    #[must_use]
    pub fn new(reader: R, board: (u32, u32)) -> Self {
        Self {
            reader,
            board,
            line: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    #[must_use]
    pub const fn lines_read(&self) -> usize {
        self.line
    }

    fn next_observation(&mut self) -> Result<Option<Observation>, FrameLogError> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let entry = self.buffer.trim();
            if entry.is_empty() {
                continue;
            }
            return serde_json::from_str(entry)
                .map(Some)
                .map_err(|source| FrameLogError::InvalidFrame {
                    line: self.line,
                    source,
                });
        }
    }
}

impl<R: BufRead> Environment for FrameLogEnvironment<R> {
    type Error = FrameLogError;

    fn board_size(&mut self) -> Result<(u32, u32), Self::Error> {
        Ok(self.board)
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        if self.line > 0 {
            return Err(FrameLogError::Rewind {
                consumed: self.line,
            });
        }
        Ok(())
    }

    fn step(&mut self, action: u8) -> Result<Option<Observation>, Self::Error> {
        tracing::trace!(action, line = self.line, "replaying next frame");
        self.next_observation()
    }
}
