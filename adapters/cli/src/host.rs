//! Frame-request/action-response loop between a game environment and the policy.

use robotron_autopilot_core::{ConfigError, PolicyConfig};
use robotron_autopilot_frame::{Frame, SpriteReading};
use robotron_autopilot_system_decision::{Decision, DecisionPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoded action sent before the first decision: no movement, no fire.
pub const IDLE_ACTION: u8 = 0;

/// State reported by the game after every step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Sprites visible on screen, in the order the game reported them.
    #[serde(default)]
    pub entities: Vec<SpriteReading>,
    /// Whether the player died during the step.
    #[serde(default)]
    pub dead: bool,
}

/// Game the autopilot can drive.
pub trait Environment {
    /// Failure raised by the environment.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Board size in pixels as `(width, height)`.
    fn board_size(&mut self) -> Result<(u32, u32), Self::Error>;

    /// Starts a new game.
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Applies an encoded action and reports the next frame.
    ///
    /// Returns `Ok(None)` once the environment has no more frames to offer.
    fn step(&mut self, action: u8) -> Result<Option<Observation>, Self::Error>;
}

/// Errors that stop a pilot run.
#[derive(Debug, Error)]
pub enum PilotError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    /// The policy could not be built for the reported board.
    #[error("invalid policy configuration")]
    Config(#[from] ConfigError),
    /// The environment failed to answer a request.
    #[error("environment failed")]
    Environment(#[source] E),
}

/// Summary of a finished pilot run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PilotReport {
    /// Number of frames the policy decided.
    pub frames: u64,
    /// Number of observations that reported a dead player.
    pub deaths: u64,
}

/// Drives an environment with the decision policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pilot {
    config: PolicyConfig,
    max_frames: Option<u64>,
}

impl Pilot {
    /// Creates a pilot using the provided tuning values.
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self {
            config,
            max_frames: None,
        }
    }

    /// Stops the run after the provided number of decisions.
    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Runs until the environment is exhausted or the frame budget is spent.
    ///
    /// `on_decision` observes every decision before its action is sent back.
    pub fn fly<E, F>(
        &self,
        env: &mut E,
        mut on_decision: F,
    ) -> Result<PilotReport, PilotError<E::Error>>
    where
        E: Environment,
        F: FnMut(&Decision),
    {
        let (width, height) = env.board_size().map_err(PilotError::Environment)?;
        let policy = DecisionPolicy::for_board(self.config, width, height)?;
        tracing::info!(width, height, "board size reported");

        env.reset().map_err(PilotError::Environment)?;
        let mut observation = env.step(IDLE_ACTION).map_err(PilotError::Environment)?;
        let mut report = PilotReport::default();

        while let Some(current) = observation {
            if self.max_frames.is_some_and(|limit| report.frames >= limit) {
                tracing::info!(frames = report.frames, "frame budget spent");
                break;
            }
            if current.dead {
                report.deaths += 1;
                tracing::info!(frame = report.frames, deaths = report.deaths, "player died");
            }

            let frame = Frame::capture(&current.entities, policy.playfield());
            let decision = policy.decide(&frame);
            on_decision(&decision);
            report.frames += 1;

            observation = env
                .step(decision.encode())
                .map_err(PilotError::Environment)?;
        }

        tracing::info!(frames = report.frames, deaths = report.deaths, "pilot finished");
        Ok(report)
    }
}
