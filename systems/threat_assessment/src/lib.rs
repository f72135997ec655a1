#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that summarises the threats surrounding the player in a frame.

use robotron_autopilot_core::{
    distance_to, DistanceSample, EntityCategory, PolicyConfig, Position, ThreatCategory,
};
use robotron_autopilot_frame::{query, Frame};

/// Outcome of assessing a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assessment {
    /// The frame carried no player, so nothing can be measured against it.
    NoPlayer,
    /// Threats measured relative to the player.
    Threats(ThreatSummary),
}

/// Entity occupying the adjacency slot, tagged with its category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdjacentThreat {
    /// Category of the adjacent entity.
    pub category: ThreatCategory,
    /// Distance and bearing of the adjacent entity.
    pub sample: DistanceSample,
}

impl AdjacentThreat {
    fn displaces(&self, current: &Self) -> bool {
        if self.category != current.category {
            return self.category.outranks(current.category);
        }

        self.sample.closer_than(&current.sample)
    }
}

/// Per-frame aggregate of the threats around the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreatSummary {
    player: Position,
    nearest: [Option<DistanceSample>; 7],
    adjacent: Option<AdjacentThreat>,
    close_move_count: u32,
    close_fire_count: u32,
}

impl ThreatSummary {
    fn empty(player: Position) -> Self {
        Self {
            player,
            nearest: [None; 7],
            adjacent: None,
            close_move_count: 0,
            close_fire_count: 0,
        }
    }

    /// Position of the player the summary was measured from.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player
    }

    /// Nearest entity of the provided category, if any was seen.
    #[must_use]
    pub fn nearest(&self, category: ThreatCategory) -> Option<DistanceSample> {
        self.nearest[usize::from(category.rank())]
    }

    /// Highest-priority entity within its category's adjacency radius.
    #[must_use]
    pub const fn adjacent(&self) -> Option<AdjacentThreat> {
        self.adjacent
    }

    /// Number of entities within their category's close-move radius.
    #[must_use]
    pub const fn close_move_count(&self) -> u32 {
        self.close_move_count
    }

    /// Number of entities within their category's close-fire radius.
    #[must_use]
    pub const fn close_fire_count(&self) -> u32 {
        self.close_fire_count
    }

    fn record(&mut self, category: ThreatCategory, sample: DistanceSample, config: &PolicyConfig) {
        let slot = &mut self.nearest[usize::from(category.rank())];
        if slot.map_or(true, |existing| sample.closer_than(&existing)) {
            *slot = Some(sample);
        }

        let radii = config.radii(category);
        if radii.close_move.is_some_and(|radius| sample.within(radius)) {
            self.close_move_count = self.close_move_count.saturating_add(1);
        }
        if radii.close_fire.is_some_and(|radius| sample.within(radius)) {
            self.close_fire_count = self.close_fire_count.saturating_add(1);
        }

        if sample.within(radii.adjacent) {
            let candidate = AdjacentThreat { category, sample };
            match &mut self.adjacent {
                Some(existing) => {
                    if candidate.displaces(existing) {
                        *existing = candidate;
                    }
                }
                None => self.adjacent = Some(candidate),
            }
        }
    }
}

/// Threat assessment system configured with the per-category radii.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreatAssessment {
    config: PolicyConfig,
}

impl ThreatAssessment {
    /// Creates a new assessment system using the provided tuning values.
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// Scans every entity of the frame once and summarises the threats.
    ///
    /// The player's own avatar and bullets never count as threats, and
    /// entities of unknown category are skipped.
    #[must_use]
    pub fn summarize(&self, frame: &Frame) -> Assessment {
        let Some(player) = query::player(frame) else {
            tracing::debug!("player location not found");
            return Assessment::NoPlayer;
        };

        let mut summary = ThreatSummary::empty(player);
        for entity in query::entities(frame) {
            let category = match entity.category.threat() {
                Some(category) => category,
                None => {
                    if entity.category == EntityCategory::Unknown {
                        tracing::trace!(
                            x = entity.position.x,
                            y = entity.position.y,
                            "skipping entity of unknown category"
                        );
                    }
                    continue;
                }
            };

            let sample = distance_to(player, entity.position);
            tracing::trace!(
                ?category,
                distance = sample.distance,
                dx = sample.dx,
                dy = sample.dy,
                "measured entity"
            );
            summary.record(category, sample, &self.config);
        }

        tracing::trace!(
            adjacent = ?summary.adjacent.map(|threat| threat.category),
            close_move = summary.close_move_count,
            close_fire = summary.close_fire_count,
            "frame assessed"
        );
        Assessment::Threats(summary)
    }
}
