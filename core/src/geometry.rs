//! Distance and bearing helpers shared by every decision system.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::{Position, StickValue};

/// Upper bounds of the 45° sectors, measured from due east.
///
/// Each bound sits halfway between two compass directions (π/8, 3π/8, …).
const SECTOR_BOUNDS: [f64; 8] = [
    0.392_699_081_7,
    1.178_097_245_1,
    1.963_495_408_6,
    2.748_893_571_9,
    3.534_291_735_3,
    4.319_689_898_6,
    5.105_088_062_0,
    5.890_486_225_4,
];

/// Directions owned by each sector when sweeping counter-clockwise.
const COUNTER_CLOCKWISE: [StickValue; 8] = [
    StickValue::Right,
    StickValue::UpRight,
    StickValue::Up,
    StickValue::UpLeft,
    StickValue::Left,
    StickValue::DownLeft,
    StickValue::Down,
    StickValue::DownRight,
];

/// Directions owned by each sector when sweeping clockwise.
const CLOCKWISE: [StickValue; 8] = [
    StickValue::Right,
    StickValue::DownRight,
    StickValue::Down,
    StickValue::DownLeft,
    StickValue::Left,
    StickValue::UpLeft,
    StickValue::Up,
    StickValue::UpRight,
];

/// Distance between the player and a target, with the signed per-axis deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DistanceSample {
    /// Truncated Euclidean distance in pixels.
    pub distance: u32,
    /// Horizontal offset of the target relative to the player.
    pub dx: i32,
    /// Vertical offset of the target relative to the player, positive upward.
    pub dy: i32,
}

impl DistanceSample {
    /// Reports whether the sample lies within the inclusive radius.
    #[must_use]
    pub const fn within(&self, radius: u32) -> bool {
        self.distance <= radius
    }

    /// Reports whether the sample is strictly closer than `other`.
    #[must_use]
    pub const fn closer_than(&self, other: &Self) -> bool {
        self.distance < other.distance
    }
}

/// Measures the distance from the player to the target.
///
/// Axis-aligned targets and the four diagonal neighbours are resolved without
/// floating point. Everything else uses the Euclidean distance truncated
/// towards zero, so thresholds compare against whole pixels.
#[must_use]
pub fn distance_to(player: Position, target: Position) -> DistanceSample {
    let dx = target.x.saturating_sub(player.x);
    let dy = target.y.saturating_sub(player.y);

    let distance = if dx == 0 {
        dy.unsigned_abs()
    } else if dy == 0 {
        dx.unsigned_abs()
    } else if dx.unsigned_abs() == 1 && dy.unsigned_abs() == 1 {
        1
    } else {
        let dx = u64::from(dx.unsigned_abs());
        let dy = u64::from(dy.unsigned_abs());
        // Each square is at most 2^62, so the sum fits.
        truncated_sqrt(dx * dx + dy * dy)
    };

    DistanceSample { distance, dx, dy }
}

/// Integer square root rounded toward zero.
///
/// The floating-point estimate is only a starting point; it drifts once the
/// input exceeds 2^53.
fn truncated_sqrt(squared: u64) -> u32 {
    let mut root = (squared as f64).sqrt() as u64;
    while root.checked_mul(root).map_or(true, |value| value > squared) {
        root -= 1;
    }
    while (root + 1)
        .checked_mul(root + 1)
        .is_some_and(|value| value <= squared)
    {
        root += 1;
    }
    u32::try_from(root).unwrap_or(u32::MAX)
}

/// Whether the movement stick should approach or flee a target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directive {
    /// Point the stick at the target.
    Toward,
    /// Point the stick directly away from the target.
    Away,
}

/// Quantizes a delta into a compass direction, reporting unmatched angles.
///
/// Returns `None` only when the computed angle falls outside every sector,
/// which the sector table rules out for finite inputs.
#[must_use]
pub fn try_quantize(dx: i32, dy: i32) -> Option<StickValue> {
    if dx == 0 {
        return Some(if dy >= 0 {
            StickValue::Up
        } else {
            StickValue::Down
        });
    }
    if dy == 0 {
        return Some(if dx >= 0 {
            StickValue::Right
        } else {
            StickValue::Left
        });
    }

    sector(f64::from(dy).atan2(f64::from(dx)))
}

/// Quantizes a delta into one of the eight compass directions.
///
/// An angle that matches no sector falls back to [`StickValue::Right`] and is
/// reported as a policy anomaly.
#[must_use]
pub fn quantize(dx: i32, dy: i32) -> StickValue {
    try_quantize(dx, dy).unwrap_or_else(|| {
        tracing::warn!(dx, dy, "bearing matched no sector, defaulting to Right");
        StickValue::Right
    })
}

/// Quantizes the sample's bearing and applies the directive.
#[must_use]
pub fn steer(sample: &DistanceSample, directive: Directive) -> StickValue {
    let toward = quantize(sample.dx, sample.dy);
    match directive {
        Directive::Toward => toward,
        Directive::Away => toward.opposite(),
    }
}

fn sector(radians: f64) -> Option<StickValue> {
    if radians >= 0.0 {
        SECTOR_BOUNDS
            .iter()
            .zip(COUNTER_CLOCKWISE)
            .find(|(bound, _)| radians < **bound)
            .map(|(_, stick)| stick)
            .or_else(|| (radians <= TAU).then_some(StickValue::Right))
    } else if radians < 0.0 {
        SECTOR_BOUNDS
            .iter()
            .zip(CLOCKWISE)
            .find(|(bound, _)| radians > -**bound)
            .map(|(_, stick)| stick)
            .or_else(|| (radians >= -TAU).then_some(StickValue::Right))
    } else {
        None
    }
}
