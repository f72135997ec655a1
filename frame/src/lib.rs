#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame snapshot of the classified entities reported by the game.
//!
//! The game reports sprites in screen space, with the Y axis growing toward
//! the bottom of the display. [`Frame::capture`] flips every reading onto the
//! playfield axis used by the systems, classifies it, and remembers where the
//! player stands. Systems read the frame exclusively through [`query`].

use robotron_autopilot_core::{Entity, EntityCategory, Playfield, Position};
use serde::{Deserialize, Serialize};

/// Single sprite reading as reported by the game: screen `x`, screen `y`, name.
///
/// Serialized as a `[x, y, "Name"]` triple, matching the game's own tuples.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(i32, i32, String)", into = "(i32, i32, String)")]
pub struct SpriteReading {
    /// Horizontal screen coordinate.
    pub x: i32,
    /// Vertical screen coordinate, growing downward.
    pub y: i32,
    /// Sprite name assigned by the classifier.
    pub name: String,
}

impl SpriteReading {
    /// Creates a new sprite reading.
    #[must_use]
    pub fn new(x: i32, y: i32, name: impl Into<String>) -> Self {
        Self {
            x,
            y,
            name: name.into(),
        }
    }
}

impl From<(i32, i32, String)> for SpriteReading {
    fn from((x, y, name): (i32, i32, String)) -> Self {
        Self { x, y, name }
    }
}

impl From<SpriteReading> for (i32, i32, String) {
    fn from(reading: SpriteReading) -> Self {
        (reading.x, reading.y, reading.name)
    }
}

/// Classified entities of a single frame in playfield coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    entities: Vec<Entity>,
    player: Option<Position>,
}

impl Frame {
    /// Flips and classifies the readings of a frame, preserving their order.
    #[must_use]
    pub fn capture<'a, I>(readings: I, playfield: &Playfield) -> Self
    where
        I: IntoIterator<Item = &'a SpriteReading>,
    {
        let entities: Vec<Entity> = readings
            .into_iter()
            .map(|reading| {
                let category = EntityCategory::from_sprite_name(&reading.name);
                if category == EntityCategory::Unknown {
                    tracing::debug!(
                        name = %reading.name,
                        x = reading.x,
                        y = reading.y,
                        "unrecognised sprite"
                    );
                }
                Entity::new(playfield.to_position(reading.x, reading.y), category)
            })
            .collect();

        let frame = Self::from_entities(entities);
        if frame.player == Some(playfield.spawn_point()) {
            tracing::debug!("player on the spawn point, likely a new wave");
        }
        frame
    }

    /// Wraps entities whose coordinates are already in playfield space.
    ///
    /// The first [`EntityCategory::Player`] entity determines the player's
    /// position; later ones are ignored.
    #[must_use]
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let player = entities
            .iter()
            .find(|entity| entity.category == EntityCategory::Player)
            .map(|entity| entity.position);
        Self { entities, player }
    }
}

/// Query functions that provide read-only access to a captured frame.
pub mod query {
    use super::Frame;
    use robotron_autopilot_core::{Entity, Position};

    /// Position of the player, if the frame contains one.
    #[must_use]
    pub fn player(frame: &Frame) -> Option<Position> {
        frame.player
    }

    /// Entities of the frame in the order the game reported them.
    #[must_use]
    pub fn entities(frame: &Frame) -> &[Entity] {
        &frame.entities
    }
}
