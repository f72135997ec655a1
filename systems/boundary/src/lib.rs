#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that keeps the movement stick from driving the player into a wall.

use robotron_autopilot_core::{Playfield, Position, StickValue};

/// Rewrites move directions that would push the player into the playfield walls.
///
/// Corrections run in a fixed order: left wall, right wall, top wall, bottom
/// wall. Each one only inspects the direction produced by the previous step,
/// so a player standing in a literal corner may see the direction rewritten
/// twice in a single call.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoundaryCorrector {
    playfield: Playfield,
}

impl BoundaryCorrector {
    /// Creates a corrector for the provided playfield.
    #[must_use]
    pub const fn new(playfield: Playfield) -> Self {
        Self { playfield }
    }

    /// Playfield the corrector was built for.
    #[must_use]
    pub const fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    /// Corrects the raw move direction for the player's current position.
    #[must_use]
    pub fn correct(&self, raw: StickValue, player: Position) -> StickValue {
        let field = &self.playfield;
        let mut direction = raw;

        if field.at_left_wall(player) {
            direction = self.side_wall(direction, player, Side::Left);
        }
        if field.at_right_wall(player) {
            direction = self.side_wall(direction, player, Side::Right);
        }
        if field.at_top_wall(player) {
            direction = self.end_wall(direction, player, End::Top);
        }
        if field.at_bottom_wall(player) {
            direction = self.end_wall(direction, player, End::Bottom);
        }

        if direction != raw {
            tracing::trace!(
                ?raw,
                corrected = ?direction,
                x = player.x,
                y = player.y,
                "move direction corrected at wall"
            );
        }
        direction
    }

    fn side_wall(&self, direction: StickValue, player: Position, side: Side) -> StickValue {
        let (into, into_up, into_down) = side.inward();
        let along = side.along();

        if self.playfield.at_top_wall(player) {
            if direction == into || direction == into_up {
                return StickValue::Down;
            }
            if direction == StickValue::Up || direction == StickValue::Up.toward(along) {
                return along;
            }
            return direction;
        }

        if self.playfield.at_bottom_wall(player) {
            if direction == into || direction == into_down {
                return StickValue::Up;
            }
            if direction == StickValue::Down || direction == StickValue::Down.toward(along) {
                return along;
            }
            return direction;
        }

        if direction == into_up {
            StickValue::Up
        } else if direction == into_down {
            StickValue::Down
        } else if direction == into {
            if self.playfield.in_lower_half(player) {
                StickValue::Up
            } else {
                StickValue::Down
            }
        } else {
            direction
        }
    }

    fn end_wall(&self, direction: StickValue, player: Position, end: End) -> StickValue {
        let (into, into_right, into_left) = end.inward();

        if direction == into_right {
            StickValue::Right
        } else if direction == into_left {
            StickValue::Left
        } else if direction == into {
            if self.playfield.in_left_half(player) {
                StickValue::Right
            } else {
                StickValue::Left
            }
        } else {
            direction
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Straight, upward-diagonal and downward-diagonal directions into the wall.
    const fn inward(self) -> (StickValue, StickValue, StickValue) {
        match self {
            Self::Left => (StickValue::Left, StickValue::UpLeft, StickValue::DownLeft),
            Self::Right => (StickValue::Right, StickValue::UpRight, StickValue::DownRight),
        }
    }

    /// Horizontal direction leading back into open space.
    const fn along(self) -> StickValue {
        match self {
            Self::Left => StickValue::Right,
            Self::Right => StickValue::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum End {
    Top,
    Bottom,
}

impl End {
    /// Straight, rightward-diagonal and leftward-diagonal directions into the wall.
    const fn inward(self) -> (StickValue, StickValue, StickValue) {
        match self {
            Self::Top => (StickValue::Up, StickValue::UpRight, StickValue::UpLeft),
            Self::Bottom => (StickValue::Down, StickValue::DownRight, StickValue::DownLeft),
        }
    }
}

trait Diagonal {
    /// Combines a vertical direction with a horizontal one.
    fn toward(self, horizontal: StickValue) -> StickValue;
}

impl Diagonal for StickValue {
    fn toward(self, horizontal: StickValue) -> StickValue {
        match (self, horizontal) {
            (StickValue::Up, StickValue::Right) => StickValue::UpRight,
            (StickValue::Up, StickValue::Left) => StickValue::UpLeft,
            (StickValue::Down, StickValue::Right) => StickValue::DownRight,
            (StickValue::Down, StickValue::Left) => StickValue::DownLeft,
            (other, _) => other,
        }
    }
}
