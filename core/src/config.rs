//! Immutable tuning values handed to the decision systems at construction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Position, ThreatCategory};

/// Board width reported by the game when no other size is known.
pub const DEFAULT_BOARD_WIDTH: u32 = 665;
/// Board height reported by the game when no other size is known.
pub const DEFAULT_BOARD_HEIGHT: u32 = 492;

/// Reasons a configuration value may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The wall margins overlap, leaving no interior to move in.
    #[error("board {width}x{height} leaves no room inside the wall margins")]
    BoardTooSmall {
        /// Reported board width in pixels.
        width: u32,
        /// Reported board height in pixels.
        height: u32,
    },
    /// The board cannot be addressed with signed pixel coordinates.
    #[error("board {width}x{height} exceeds the signed coordinate range")]
    BoardTooLarge {
        /// Reported board width in pixels.
        width: u32,
        /// Reported board height in pixels.
        height: u32,
    },
    /// A category was configured with an empty adjacency radius.
    #[error("adjacency radius for {category:?} must be non-zero")]
    ZeroAdjacency {
        /// Category carrying the invalid radius.
        category: ThreatCategory,
    },
}

/// Radii, in pixels, at which a hostile category influences the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRadii {
    /// Distance at which the entity overrides every other decision.
    pub adjacent: u32,
    /// Distance at which the player steps away from the entity.
    pub close_move: u32,
    /// Distance at which the player fires at the entity.
    pub close_fire: u32,
}

impl ThreatRadii {
    /// Creates a new set of radii.
    #[must_use]
    pub const fn new(adjacent: u32, close_move: u32, close_fire: u32) -> Self {
        Self {
            adjacent,
            close_move,
            close_fire,
        }
    }
}

/// Radii, in pixels, at which the player goes after a family member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyRadii {
    /// Distance at which rescuing overrides lower-priority decisions.
    pub adjacent: u32,
    /// Distance at which the player walks toward the family member.
    pub close: u32,
}

/// Uniform view over the radii of any threat category.
///
/// Family members never contribute to the close-move or close-fire counters,
/// so their counter radii are absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryRadii {
    /// Adjacency radius.
    pub adjacent: u32,
    /// Radius feeding the close-move counter.
    pub close_move: Option<u32>,
    /// Radius feeding the close-fire counter.
    pub close_fire: Option<u32>,
}

/// Inward margins that turn the board edges into wall thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryMargins {
    /// Margin applied at the right and bottom walls.
    pub border: u32,
    /// Margin applied at the left and top walls.
    pub edge: u32,
    /// Additional margin applied at the bottom wall.
    pub bottom_extra: u32,
}

impl Default for BoundaryMargins {
    fn default() -> Self {
        Self {
            border: 20,
            edge: 2,
            bottom_extra: 9,
        }
    }
}

/// Tuning values consumed by the threat assessment and the decision policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Radii for hostile shots.
    pub projectile: ThreatRadii,
    /// Radii for enforcers and tanks.
    pub priority_enemy: ThreatRadii,
    /// Radii for sphereoids and quarks.
    pub chase_enemy: ThreatRadii,
    /// Radii for grunts and brains.
    pub enemy: ThreatRadii,
    /// Radii for hulks.
    pub hulk: ThreatRadii,
    /// Radii for electrodes.
    pub obstacle: ThreatRadii,
    /// Radii for civilians.
    pub family: FamilyRadii,
    /// Close-move count above which the player stands still and fights.
    pub close_move_limit: u32,
    /// Margins used to derive the wall thresholds.
    pub margins: BoundaryMargins,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            projectile: ThreatRadii::new(40, 100, 150),
            priority_enemy: ThreatRadii::new(40, 50, 150),
            chase_enemy: ThreatRadii::new(40, 50, 175),
            enemy: ThreatRadii::new(40, 50, 75),
            hulk: ThreatRadii::new(50, 50, 50),
            obstacle: ThreatRadii::new(40, 40, 40),
            family: FamilyRadii {
                adjacent: 40,
                close: 75,
            },
            close_move_limit: 5,
            margins: BoundaryMargins::default(),
        }
    }
}

impl PolicyConfig {
    /// Returns the radii configured for the provided category.
    #[must_use]
    pub const fn radii(&self, category: ThreatCategory) -> CategoryRadii {
        let threat = match category {
            ThreatCategory::Projectile => self.projectile,
            ThreatCategory::PriorityEnemy => self.priority_enemy,
            ThreatCategory::ChaseEnemy => self.chase_enemy,
            ThreatCategory::Enemy => self.enemy,
            ThreatCategory::Hulk => self.hulk,
            ThreatCategory::Obstacle => self.obstacle,
            ThreatCategory::Family => {
                return CategoryRadii {
                    adjacent: self.family.adjacent,
                    close_move: None,
                    close_fire: None,
                }
            }
        };

        CategoryRadii {
            adjacent: threat.adjacent,
            close_move: Some(threat.close_move),
            close_fire: Some(threat.close_fire),
        }
    }

    /// Rejects configurations that would disable adjacency for a category.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for category in ThreatCategory::BY_PRIORITY {
            if self.radii(category).adjacent == 0 {
                return Err(ConfigError::ZeroAdjacency { category });
            }
        }
        Ok(())
    }
}

/// Static description of the playfield derived once from the board size.
///
/// Thresholds are expressed in flipped coordinates: the bottom wall sits near
/// zero and the top wall near the board height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Playfield {
    width: i32,
    height: i32,
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

impl Playfield {
    /// Derives the wall thresholds for a board of the provided size.
    pub fn from_board_size(
        width: u32,
        height: u32,
        margins: &BoundaryMargins,
    ) -> Result<Self, ConfigError> {
        let too_large = ConfigError::BoardTooLarge { width, height };
        let signed = |value: u32| i32::try_from(value).map_err(|_| too_large);

        let board_width = signed(width)?;
        let board_height = signed(height)?;
        let border = signed(margins.border)?;
        let edge = signed(margins.edge)?;
        let bottom_extra = signed(margins.bottom_extra)?;

        let left = edge;
        let right = board_width - border;
        let top = board_height - edge;
        let bottom = border.saturating_add(bottom_extra);

        if right <= left || top <= bottom {
            return Err(ConfigError::BoardTooSmall { width, height });
        }

        Ok(Self {
            width: board_width,
            height: board_height,
            left,
            right,
            top,
            bottom,
        })
    }

    /// Board width in pixels.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Board height in pixels.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Converts a screen-space Y coordinate into the flipped playfield axis.
    ///
    /// Readings far off the board saturate instead of wrapping.
    #[must_use]
    pub const fn flip_y(&self, screen_y: i32) -> i32 {
        self.height.saturating_sub(screen_y)
    }

    /// Converts a screen-space coordinate pair into a playfield position.
    #[must_use]
    pub const fn to_position(&self, screen_x: i32, screen_y: i32) -> Position {
        Position::new(screen_x, self.flip_y(screen_y))
    }

    /// Reports whether the position has reached the left wall threshold.
    #[must_use]
    pub const fn at_left_wall(&self, position: Position) -> bool {
        position.x <= self.left
    }

    /// Reports whether the position has reached the right wall threshold.
    #[must_use]
    pub const fn at_right_wall(&self, position: Position) -> bool {
        position.x >= self.right
    }

    /// Reports whether the position has reached the top wall threshold.
    #[must_use]
    pub const fn at_top_wall(&self, position: Position) -> bool {
        position.y >= self.top
    }

    /// Reports whether the position has reached the bottom wall threshold.
    #[must_use]
    pub const fn at_bottom_wall(&self, position: Position) -> bool {
        position.y <= self.bottom
    }

    /// Reports whether the position lies in the lower half of the board.
    #[must_use]
    pub const fn in_lower_half(&self, position: Position) -> bool {
        (position.y as i64) * 2 < self.height as i64
    }

    /// Reports whether the position lies in the left half of the board.
    #[must_use]
    pub const fn in_left_half(&self, position: Position) -> bool {
        (position.x as i64) * 2 < self.width as i64
    }

    /// Location where the player reappears at the start of every wave.
    #[must_use]
    pub const fn spawn_point(&self) -> Position {
        Position::new(self.width / 2, self.height - self.height / 2)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        let margins = BoundaryMargins::default();
        let width = DEFAULT_BOARD_WIDTH as i32;
        let height = DEFAULT_BOARD_HEIGHT as i32;
        Self {
            width,
            height,
            left: margins.edge as i32,
            right: width - margins.border as i32,
            top: height - margins.edge as i32,
            bottom: (margins.border + margins.bottom_extra) as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BoundaryMargins, ConfigError, Playfield, PolicyConfig, DEFAULT_BOARD_HEIGHT,
        DEFAULT_BOARD_WIDTH,
    };
    use crate::{Position, ThreatCategory};

    #[test]
    fn default_board_matches_the_reported_thresholds() {
        let playfield = Playfield::from_board_size(
            DEFAULT_BOARD_WIDTH,
            DEFAULT_BOARD_HEIGHT,
            &BoundaryMargins::default(),
        )
        .expect("default board is valid");

        assert_eq!(playfield, Playfield::default());
        assert!(playfield.at_left_wall(Position::new(2, 200)));
        assert!(!playfield.at_left_wall(Position::new(3, 200)));
        assert!(playfield.at_right_wall(Position::new(645, 200)));
        assert!(!playfield.at_right_wall(Position::new(644, 200)));
        assert!(playfield.at_top_wall(Position::new(300, 490)));
        assert!(!playfield.at_top_wall(Position::new(300, 489)));
        assert!(playfield.at_bottom_wall(Position::new(300, 29)));
        assert!(!playfield.at_bottom_wall(Position::new(300, 30)));
    }

    #[test]
    fn flipping_y_places_the_origin_at_the_bottom() {
        let playfield = Playfield::default();
        assert_eq!(playfield.flip_y(0), 492);
        assert_eq!(playfield.flip_y(492), 0);
        assert_eq!(playfield.to_position(310, 205), Position::new(310, 287));
    }

    #[test]
    fn flipping_off_board_readings_saturates() {
        let playfield = Playfield::default();
        assert_eq!(playfield.flip_y(i32::MIN), i32::MAX);
        assert_eq!(playfield.flip_y(i32::MAX), 492 - i32::MAX);
    }

    #[test]
    fn spawn_point_is_the_board_centre() {
        let playfield = Playfield::default();
        assert_eq!(playfield.spawn_point(), playfield.to_position(332, 246));
    }

    #[test]
    fn halves_split_on_the_board_midpoint() {
        let playfield = Playfield::default();
        assert!(playfield.in_lower_half(Position::new(0, 245)));
        assert!(!playfield.in_lower_half(Position::new(0, 246)));
        assert!(playfield.in_left_half(Position::new(332, 0)));
        assert!(!playfield.in_left_half(Position::new(333, 0)));
    }

    #[test]
    fn overlapping_margins_are_rejected() {
        let margins = BoundaryMargins::default();
        assert_eq!(
            Playfield::from_board_size(20, 492, &margins),
            Err(ConfigError::BoardTooSmall {
                width: 20,
                height: 492
            })
        );
        assert_eq!(
            Playfield::from_board_size(665, 30, &margins),
            Err(ConfigError::BoardTooSmall {
                width: 665,
                height: 30
            })
        );
    }

    #[test]
    fn oversized_boards_are_rejected() {
        assert_eq!(
            Playfield::from_board_size(u32::MAX, 492, &BoundaryMargins::default()),
            Err(ConfigError::BoardTooLarge {
                width: u32::MAX,
                height: 492
            })
        );
    }

    #[test]
    fn family_radii_carry_no_counters() {
        let config = PolicyConfig::default();
        let family = config.radii(ThreatCategory::Family);
        assert_eq!(family.adjacent, 40);
        assert_eq!(family.close_move, None);
        assert_eq!(family.close_fire, None);

        let hulk = config.radii(ThreatCategory::Hulk);
        assert_eq!(hulk.adjacent, 50);
        assert_eq!(hulk.close_move, Some(50));
        assert_eq!(hulk.close_fire, Some(50));
    }

    #[test]
    fn default_configuration_is_valid() {
        assert_eq!(PolicyConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_adjacency_is_rejected() {
        let mut config = PolicyConfig::default();
        config.obstacle.adjacent = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroAdjacency {
                category: ThreatCategory::Obstacle
            })
        );
    }
}
