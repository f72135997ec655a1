#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Robotron autopilot.
//!
//! This crate defines the vocabulary that connects the frame snapshot, the
//! pure decision systems and the host adapters. The host captures each frame
//! of classified entities, systems summarise the threats around the player,
//! and the decision policy answers with a single [`Action`] made of two
//! [`StickValue`] readings: one for the movement stick and one for the fire
//! stick.
//!
//! All coordinates handled by the systems are playfield pixels with the Y
//! axis already flipped, so that "up" means an increasing value just like the
//! joystick does.

use serde::{Deserialize, Serialize};

mod config;
mod geometry;

pub use config::{
    BoundaryMargins, CategoryRadii, ConfigError, FamilyRadii, Playfield, PolicyConfig,
    ThreatRadii, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
};
pub use geometry::{distance_to, quantize, steer, try_quantize, Directive, DistanceSample};

/// Position on the playfield measured in pixels, Y increasing upward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal pixel offset from the left border.
    pub x: i32,
    /// Vertical pixel offset from the bottom border.
    pub y: i32,
}

impl Position {
    /// Creates a new position from flipped playfield coordinates.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed set of entity classes the game reports each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityCategory {
    /// The player's own avatar.
    Player,
    /// Shots fired by the player. Never considered a threat.
    Bullet,
    /// Civilians waiting for rescue: Mommy, Daddy and Mikey.
    Family,
    /// Walking enemies: Grunts and Brains.
    Enemy,
    /// Enemies that home in and transform if left alone: Sphereoids and Quarks.
    ChaseEnemy,
    /// Shooting enemies that must be removed first: Enforcers and Tanks.
    PriorityEnemy,
    /// Hostile shots: tank shells, cruise missiles, enforcer bullets and progs.
    Projectile,
    /// Indestructible wanderers.
    Hulk,
    /// Static electrodes.
    Obstacle,
    /// Anything the classifier reported under an unrecognised name.
    Unknown,
}

impl EntityCategory {
    /// Maps the classifier's sprite name onto its category.
    ///
    /// Unrecognised names fall into [`EntityCategory::Unknown`] rather than
    /// failing, so a single odd sprite never stalls a frame.
    #[must_use]
    pub fn from_sprite_name(name: &str) -> Self {
        match name {
            "Player" => Self::Player,
            "Bullet" => Self::Bullet,
            "Mommy" | "Daddy" | "Mikey" => Self::Family,
            "Grunt" | "Brain" => Self::Enemy,
            "Sphereoid" | "Quark" => Self::ChaseEnemy,
            "Enforcer" | "Tank" => Self::PriorityEnemy,
            "TankShell" | "CruiseMissile" | "EnforcerBullet" | "Prog" => Self::Projectile,
            "Hulk" => Self::Hulk,
            "Electrode" => Self::Obstacle,
            _ => Self::Unknown,
        }
    }

    /// Returns the ranked threat category, if the entity takes part in threat assessment.
    #[must_use]
    pub const fn threat(self) -> Option<ThreatCategory> {
        match self {
            Self::Projectile => Some(ThreatCategory::Projectile),
            Self::PriorityEnemy => Some(ThreatCategory::PriorityEnemy),
            Self::ChaseEnemy => Some(ThreatCategory::ChaseEnemy),
            Self::Enemy => Some(ThreatCategory::Enemy),
            Self::Hulk => Some(ThreatCategory::Hulk),
            Self::Obstacle => Some(ThreatCategory::Obstacle),
            Self::Family => Some(ThreatCategory::Family),
            Self::Player | Self::Bullet | Self::Unknown => None,
        }
    }
}

/// Entity categories that take part in threat assessment, ranked by priority.
///
/// Variants are declared from the highest to the lowest priority, so
/// [`ThreatCategory::rank`] and [`ThreatCategory::outranks`] are the single
/// source of truth for the ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatCategory {
    /// Hostile shots.
    Projectile,
    /// Enforcers and tanks.
    PriorityEnemy,
    /// Sphereoids and quarks.
    ChaseEnemy,
    /// Grunts and brains.
    Enemy,
    /// Hulks.
    Hulk,
    /// Electrodes.
    Obstacle,
    /// Civilians to rescue.
    Family,
}

impl ThreatCategory {
    /// Every category ordered from the highest to the lowest priority.
    pub const BY_PRIORITY: [Self; 7] = [
        Self::Projectile,
        Self::PriorityEnemy,
        Self::ChaseEnemy,
        Self::Enemy,
        Self::Hulk,
        Self::Obstacle,
        Self::Family,
    ];

    /// Hostile categories in the order the close-range fallback visits them.
    ///
    /// Unlike [`ThreatCategory::BY_PRIORITY`], chase enemies are inspected
    /// ahead of priority enemies. Family is handled separately.
    pub const CLOSE_RANGE_ORDER: [Self; 6] = [
        Self::Projectile,
        Self::ChaseEnemy,
        Self::PriorityEnemy,
        Self::Enemy,
        Self::Hulk,
        Self::Obstacle,
    ];

    /// Position in the priority ordering; zero is the most urgent.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Projectile => 0,
            Self::PriorityEnemy => 1,
            Self::ChaseEnemy => 2,
            Self::Enemy => 3,
            Self::Hulk => 4,
            Self::Obstacle => 5,
            Self::Family => 6,
        }
    }

    /// Reports whether `self` has strictly higher priority than `other`.
    #[must_use]
    pub const fn outranks(self, other: Self) -> bool {
        self.rank() < other.rank()
    }

    /// Reports whether the category is hostile, i.e. anything but family.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        !matches!(self, Self::Family)
    }
}

/// Single classified entity captured from a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    /// Location of the entity with the Y axis flipped.
    pub position: Position,
    /// Category assigned by the classifier.
    pub category: EntityCategory,
}

impl Entity {
    /// Creates a new entity snapshot.
    #[must_use]
    pub const fn new(position: Position, category: EntityCategory) -> Self {
        Self { position, category }
    }
}

/// Discrete joystick readings shared by the movement and fire sticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum StickValue {
    /// Neutral stick.
    Stay = 0,
    /// North.
    Up = 1,
    /// North-east.
    UpRight = 2,
    /// East.
    Right = 3,
    /// South-east.
    DownRight = 4,
    /// South.
    Down = 5,
    /// South-west.
    DownLeft = 6,
    /// West.
    Left = 7,
    /// North-west.
    UpLeft = 8,
}

impl StickValue {
    /// The eight compass directions in clockwise order starting at north.
    pub const DIRECTIONS: [Self; 8] = [
        Self::Up,
        Self::UpRight,
        Self::Right,
        Self::DownRight,
        Self::Down,
        Self::DownLeft,
        Self::Left,
        Self::UpLeft,
    ];

    /// Numeric value expected by the game's action space.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Converts a numeric stick reading back into a value.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Stay),
            1 => Some(Self::Up),
            2 => Some(Self::UpRight),
            3 => Some(Self::Right),
            4 => Some(Self::DownRight),
            5 => Some(Self::Down),
            6 => Some(Self::DownLeft),
            7 => Some(Self::Left),
            8 => Some(Self::UpLeft),
            _ => None,
        }
    }

    /// Rotates the direction halfway around the compass.
    ///
    /// The rotation is `(index + 4) mod 8` with a result of zero wrapping to
    /// [`StickValue::UpLeft`], so a compass direction never turns into
    /// [`StickValue::Stay`]. A neutral stick stays neutral.
    #[must_use]
    pub const fn opposite(self) -> Self {
        if matches!(self, Self::Stay) {
            return Self::Stay;
        }

        match Self::from_index((self.index() + 4) % 8) {
            Some(Self::Stay) | None => Self::UpLeft,
            Some(rotated) => rotated,
        }
    }

    /// Unit step `(dx, dy)` the stick points along, Y increasing upward.
    #[must_use]
    pub const fn components(self) -> (i8, i8) {
        match self {
            Self::Stay => (0, 0),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::DownRight => (1, -1),
            Self::Down => (0, -1),
            Self::DownLeft => (-1, -1),
            Self::Left => (-1, 0),
            Self::UpLeft => (-1, 1),
        }
    }
}

/// Number of distinct encoded actions: nine movement by nine fire readings.
pub const ACTION_SPACE: u8 = 81;

/// Combined joystick output for a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    /// Reading for the movement stick.
    pub movement: StickValue,
    /// Reading for the fire stick.
    pub fire: StickValue,
}

impl Action {
    /// Action returned for frames that do not contain the player.
    pub const NO_PLAYER: Self = Self::new(StickValue::Stay, StickValue::Up);

    /// Creates a new action from the two stick readings.
    #[must_use]
    pub const fn new(movement: StickValue, fire: StickValue) -> Self {
        Self { movement, fire }
    }

    /// Encodes the action into the game's combined action space.
    ///
    /// The encoding is `movement * 9 + fire`, always below [`ACTION_SPACE`].
    #[must_use]
    pub const fn encode(self) -> u8 {
        self.movement.index() * 9 + self.fire.index()
    }

    /// Decodes a combined action, rejecting values outside the action space.
    #[must_use]
    pub const fn decode(encoded: u8) -> Option<Self> {
        if encoded >= ACTION_SPACE {
            return None;
        }

        match (
            StickValue::from_index(encoded / 9),
            StickValue::from_index(encoded % 9),
        ) {
            (Some(movement), Some(fire)) => Some(Self::new(movement, fire)),
            _ => None,
        }
    }
}
