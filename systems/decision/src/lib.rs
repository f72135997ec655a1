#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns a captured frame into a movement and fire action.
//!
//! The policy runs three tiers in order. An adjacent entity overrides
//! everything else; otherwise the nearest entities within their close-range
//! radii steer the sticks; whatever is still unset falls back to defaults.
//! Every movement direction passes through the boundary corrector before it
//! is emitted. Fire directions are never corrected.

use robotron_autopilot_core::{
    quantize, steer, Action, ConfigError, Directive, DistanceSample, Playfield, PolicyConfig,
    Position, StickValue, ThreatCategory,
};
use robotron_autopilot_frame::Frame;
use robotron_autopilot_system_boundary::BoundaryCorrector;
use robotron_autopilot_system_threat_assessment::{Assessment, ThreatAssessment, ThreatSummary};

/// Tier of the policy that completed the action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The frame carried no player.
    NoPlayer,
    /// An adjacent entity of the category set both sticks.
    Adjacent(ThreatCategory),
    /// Close-range threats completed the action.
    CloseRange,
    /// At least one stick fell back to its default.
    Default,
}

/// Action chosen for a frame together with the tier that completed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Decision {
    /// Movement and fire directions to emit.
    pub action: Action,
    /// Tier that completed the action.
    pub resolution: Resolution,
}

impl Decision {
    const NO_PLAYER: Self = Self {
        action: Action::NO_PLAYER,
        resolution: Resolution::NoPlayer,
    };

    /// Encoded action in `0..81`.
    #[must_use]
    pub const fn encode(&self) -> u8 {
        self.action.encode()
    }
}

/// Decision policy configured once for a playfield.
#[derive(Clone, Copy, Debug, Default)]
pub struct DecisionPolicy {
    config: PolicyConfig,
    assessment: ThreatAssessment,
    boundary: BoundaryCorrector,
}

impl DecisionPolicy {
    /// Creates a policy for the playfield using the provided tuning values.
    pub fn new(config: PolicyConfig, playfield: Playfield) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            assessment: ThreatAssessment::new(config),
            boundary: BoundaryCorrector::new(playfield),
        })
    }

    /// Creates a policy for a board of the reported size.
    ///
    /// Wall thresholds are derived from the configuration's margins.
    pub fn for_board(config: PolicyConfig, width: u32, height: u32) -> Result<Self, ConfigError> {
        let playfield = Playfield::from_board_size(width, height, &config.margins)?;
        Self::new(config, playfield)
    }

    /// Tuning values the policy was built with.
    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Playfield the policy was built for.
    #[must_use]
    pub const fn playfield(&self) -> &Playfield {
        self.boundary.playfield()
    }

    /// Chooses the action for a single frame.
    #[must_use]
    pub fn decide(&self, frame: &Frame) -> Decision {
        let decision = match self.assessment.summarize(frame) {
            Assessment::NoPlayer => Decision::NO_PLAYER,
            Assessment::Threats(summary) => self.resolve(&summary),
        };

        tracing::debug!(
            movement = ?decision.action.movement,
            fire = ?decision.action.fire,
            resolution = ?decision.resolution,
            encoded = decision.encode(),
            "frame decided"
        );
        decision
    }

    /// Chooses the action from an already computed threat summary.
    #[must_use]
    pub fn resolve(&self, summary: &ThreatSummary) -> Decision {
        let mut sticks = Sticks::default();
        let player = summary.player();
        let crowded = summary.close_move_count() > self.config.close_move_limit;

        if let Some(adjacent) = summary.adjacent() {
            if adjacent.category.is_hostile() {
                sticks.fire = Some(quantize(adjacent.sample.dx, adjacent.sample.dy));
                sticks.movement = Some(if crowded {
                    StickValue::Stay
                } else {
                    self.flee(&adjacent.sample, player)
                });
            } else {
                sticks.movement = Some(if crowded {
                    StickValue::Stay
                } else {
                    self.approach(&adjacent.sample, player)
                });
            }

            if let Some(action) = sticks.complete() {
                return Decision {
                    action,
                    resolution: Resolution::Adjacent(adjacent.category),
                };
            }
        }

        for category in ThreatCategory::CLOSE_RANGE_ORDER {
            let Some(nearest) = summary.nearest(category) else {
                continue;
            };
            let radii = self.config.radii(category);

            if sticks.movement.is_none() && radii.close_move.is_some_and(|r| nearest.within(r)) {
                sticks.movement = Some(self.flee(&nearest, player));
            }
            if sticks.fire.is_none() && radii.close_fire.is_some_and(|r| nearest.within(r)) {
                sticks.fire = Some(quantize(nearest.dx, nearest.dy));
            }
        }

        if sticks.movement.is_none() {
            let family = summary
                .nearest(ThreatCategory::Family)
                .filter(|sample| sample.within(self.config.family.close));
            if let Some(family) = family {
                sticks.movement = Some(self.approach(&family, player));
            }
        }

        if crowded && summary.nearest(ThreatCategory::Projectile).is_none() {
            sticks.movement = Some(StickValue::Stay);
        }

        if let Some(action) = sticks.complete() {
            return Decision {
                action,
                resolution: Resolution::CloseRange,
            };
        }

        let fire = sticks.fire.unwrap_or(StickValue::Stay);
        let movement = sticks
            .movement
            .unwrap_or_else(|| self.default_move(summary));
        Decision {
            action: Action::new(movement, fire),
            resolution: Resolution::Default,
        }
    }

    fn default_move(&self, summary: &ThreatSummary) -> StickValue {
        let target = summary
            .nearest(ThreatCategory::ChaseEnemy)
            .or_else(|| summary.nearest(ThreatCategory::Family));
        match target {
            Some(sample) => self.approach(&sample, summary.player()),
            None => StickValue::Stay,
        }
    }

    fn flee(&self, sample: &DistanceSample, player: Position) -> StickValue {
        self.boundary.correct(steer(sample, Directive::Away), player)
    }

    fn approach(&self, sample: &DistanceSample, player: Position) -> StickValue {
        self.boundary.correct(steer(sample, Directive::Toward), player)
    }
}

/// Partially decided sticks.
#[derive(Default)]
struct Sticks {
    movement: Option<StickValue>,
    fire: Option<StickValue>,
}

impl Sticks {
    fn complete(&self) -> Option<Action> {
        Some(Action::new(self.movement?, self.fire?))
    }
}

#[cfg(test)]
mod tests {
    use super::{DecisionPolicy, Resolution};
    use robotron_autopilot_core::{
        Action, ConfigError, Entity, EntityCategory, PolicyConfig, Position, StickValue,
        ThreatCategory,
    };
    use robotron_autopilot_frame::Frame;

    const PLAYER: Position = Position::new(300, 250);

    fn entity(dx: i32, dy: i32, category: EntityCategory) -> Entity {
        Entity::new(Position::new(PLAYER.x + dx, PLAYER.y + dy), category)
    }

    fn frame(others: Vec<Entity>) -> Frame {
        let mut entities = vec![Entity::new(PLAYER, EntityCategory::Player)];
        entities.extend(others);
        Frame::from_entities(entities)
    }

    fn decide(others: Vec<Entity>) -> super::Decision {
        DecisionPolicy::default().decide(&frame(others))
    }

    #[test]
    fn missing_player_holds_still_and_fires_up() {
        let decision = DecisionPolicy::default().decide(&Frame::from_entities(vec![entity(
            10,
            0,
            EntityCategory::Enemy,
        )]));
        assert_eq!(decision.action, Action::NO_PLAYER);
        assert_eq!(decision.resolution, Resolution::NoPlayer);
        assert_eq!(decision.encode(), 1);
    }

    #[test]
    fn adjacent_hostile_sets_both_sticks() {
        let decision = decide(vec![entity(20, 0, EntityCategory::Enemy)]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Left, StickValue::Right)
        );
        assert_eq!(
            decision.resolution,
            Resolution::Adjacent(ThreatCategory::Enemy)
        );
    }

    #[test]
    fn adjacent_family_is_approached_and_fire_falls_through() {
        let decision = decide(vec![
            entity(0, 30, EntityCategory::Family),
            entity(-100, 0, EntityCategory::Enemy),
        ]);
        assert_eq!(decision.action.movement, StickValue::Up);
        // Enemy at 100 lies outside its fire radius of 75.
        assert_eq!(decision.action.fire, StickValue::Stay);
        assert_eq!(decision.resolution, Resolution::Default);

        let decision = decide(vec![
            entity(0, 30, EntityCategory::Family),
            entity(-70, 0, EntityCategory::Enemy),
        ]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Up, StickValue::Left)
        );
        assert_eq!(decision.resolution, Resolution::CloseRange);
    }

    #[test]
    fn close_range_moves_away_from_the_first_category_in_walk_order() {
        // The enemy is closer, but chase enemies are walked first.
        let decision = decide(vec![
            entity(0, 48, EntityCategory::ChaseEnemy),
            entity(-41, 0, EntityCategory::Enemy),
        ]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Down, StickValue::Up)
        );
        assert_eq!(decision.resolution, Resolution::CloseRange);
    }

    #[test]
    fn chase_enemies_are_walked_before_priority_enemies() {
        let decision = decide(vec![
            entity(45, 0, EntityCategory::PriorityEnemy),
            entity(0, 48, EntityCategory::ChaseEnemy),
        ]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Down, StickValue::Up)
        );
        assert_eq!(decision.resolution, Resolution::CloseRange);
    }

    #[test]
    fn family_pull_targets_the_nearest_member() {
        let decision = decide(vec![
            entity(-50, 0, EntityCategory::Family),
            entity(70, 0, EntityCategory::Family),
        ]);
        assert_eq!(decision.action.movement, StickValue::Left);
    }

    #[test]
    fn fire_radius_can_exceed_move_radius() {
        let decision = decide(vec![entity(0, -150, EntityCategory::PriorityEnemy)]);
        assert_eq!(decision.action.fire, StickValue::Down);
        assert_eq!(decision.action.movement, StickValue::Stay);
        assert_eq!(decision.resolution, Resolution::Default);
    }

    #[test]
    fn nearby_family_is_approached_when_nothing_threatens() {
        let decision = decide(vec![entity(-60, 0, EntityCategory::Family)]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Left, StickValue::Stay)
        );
    }

    #[test]
    fn defaults_chase_enemies_before_family() {
        let decision = decide(vec![
            entity(200, 0, EntityCategory::Family),
            entity(0, -250, EntityCategory::ChaseEnemy),
        ]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Down, StickValue::Stay)
        );

        let decision = decide(vec![entity(200, 0, EntityCategory::Family)]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Right, StickValue::Stay)
        );
        assert_eq!(decision.resolution, Resolution::Default);
    }

    #[test]
    fn lone_player_stays_and_holds_fire() {
        let decision = decide(Vec::new());
        assert_eq!(
            decision.action,
            Action::new(StickValue::Stay, StickValue::Stay)
        );
        assert_eq!(decision.encode(), 0);
    }

    #[test]
    fn crowded_adjacent_hostile_holds_position() {
        let decision = decide(vec![
            entity(10, 0, EntityCategory::Enemy),
            entity(0, 45, EntityCategory::Enemy),
            entity(0, -45, EntityCategory::Enemy),
            entity(-45, 0, EntityCategory::Enemy),
            entity(0, 50, EntityCategory::Enemy),
            entity(0, -50, EntityCategory::Enemy),
        ]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Stay, StickValue::Right)
        );
    }

    #[test]
    fn crowded_adjacent_family_holds_position() {
        // The projectile suppresses the later crowded override, so only the
        // adjacency check can hold the player still.
        let decision = decide(vec![
            entity(0, 10, EntityCategory::Family),
            entity(45, 0, EntityCategory::Enemy),
            entity(0, 46, EntityCategory::Enemy),
            entity(-47, 0, EntityCategory::Enemy),
            entity(0, -48, EntityCategory::Enemy),
            entity(33, 33, EntityCategory::Enemy),
            entity(0, -90, EntityCategory::Projectile),
        ]);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Stay, StickValue::Down)
        );
        assert_eq!(decision.resolution, Resolution::CloseRange);

        let decision = decide(vec![
            entity(0, 10, EntityCategory::Family),
            entity(0, -90, EntityCategory::Projectile),
        ]);
        assert_eq!(decision.action.movement, StickValue::Up);
    }

    #[test]
    fn crowded_without_projectiles_stands_and_fights() {
        let crowd = vec![
            entity(45, 0, EntityCategory::Enemy),
            entity(0, 45, EntityCategory::Enemy),
            entity(0, -45, EntityCategory::Enemy),
            entity(-45, 0, EntityCategory::Enemy),
            entity(0, 50, EntityCategory::Enemy),
            entity(0, -50, EntityCategory::Enemy),
        ];
        let decision = decide(crowd.clone());
        assert_eq!(
            decision.action,
            Action::new(StickValue::Stay, StickValue::Right)
        );
        assert_eq!(decision.resolution, Resolution::CloseRange);

        // A projectile in fire range keeps the player moving.
        let mut with_projectile = crowd;
        with_projectile.push(entity(0, 140, EntityCategory::Projectile));
        let decision = decide(with_projectile);
        assert_eq!(
            decision.action,
            Action::new(StickValue::Left, StickValue::Up)
        );
    }

    #[test]
    fn five_close_entities_are_not_a_crowd() {
        let decision = decide(vec![
            entity(45, 0, EntityCategory::Enemy),
            entity(0, 46, EntityCategory::Enemy),
            entity(0, -47, EntityCategory::Enemy),
            entity(-48, 0, EntityCategory::Enemy),
            entity(0, 50, EntityCategory::Enemy),
        ]);
        assert_eq!(decision.action.movement, StickValue::Left);
        assert_eq!(decision.action.fire, StickValue::Right);
    }

    #[test]
    fn movement_is_corrected_at_the_walls() {
        let policy = DecisionPolicy::default();
        let player = Position::new(1, 100);
        let decision = policy.decide(&Frame::from_entities(vec![
            Entity::new(player, EntityCategory::Player),
            Entity::new(Position::new(21, 100), EntityCategory::Enemy),
        ]));
        assert_eq!(
            decision.action,
            Action::new(StickValue::Up, StickValue::Right)
        );
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut config = PolicyConfig::default();
        config.hulk.adjacent = 0;
        assert_eq!(
            DecisionPolicy::for_board(config, 665, 492).err(),
            Some(ConfigError::ZeroAdjacency {
                category: ThreatCategory::Hulk
            })
        );
        assert!(matches!(
            DecisionPolicy::for_board(PolicyConfig::default(), 10, 10),
            Err(ConfigError::BoardTooSmall { .. })
        ));
    }
}
