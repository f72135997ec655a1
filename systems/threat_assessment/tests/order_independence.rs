use proptest::prelude::*;
use robotron_autopilot_core::{Entity, EntityCategory, Position, ThreatCategory};
use robotron_autopilot_frame::Frame;
use robotron_autopilot_system_threat_assessment::{Assessment, ThreatAssessment, ThreatSummary};

const PLAYER: Position = Position::new(320, 240);

const CATEGORIES: [EntityCategory; 10] = [
    EntityCategory::Projectile,
    EntityCategory::PriorityEnemy,
    EntityCategory::ChaseEnemy,
    EntityCategory::Enemy,
    EntityCategory::Hulk,
    EntityCategory::Obstacle,
    EntityCategory::Family,
    EntityCategory::Bullet,
    EntityCategory::Unknown,
    EntityCategory::Player,
];

/// Entities at pairwise distinct distances, so no tie-break depends on order.
fn distinct_entities() -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::btree_map(1i32..220, (0usize..CATEGORIES.len(), 0u8..4), 0..24).prop_map(
        |entries| {
            entries
                .into_iter()
                .map(|(distance, (category, quadrant))| {
                    let (dx, dy) = match quadrant {
                        0 => (distance, 0),
                        1 => (0, distance),
                        2 => (-distance, 0),
                        _ => (0, -distance),
                    };
                    Entity::new(
                        Position::new(PLAYER.x + dx, PLAYER.y + dy),
                        CATEGORIES[category],
                    )
                })
                .collect()
        },
    )
}

fn summarize(others: &[Entity]) -> ThreatSummary {
    let mut entities = vec![Entity::new(PLAYER, EntityCategory::Player)];
    entities.extend_from_slice(others);
    match ThreatAssessment::default().summarize(&Frame::from_entities(entities)) {
        Assessment::Threats(summary) => summary,
        Assessment::NoPlayer => panic!("player leads every frame"),
    }
}

proptest! {
    #[test]
    fn permuting_entities_preserves_the_summary(
        (original, shuffled) in distinct_entities()
            .prop_flat_map(|entities| (Just(entities.clone()), Just(entities).prop_shuffle())),
    ) {
        prop_assert_eq!(summarize(&original), summarize(&shuffled));
    }

    #[test]
    fn adjacent_slot_holds_the_highest_priority_adjacent_category(entities in distinct_entities()) {
        let summary = summarize(&entities);
        let best = entities
            .iter()
            .filter_map(|entity| {
                let category = entity.category.threat()?;
                let radius = if category == ThreatCategory::Hulk { 50 } else { 40 };
                let distance = (entity.position.x - PLAYER.x).abs() + (entity.position.y - PLAYER.y).abs();
                (distance <= radius).then_some(category)
            })
            .min_by_key(|category| category.rank());

        prop_assert_eq!(summary.adjacent().map(|threat| threat.category), best);
    }
}

#[test]
fn player_does_not_have_to_lead_the_frame() {
    let frame = Frame::from_entities(vec![
        Entity::new(Position::new(330, 240), EntityCategory::Enemy),
        Entity::new(PLAYER, EntityCategory::Player),
    ]);
    let Assessment::Threats(summary) = ThreatAssessment::default().summarize(&frame) else {
        panic!("frame contains a player");
    };
    assert_eq!(summary.player(), PLAYER);
    assert_eq!(summary.close_move_count(), 1);
}
