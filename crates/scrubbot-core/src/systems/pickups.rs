//! Collaborator events - pickups, collisions, zone triggers, damage.

use hecs::{Entity, World};
use scrubbot_logic::condition::{ConditionMachine, HitOutcome};
use scrubbot_logic::config::SessionConfig;
use scrubbot_logic::health::Health;
use scrubbot_logic::ledger::CapacityLedger;

use crate::components::{Evidence, ZonePresence};
use crate::context::SessionContext;
use crate::events::{Notification, PickupRefusal, SessionEvent};

/// Apply every event buffered since the previous tick, in arrival order.
pub fn event_system<I>(
    world: &mut World,
    ctx: &mut SessionContext,
    config: &SessionConfig,
    agent: Entity,
    events: I,
) where
    I: IntoIterator<Item = SessionEvent>,
{
    for event in events {
        log::debug!("tick {}: {:?}", ctx.now, event);
        match event {
            SessionEvent::ObstacleHit => obstacle_hit(world, ctx, config, agent),
            SessionEvent::DustPickup { entity } => {
                if dust_pickup(world, ctx, config, agent) {
                    despawn_pickup(world, entity);
                }
            }
            SessionEvent::EvidencePickup { evidence, entity } => {
                if evidence_pickup(world, ctx, agent, &evidence) {
                    despawn_pickup(world, entity);
                }
            }
            SessionEvent::ZoneEnter => set_zone(world, ctx, agent, true),
            SessionEvent::ZoneExit => set_zone(world, ctx, agent, false),
            SessionEvent::Damage(amount) => damage(world, ctx, agent, amount),
            SessionEvent::Repair => repair(world, ctx, agent),
        }
    }
}

fn obstacle_hit(world: &mut World, ctx: &mut SessionContext, config: &SessionConfig, agent: Entity) {
    let outcome = match world.get::<&mut ConditionMachine>(agent) {
        Ok(mut machine) => machine.on_obstacle_hit(ctx.now),
        Err(_) => return,
    };
    match outcome {
        HitOutcome::Ignored => {}
        HitOutcome::Counted { hits } => {
            log::debug!("obstacle hit {}", hits);
            ctx.add_score(-config.pickups.obstacle_penalty);
        }
        HitOutcome::Broke => {
            log::info!("agent broke down at tick {}", ctx.now);
            ctx.add_score(-config.pickups.obstacle_penalty);
            ctx.notify(Notification::Broke);
        }
    }
}

fn pickup_refusal(machine: &ConditionMachine) -> Option<PickupRefusal> {
    let flags = machine.flags();
    if flags.dead {
        Some(PickupRefusal::Dead)
    } else if flags.broken {
        Some(PickupRefusal::Broken)
    } else {
        None
    }
}

fn refuse(ctx: &mut SessionContext, what: &str, reason: PickupRefusal) -> bool {
    log::info!("{} pickup refused: {:?}", what, reason);
    ctx.notify(Notification::PickupRefused(reason));
    false
}

/// Returns whether the dust was taken.
fn dust_pickup(world: &mut World, ctx: &mut SessionContext, config: &SessionConfig, agent: Entity) -> bool {
    let Ok((ledger, machine)) =
        world.query_one_mut::<(&mut CapacityLedger, &mut ConditionMachine)>(agent)
    else {
        return false;
    };
    if let Some(reason) = pickup_refusal(machine) {
        return refuse(ctx, "dust", reason);
    }
    if ledger.is_full() {
        return refuse(ctx, "dust", PickupRefusal::BagFull);
    }

    let stored = ledger.add_units(config.pickups.dust_capacity);
    let (current, max) = ledger.snapshot();
    machine.on_pickup(ctx.now);

    ctx.add_score(config.pickups.dust_score);
    ctx.objectives.record_dust();
    if stored > 0 {
        ctx.notify(Notification::UnitStored { current, max });
    }
    true
}

/// Returns whether the evidence was taken.
fn evidence_pickup(
    world: &mut World,
    ctx: &mut SessionContext,
    agent: Entity,
    evidence: &Evidence,
) -> bool {
    let Ok((ledger, machine)) =
        world.query_one_mut::<(&mut CapacityLedger, &mut ConditionMachine)>(agent)
    else {
        return false;
    };
    if let Some(reason) = pickup_refusal(machine) {
        return refuse(ctx, "evidence", reason);
    }

    let stored = ledger.add_units(evidence.capacity_value);
    let (current, max) = ledger.snapshot();
    machine.on_pickup(ctx.now);

    log::info!("evidence found: {}", evidence.name);
    ctx.add_score(evidence.score_value);
    ctx.objectives.record_evidence(&evidence.name, evidence.is_knife);
    if stored > 0 {
        ctx.notify(Notification::UnitStored { current, max });
    }
    true
}

fn despawn_pickup(world: &mut World, entity: Option<Entity>) {
    if let Some(entity) = entity {
        if world.despawn(entity).is_err() {
            log::warn!("picked up {:?}, which was already gone", entity);
        }
    }
}

fn set_zone(world: &mut World, ctx: &mut SessionContext, agent: Entity, inside: bool) {
    let Ok(mut zone) = world.get::<&mut ZonePresence>(agent) else {
        return;
    };
    if zone.in_disposal_zone == inside {
        return;
    }
    zone.in_disposal_zone = inside;
    ctx.notify(if inside {
        Notification::PromptShown
    } else {
        Notification::PromptHidden
    });
}

fn damage(world: &mut World, ctx: &mut SessionContext, agent: Entity, amount: u32) {
    let Ok((health, machine)) = world.query_one_mut::<(&mut Health, &mut ConditionMachine)>(agent)
    else {
        return;
    };
    if health.is_depleted() {
        return;
    }
    let depleted = health.take_damage(amount);
    ctx.notify(Notification::Damaged {
        health: health.current(),
    });
    if depleted && machine.on_depleted(ctx.now) {
        log::info!("agent destroyed at tick {}", ctx.now);
        ctx.notify(Notification::Died);
    }
}

fn repair(world: &mut World, ctx: &mut SessionContext, agent: Entity) {
    let Ok((health, machine)) = world.query_one_mut::<(&mut Health, &ConditionMachine)>(agent)
    else {
        return;
    };
    if machine.flags().dead {
        log::info!("repair ignored, agent is destroyed");
        return;
    }
    health.repair_full();
    ctx.notify(Notification::HealthRestored {
        health: health.current(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Dust, Position, Vec2};
    use crate::generation::spawn_agent;

    fn setup() -> (World, SessionContext, SessionConfig, Entity) {
        let cfg = SessionConfig::default();
        let mut world = World::new();
        let agent = spawn_agent(&mut world, &cfg, Vec2::ZERO);
        (world, SessionContext::new(&cfg), cfg, agent)
    }

    fn flags(world: &World, agent: Entity) -> scrubbot_logic::condition::ConditionFlags {
        world.get::<&ConditionMachine>(agent).unwrap().flags()
    }

    #[test]
    fn dust_pickup_scores_slows_and_despawns() {
        let (mut world, mut ctx, cfg, agent) = setup();
        let dust = world.spawn((Dust, Position::new(1.0, 0.0)));

        event_system(
            &mut world,
            &mut ctx,
            &cfg,
            agent,
            [SessionEvent::DustPickup { entity: Some(dust) }],
        );
        assert!(!world.contains(dust));
        assert_eq!(ctx.score.score(), 20);
        assert_eq!(ctx.objectives.dust_collected, 1);
        assert!(flags(&world, agent).slowed);
        assert_eq!(world.get::<&CapacityLedger>(agent).unwrap().current(), 1);
    }

    #[test]
    fn dust_refused_when_full_stays_on_floor() {
        let (mut world, mut ctx, cfg, agent) = setup();
        world.get::<&mut CapacityLedger>(agent).unwrap().add_units(10);
        let dust = world.spawn((Dust, Position::new(1.0, 0.0)));

        event_system(
            &mut world,
            &mut ctx,
            &cfg,
            agent,
            [SessionEvent::DustPickup { entity: Some(dust) }],
        );
        assert!(world.contains(dust));
        assert_eq!(
            ctx.outbox,
            vec![Notification::PickupRefused(PickupRefusal::BagFull)]
        );
        assert!(!flags(&world, agent).slowed);
    }

    #[test]
    fn third_hit_breaks_and_broken_refuses_evidence() {
        let (mut world, mut ctx, cfg, agent) = setup();
        event_system(&mut world, &mut ctx, &cfg, agent, vec![SessionEvent::ObstacleHit; 4]);
        assert!(flags(&world, agent).broken);
        assert_eq!(ctx.score.score(), -150, "fourth hit while broken is free");
        assert!(ctx.outbox.contains(&Notification::Broke));

        ctx.outbox.clear();
        let knife = Evidence::new("Kitchen Knife", 500, 2).knife();
        event_system(
            &mut world,
            &mut ctx,
            &cfg,
            agent,
            [SessionEvent::EvidencePickup {
                evidence: knife,
                entity: None,
            }],
        );
        assert!(!ctx.objectives.has_weapon);
        assert_eq!(
            ctx.outbox,
            vec![Notification::PickupRefused(PickupRefusal::Broken)]
        );
    }

    #[test]
    fn evidence_allowed_when_full() {
        let (mut world, mut ctx, cfg, agent) = setup();
        world.get::<&mut CapacityLedger>(agent).unwrap().add_units(10);
        let knife = Evidence::new("Kitchen Knife", 500, 2).knife();
        event_system(
            &mut world,
            &mut ctx,
            &cfg,
            agent,
            [SessionEvent::EvidencePickup {
                evidence: knife,
                entity: None,
            }],
        );
        assert!(ctx.objectives.has_weapon);
        assert_eq!(ctx.score.score(), 500);
        assert_eq!(world.get::<&CapacityLedger>(agent).unwrap().current(), 10);
    }

    #[test]
    fn zone_prompt_follows_presence() {
        let (mut world, mut ctx, cfg, agent) = setup();
        event_system(
            &mut world,
            &mut ctx,
            &cfg,
            agent,
            [
                SessionEvent::ZoneEnter,
                SessionEvent::ZoneEnter,
                SessionEvent::ZoneExit,
            ],
        );
        assert_eq!(
            ctx.outbox,
            vec![Notification::PromptShown, Notification::PromptHidden]
        );
        assert!(!world.get::<&ZonePresence>(agent).unwrap().in_disposal_zone);
    }

    #[test]
    fn lethal_damage_kills_once() {
        let (mut world, mut ctx, cfg, agent) = setup();
        event_system(
            &mut world,
            &mut ctx,
            &cfg,
            agent,
            [
                SessionEvent::Damage(4),
                SessionEvent::Damage(20),
                SessionEvent::Damage(1),
                SessionEvent::Repair,
            ],
        );
        assert_eq!(
            ctx.outbox,
            vec![
                Notification::Damaged { health: 6 },
                Notification::Damaged { health: 0 },
                Notification::Died,
            ]
        );
        assert!(flags(&world, agent).dead);
        assert!(world.get::<&Health>(agent).unwrap().is_depleted());
    }
}
