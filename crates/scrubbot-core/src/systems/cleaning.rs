//! Cleaning - brush the surface under the agent and bank what comes off.

use hecs::{Entity, World};
use scrubbot_logic::accumulator::Accumulator;
use scrubbot_logic::condition::ConditionMachine;
use scrubbot_logic::config::{CleaningWhenFull, SessionConfig};
use scrubbot_logic::ledger::CapacityLedger;

use crate::components::Surface;
use crate::context::SessionContext;
use crate::events::Notification;
use crate::probe::ProbeHit;

/// Run one brush stroke at `hit`. Returns the number of cells cleaned.
pub fn cleaning_system(
    world: &mut World,
    ctx: &mut SessionContext,
    config: &SessionConfig,
    agent: Entity,
    hit: Option<ProbeHit>,
) -> u32 {
    let Some(hit) = hit else {
        return 0;
    };
    if !may_clean(world, config, agent) {
        return 0;
    }

    let cleaned = match world.get::<&mut Surface>(hit.surface) {
        Ok(mut surface) => {
            let Surface { canvas, brush, .. } = &mut *surface;
            canvas.clear_at(brush, hit.u, hit.v)
        }
        Err(_) => {
            log::warn!("probe hit {:?}, which is not a surface", hit.surface);
            return 0;
        }
    };
    if cleaned == 0 {
        return 0;
    }

    let Ok((acc, ledger, machine)) = world
        .query_one_mut::<(&mut Accumulator, &mut CapacityLedger, &mut ConditionMachine)>(agent)
    else {
        return cleaned;
    };
    machine.mark_cleaning(ctx.now);
    let conversion = acc.fold(cleaned);
    log::debug!(
        "stroke cleaned {} cells, carry {:.0}",
        cleaned,
        acc.carry()
    );

    ctx.add_score(conversion.score_delta);
    for _ in 0..conversion.units {
        if ledger.try_add_unit() {
            let (current, max) = ledger.snapshot();
            ctx.notify(Notification::UnitStored { current, max });
        } else {
            log::debug!("bag full, unit discarded");
        }
    }
    cleaned
}

fn may_clean(world: &World, config: &SessionConfig, agent: Entity) -> bool {
    let Ok(mut query) = world.query_one::<(&CapacityLedger, &ConditionMachine)>(agent) else {
        return false;
    };
    let Some((ledger, machine)) = query.get() else {
        return false;
    };
    if machine.flags().dead {
        return false;
    }
    !(ledger.is_full() && config.cleaning.when_full == CleaningWhenFull::Blocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Vec2;
    use crate::generation::{spawn_agent, spawn_surface};

    fn setup(cfg: &SessionConfig) -> (World, SessionContext, Entity, Entity) {
        let mut world = World::new();
        let agent = spawn_agent(&mut world, cfg, Vec2::ZERO);
        let surface = spawn_surface(&mut world, cfg, None).unwrap();
        (world, SessionContext::new(cfg), agent, surface)
    }

    fn hit(surface: Entity, u: f32, v: f32) -> Option<ProbeHit> {
        Some(ProbeHit { surface, u, v })
    }

    #[test]
    fn stroke_scores_and_lights_indicator() {
        let cfg = SessionConfig::default();
        let (mut world, mut ctx, agent, surface) = setup(&cfg);

        let cleaned = cleaning_system(&mut world, &mut ctx, &cfg, agent, hit(surface, 0.5, 0.5));
        assert_eq!(cleaned, 709);
        assert_eq!(ctx.score.score(), 70);
        assert!(world.get::<&ConditionMachine>(agent).unwrap().flags().cleaning);
        assert_eq!(world.get::<&CapacityLedger>(agent).unwrap().current(), 1);
        assert_eq!(
            ctx.outbox.last(),
            Some(&Notification::UnitStored { current: 1, max: 10 })
        );

        assert_eq!(
            cleaning_system(&mut world, &mut ctx, &cfg, agent, hit(surface, 0.5, 0.5)),
            0
        );
    }

    #[test]
    fn full_bag_blocks_stroke() {
        let cfg = SessionConfig::default();
        let (mut world, mut ctx, agent, surface) = setup(&cfg);
        world.get::<&mut CapacityLedger>(agent).unwrap().add_units(10);

        assert_eq!(
            cleaning_system(&mut world, &mut ctx, &cfg, agent, hit(surface, 0.5, 0.5)),
            0
        );
        assert_eq!(world.get::<&Surface>(surface).unwrap().canvas.revision(), 0);
    }

    #[test]
    fn non_surface_hit_is_skipped() {
        let cfg = SessionConfig::default();
        let (mut world, mut ctx, agent, _) = setup(&cfg);
        let chair = world.spawn((Vec2::ZERO,));
        assert_eq!(
            cleaning_system(&mut world, &mut ctx, &cfg, agent, hit(chair, 0.5, 0.5)),
            0
        );
        assert!(ctx.outbox.is_empty());
    }
}
