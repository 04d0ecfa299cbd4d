//! Dash and scan abilities.

use hecs::{Entity, World};
use scrubbot_logic::condition::ConditionMachine;

use crate::components::{Dust, Evidence, Position, Vec2};
use crate::context::SessionContext;
use crate::events::Notification;

/// Handle a dash press.
pub fn dash_system(world: &mut World, ctx: &mut SessionContext, agent: Entity) {
    let requested = match world.get::<&mut ConditionMachine>(agent) {
        Ok(mut machine) => machine.request_dash(ctx.now),
        Err(_) => return,
    };
    match requested {
        Ok(()) => {
            log::debug!("dash at tick {}", ctx.now);
            ctx.notify(Notification::DashStarted);
        }
        Err(refusal) => log::debug!("dash refused: {:?}", refusal),
    }
}

/// Handle a scan press.
pub fn scan_system(world: &mut World, ctx: &mut SessionContext, agent: Entity) {
    let requested = match world.get::<&mut ConditionMachine>(agent) {
        Ok(mut machine) => machine.request_scan(ctx.now),
        Err(_) => return,
    };
    match requested {
        Ok(()) => {
            let revealed = reveal_list(world).len();
            log::debug!("scan at tick {}, {} items revealed", ctx.now, revealed);
            ctx.notify(Notification::ScanStarted { revealed });
        }
        Err(refusal) => log::debug!("scan refused: {:?}", refusal),
    }
}

/// Positions of every dust pile and piece of evidence still on the floor.
pub fn reveal_list(world: &World) -> Vec<Vec2> {
    let mut found: Vec<Vec2> = world
        .query::<(&Position, &Dust)>()
        .iter()
        .map(|(_, (pos, _))| pos.0)
        .collect();
    found.extend(
        world
            .query::<(&Position, &Evidence)>()
            .iter()
            .map(|(_, (pos, _))| pos.0),
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::spawn_agent;
    use scrubbot_logic::config::SessionConfig;

    fn setup() -> (World, SessionContext, Entity) {
        let cfg = SessionConfig::default();
        let mut world = World::new();
        let agent = spawn_agent(&mut world, &cfg, Vec2::ZERO);
        (world, SessionContext::new(&cfg), agent)
    }

    #[test]
    fn dash_notifies_once() {
        let (mut world, mut ctx, agent) = setup();
        dash_system(&mut world, &mut ctx, agent);
        ctx.now = 1;
        dash_system(&mut world, &mut ctx, agent);
        assert_eq!(ctx.outbox, vec![Notification::DashStarted]);
    }

    #[test]
    fn scan_counts_dust_and_evidence() {
        let (mut world, mut ctx, agent) = setup();
        world.spawn((Dust, Position::new(1.0, 1.0)));
        world.spawn((Dust, Position::new(2.0, 2.0)));
        world.spawn((Evidence::new("Bloody Glove", 100, 1), Position::new(3.0, 3.0)));

        scan_system(&mut world, &mut ctx, agent);
        assert_eq!(ctx.outbox, vec![Notification::ScanStarted { revealed: 3 }]);
        assert!(world.get::<&ConditionMachine>(agent).unwrap().flags().scanning);
    }
}
