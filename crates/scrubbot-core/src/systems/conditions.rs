//! Condition timers - fire due timers and announce what changed.

use hecs::{Entity, World};
use scrubbot_logic::condition::{ConditionMachine, Transition};

use crate::context::{SessionContext, SessionOutcome};
use crate::events::Notification;
use crate::systems::finish_emptying;

/// Advance the agent's timers to `ctx.now`.
pub fn condition_system(world: &mut World, ctx: &mut SessionContext, agent: Entity) {
    let transitions = match world.get::<&mut ConditionMachine>(agent) {
        Ok(mut machine) => machine.advance(ctx.now),
        Err(_) => return,
    };

    for transition in transitions {
        log::debug!("tick {}: {:?}", ctx.now, transition);
        match transition {
            Transition::Repaired => {
                log::info!("agent repaired at tick {}", ctx.now);
                ctx.notify(Notification::Repaired);
            }
            Transition::DashReady => ctx.notify(Notification::DashReady),
            Transition::ScanEnded => ctx.notify(Notification::ScanEnded),
            Transition::ScanReady => ctx.notify(Notification::ScanReady),
            Transition::EmptyingFinished => finish_emptying(world, ctx, agent),
            Transition::GameOver => {
                log::info!("game over at tick {}", ctx.now);
                ctx.notify(Notification::GameOver);
                ctx.outcome.get_or_insert(SessionOutcome::GameOver);
            }
            Transition::SlowEnded | Transition::DashEnded | Transition::CleaningIdle => {}
        }
    }
}
