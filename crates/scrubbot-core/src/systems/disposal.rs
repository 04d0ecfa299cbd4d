//! Disposal protocol - empty the bag while standing in the disposal zone.

use hecs::{Entity, World};
use scrubbot_logic::condition::ConditionMachine;
use scrubbot_logic::ledger::CapacityLedger;

use crate::components::ZonePresence;
use crate::context::{SessionContext, SessionOutcome};
use crate::events::Notification;

/// Why an empty request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyRefusal {
    NotInZone,
    BagEmpty,
    AlreadyEmptying,
    Disabled,
    NoAgent,
}

/// Start emptying if the agent is in the zone with something in the bag.
pub fn request_empty(
    world: &mut World,
    ctx: &mut SessionContext,
    agent: Entity,
) -> Result<(), EmptyRefusal> {
    let result = try_begin_emptying(world, ctx.now, agent);
    match result {
        Ok(()) => {
            log::info!("emptying started at tick {}", ctx.now);
            ctx.notify(Notification::EmptyingStarted);
        }
        Err(reason) => {
            log::info!("empty request refused: {:?}", reason);
            ctx.notify(Notification::EmptyRefused);
        }
    }
    result
}

fn try_begin_emptying(world: &mut World, now: u64, agent: Entity) -> Result<(), EmptyRefusal> {
    let (zone, ledger, machine) = world
        .query_one_mut::<(&ZonePresence, &CapacityLedger, &mut ConditionMachine)>(agent)
        .map_err(|_| EmptyRefusal::NoAgent)?;

    if machine.flags().emptying {
        return Err(EmptyRefusal::AlreadyEmptying);
    }
    if !zone.in_disposal_zone {
        return Err(EmptyRefusal::NotInZone);
    }
    if ledger.is_empty() {
        return Err(EmptyRefusal::BagEmpty);
    }
    machine
        .begin_emptying(now)
        .map_err(|_| EmptyRefusal::Disabled)
}

/// The emptying timer ran out: reset the bag, drop the deposit, check the win.
pub fn finish_emptying(world: &mut World, ctx: &mut SessionContext, agent: Entity) {
    let Ok((ledger, machine)) =
        world.query_one_mut::<(&mut CapacityLedger, &ConditionMachine)>(agent)
    else {
        log::warn!("emptying finished but {:?} has no bag", agent);
        return;
    };
    let emptied = ledger.current();
    ledger.reset();
    let remaining = ledger.current();
    let dead = machine.flags().dead;

    log::info!("bag emptied, {} units deposited", emptied);
    ctx.notify(Notification::DepositSpawned);

    if dead || ctx.outcome.is_some() {
        return;
    }
    if ctx.objectives.check_win(remaining) {
        log::info!("objectives met at tick {}, session won", ctx.now);
        ctx.notify(Notification::Won);
        ctx.outcome.get_or_insert(SessionOutcome::Won);
    }
}
