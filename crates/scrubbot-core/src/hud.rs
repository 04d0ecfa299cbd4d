//! HUD snapshot - everything the presentation layer reads in one serializable struct.

use hecs::{Entity, World};
use scrubbot_logic::condition::{ConditionFlags, ConditionMachine};
use scrubbot_logic::config::SessionConfig;
use scrubbot_logic::health::{Health, HealthBand};
use scrubbot_logic::ledger::CapacityLedger;
use serde::Serialize;

use crate::components::{Agent, Surface, Vec2, ZonePresence};
use crate::context::{SessionContext, SessionOutcome};
use crate::error::SessionError;
use crate::systems::reveal_list;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub tick: u64,
    pub score: i64,
    pub current_units: u32,
    pub max_units: u32,
    pub full: bool,
    pub show_disposal_hint: bool,
    pub prompt_visible: bool,
    pub flags: ConditionFlags,
    pub speed: f32,
    pub health: u32,
    pub max_health: u32,
    pub health_band: HealthBand,
    pub smoking: bool,
    pub dust_collected: u32,
    pub dust_required: u32,
    pub has_weapon: bool,
    pub cleaned_fraction: f32,
    pub mask_revision: u64,
    /// Dust and evidence positions, only while scanning.
    pub revealed: Vec<Vec2>,
    pub outcome: Option<SessionOutcome>,
}

impl HudSnapshot {
    pub fn capture(
        world: &World,
        ctx: &SessionContext,
        config: &SessionConfig,
        agent: Entity,
        surface: Entity,
    ) -> Result<Self, SessionError> {
        let (cleaned_fraction, mask_revision) = {
            let s = world
                .get::<&Surface>(surface)
                .map_err(|_| SessionError::NotASurface(surface))?;
            (s.canvas.cleaned_fraction(), s.canvas.revision())
        };

        let mut query = world
            .query_one::<(&Agent, &CapacityLedger, &ConditionMachine, &Health, &ZonePresence)>(
                agent,
            )
            .map_err(|_| SessionError::NotAnAgent(agent))?;
        let (body, ledger, machine, health, zone) =
            query.get().ok_or(SessionError::NotAnAgent(agent))?;

        let flags = machine.flags();
        let (current_units, max_units) = ledger.snapshot();
        let revealed = if flags.scanning {
            reveal_list(world)
        } else {
            Vec::new()
        };

        Ok(Self {
            tick: ctx.now,
            score: ctx.score.score(),
            current_units,
            max_units,
            full: ledger.is_full(),
            show_disposal_hint: current_units >= config.capacity.hint_threshold,
            prompt_visible: zone.in_disposal_zone,
            flags,
            speed: body.speed,
            health: health.current(),
            max_health: health.max(),
            health_band: health.band(),
            smoking: health.is_smoking(),
            dust_collected: ctx.objectives.dust_collected,
            dust_required: ctx.objectives.dust_required,
            has_weapon: ctx.objectives.has_weapon,
            cleaned_fraction,
            mask_revision,
            revealed,
            outcome: ctx.outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Dust, Position};
    use crate::generation::{spawn_agent, spawn_surface};

    #[test]
    fn hint_and_reveal() {
        let cfg = SessionConfig::default();
        let mut world = World::new();
        let ctx = SessionContext::new(&cfg);
        let agent = spawn_agent(&mut world, &cfg, Vec2::ZERO);
        let surface = spawn_surface(&mut world, &cfg, None).unwrap();
        world.spawn((Dust, Position::new(4.0, 4.0)));
        world.get::<&mut CapacityLedger>(agent).unwrap().add_units(5);

        let hud = HudSnapshot::capture(&world, &ctx, &cfg, agent, surface).unwrap();
        assert!(hud.show_disposal_hint);
        assert!(hud.revealed.is_empty());
        assert_eq!(hud.health_band, HealthBand::Healthy);

        world.get::<&mut ConditionMachine>(agent).unwrap().request_scan(0).unwrap();
        let hud = HudSnapshot::capture(&world, &ctx, &cfg, agent, surface).unwrap();
        assert_eq!(hud.revealed, vec![Vec2::new(4.0, 4.0)]);

        let json = serde_json::to_value(&hud).unwrap();
        assert_eq!(json["current_units"], 5);
        assert_eq!(json["flags"]["scanning"], true);
        assert_eq!(json["health_band"], "Healthy");
    }

    #[test]
    fn swapped_handles_are_reported() {
        let cfg = SessionConfig::default();
        let mut world = World::new();
        let ctx = SessionContext::new(&cfg);
        let agent = spawn_agent(&mut world, &cfg, Vec2::ZERO);
        let surface = spawn_surface(&mut world, &cfg, None).unwrap();
        assert!(matches!(
            HudSnapshot::capture(&world, &ctx, &cfg, surface, surface),
            Err(SessionError::NotAnAgent(_))
        ));
        assert!(matches!(
            HudSnapshot::capture(&world, &ctx, &cfg, agent, agent),
            Err(SessionError::NotASurface(_))
        ));
    }
}
