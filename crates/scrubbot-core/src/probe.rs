//! Surface probes: where under the agent is the brush landing?
//!
//! In the game this is a downward raycast that reports a texture
//! coordinate. The session only needs the result, so the probe is a trait:
//! the default [`FloorProbe`] projects the agent's floor position onto
//! whichever surface rectangle contains it, and hosts with a real physics
//! layer can supply their own.

use hecs::{Entity, World};

use crate::components::{Position, Surface};

/// A probe hit: which surface, and where on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub surface: Entity,
    pub u: f32,
    pub v: f32,
}

pub trait SurfaceProbe: Send + Sync {
    /// Find the surface point under `agent`, if any.
    fn probe(&self, world: &World, agent: Entity) -> Option<ProbeHit>;
}

/// Straight-down projection onto axis-aligned surface rectangles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloorProbe;

impl SurfaceProbe for FloorProbe {
    fn probe(&self, world: &World, agent: Entity) -> Option<ProbeHit> {
        let pos = world.get::<&Position>(agent).ok()?.0;
        world
            .query::<&Surface>()
            .iter()
            .find_map(|(surface, s)| {
                s.bounds
                    .uv(pos.x, pos.z)
                    .map(|(u, v)| ProbeHit { surface, u, v })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrubbot_logic::canvas::{Brush, StainCanvas};
    use scrubbot_logic::movement::FloorBounds;

    fn surface(min: [f32; 2], max: [f32; 2]) -> Surface {
        Surface {
            canvas: StainCanvas::new(8, None).unwrap(),
            brush: Brush::circular(1),
            bounds: FloorBounds::new(min, max),
        }
    }

    #[test]
    fn projects_onto_containing_surface() {
        let mut world = World::new();
        let _left = world.spawn((surface([-10.0, -10.0], [0.0, 10.0]),));
        let right = world.spawn((surface([0.5, -10.0], [10.5, 10.0]),));
        let agent = world.spawn((Position::new(5.5, 0.0),));

        let hit = FloorProbe.probe(&world, agent).unwrap();
        assert_eq!(hit.surface, right);
        assert!((hit.u - 0.5).abs() < 1e-6);
        assert!((hit.v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn misses_off_floor_or_without_position() {
        let mut world = World::new();
        world.spawn((surface([0.0, 0.0], [1.0, 1.0]),));
        let off = world.spawn((Position::new(5.0, 5.0),));
        let nowhere = world.spawn(());
        assert!(FloorProbe.probe(&world, off).is_none());
        assert!(FloorProbe.probe(&world, nowhere).is_none());
    }
}
