//! Dust scatter - random piles around a centre, kept off the furniture.

use std::f32::consts::TAU;

use hecs::{Entity, World};
use rand::Rng;
use scrubbot_logic::config::ScatterConfig;

use crate::components::{Dust, Obstacle, Position, Vec2};

/// Scatter `config.count` dust piles within `config.radius` of the centre.
///
/// Each pile gets up to `max_attempts` tries to find a spot whose circle
/// does not overlap any obstacle; piles that never find one are skipped.
pub fn scatter_dust<R: Rng>(world: &mut World, config: &ScatterConfig, rng: &mut R) -> Vec<Entity> {
    let obstacles: Vec<(Vec2, f32)> = world
        .query::<(&Position, &Obstacle)>()
        .iter()
        .map(|(_, (pos, obstacle))| (pos.0, obstacle.radius))
        .collect();
    let center = Vec2::new(config.center[0], config.center[1]);

    let mut spawned = Vec::with_capacity(config.count as usize);
    for i in 0..config.count {
        match find_clear_spot(center, config, &obstacles, rng) {
            Some(at) => spawned.push(world.spawn((Dust, Position(at)))),
            None => log::warn!(
                "dust {} found no clear spot in {} attempts, skipped",
                i,
                config.max_attempts
            ),
        }
    }
    log::debug!("scattered {} of {} dust piles", spawned.len(), config.count);
    spawned
}

fn find_clear_spot<R: Rng>(
    center: Vec2,
    config: &ScatterConfig,
    obstacles: &[(Vec2, f32)],
    rng: &mut R,
) -> Option<Vec2> {
    (0..config.max_attempts)
        .map(|_| random_point_in_disk(center, config.radius, rng))
        .find(|p| {
            obstacles.iter().all(|(at, radius)| {
                let reach = radius + config.dust_radius;
                p.distance_squared(at) > reach * reach
            })
        })
}

fn random_point_in_disk<R: Rng>(center: Vec2, radius: f32, rng: &mut R) -> Vec2 {
    let angle = rng.gen_range(0.0..TAU);
    let r = radius * rng.gen::<f32>().sqrt();
    center + Vec2::new(r * angle.cos(), r * angle.sin())
}
