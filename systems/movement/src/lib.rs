#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that carries enemies along the cached route.

use std::time::Duration;

use path_defence_core::{CellCoord, CellPoint, Enemy};

/// Pure system that advances living enemies along the route.
#[derive(Clone, Copy, Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Advances every living enemy by the distance it covers in `dt`.
    ///
    /// Travel distance is consumed waypoint by waypoint: reaching a waypoint
    /// increments the enemy's path index and the leftover distance carries on
    /// toward the next one. An enemy that consumes the final waypoint stops
    /// with a path index equal to the route length. Slow timers decay by `dt`
    /// after the move, so a slow active at the start of the step applies to
    /// the whole step.
    pub fn handle(&self, route: &[CellCoord], enemies: &mut [Enemy], dt: Duration) {
        let seconds = dt.as_secs_f32();

        for enemy in enemies.iter_mut().filter(|enemy| enemy.alive) {
            let remaining = enemy.effective_speed() * seconds;
            advance(enemy, route, remaining);
            enemy.slowed_for = enemy.slowed_for.saturating_sub(dt);
        }
    }
}

fn advance(enemy: &mut Enemy, route: &[CellCoord], mut remaining: f32) {
    while remaining > 0.0 {
        let Some(&next) = route.get(enemy.path_index) else {
            return;
        };

        let waypoint = CellPoint::from(next);
        let gap = enemy.position.distance(waypoint);

        if gap <= remaining {
            enemy.position = waypoint;
            enemy.path_index += 1;
            remaining -= gap;
        } else {
            enemy.position = enemy.position.toward(waypoint, remaining);
            remaining = 0.0;
        }
    }
}
