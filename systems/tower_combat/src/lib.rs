#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves tower shots against their selected targets.

use std::time::Duration;

use path_defence_core::{
    Enemy, Event, Tower, TowerKind, TowerTarget, SLOW_DURATION, SPLASH_DAMAGE_FRACTION,
    SPLASH_RADIUS,
};

/// Tower combat system that applies damage and secondary effects.
#[derive(Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates a new tower combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decrements every tower's cooldown by `dt`, flooring at zero.
    ///
    /// Cooldowns decay whether or not a target is available, so a tower idling
    /// without enemies in range is ready the moment one arrives.
    pub fn cool_down(&self, towers: &mut [Tower], dt: Duration) {
        for tower in towers {
            tower.ready_in = tower.ready_in.saturating_sub(dt);
        }
    }

    /// Fires every tower named in `targets` at its selected enemy.
    ///
    /// A hit subtracts the tower's damage from the target. Slow towers also
    /// reset the target's slow timer to [`SLOW_DURATION`]; splash towers also
    /// deal [`SPLASH_DAMAGE_FRACTION`] of their damage to every other living
    /// enemy within [`SPLASH_RADIUS`] of the target. Firing restarts the
    /// tower's cooldown. Deaths are not resolved here: hit points may go
    /// negative and the `alive` flag is left untouched.
    pub fn handle(
        &mut self,
        towers: &mut [Tower],
        enemies: &mut [Enemy],
        targets: &[TowerTarget],
        out: &mut Vec<Event>,
    ) {
        for target in targets {
            let Some(tower) = towers.iter_mut().find(|tower| tower.id == target.tower) else {
                continue;
            };
            if !tower.is_ready() {
                continue;
            }

            let Some(primary) = enemies
                .iter()
                .position(|enemy| enemy.id == target.enemy && enemy.alive)
            else {
                continue;
            };

            strike(tower, enemies, primary);
            tower.ready_in = tower.cooldown;
            out.push(Event::TowerFired {
                tower: tower.id,
                enemy: target.enemy,
            });
        }
    }
}

fn strike(tower: &Tower, enemies: &mut [Enemy], primary: usize) {
    let target = &mut enemies[primary];
    target.health.apply_damage(tower.damage);

    match tower.kind {
        TowerKind::Arrow => {}
        TowerKind::Slow => target.slowed_for = SLOW_DURATION,
        TowerKind::Splash => {
            let center = target.position;
            let splash_damage = tower.damage * SPLASH_DAMAGE_FRACTION;

            for (index, enemy) in enemies.iter_mut().enumerate() {
                if index == primary || !enemy.alive {
                    continue;
                }

                if center.distance(enemy.position) <= SPLASH_RADIUS {
                    enemy.health.apply_damage(splash_damage);
                }
            }
        }
    }
}
