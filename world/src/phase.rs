//! Wave lifecycle: starting waves and resolving deaths, escapes, and phase
//! transitions at the end of every step.

use path_defence_core::{Event, Phase, SpawnProgress};
use tracing::{debug, trace};

use crate::GameState;

impl GameState {
    pub(crate) fn start_wave(&mut self, out: &mut Vec<Event>) {
        if !self.phase.accepts_start_wave() {
            trace!(phase = ?self.phase, "wave start rejected");
            out.push(Event::WaveRejected { phase: self.phase });
            return;
        }

        let total = self.active_wave().map_or(0, |wave| wave.total());
        self.spawn = SpawnProgress::for_wave(total);

        debug!(wave = self.current_wave, total, "wave started");
        self.transition(Phase::Wave, out);
        out.push(Event::WaveStarted {
            wave: self.current_wave,
            total,
        });
    }

    /// Resolves deaths before escapes, then decides whether the wave ended.
    ///
    /// Only an active wave is settled, so the wave ends exactly once.
    pub(crate) fn settle(&mut self, out: &mut Vec<Event>) {
        if self.phase != Phase::Wave {
            return;
        }

        for enemy in self.enemies.iter_mut() {
            if enemy.alive && enemy.health.is_depleted() {
                enemy.alive = false;
                self.gold = self.gold.saturating_add(enemy.reward);
                self.score = self.score.saturating_add(enemy.reward);
                out.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    reward: enemy.reward,
                });
            }
        }

        let route_len = self.path.len();
        for enemy in self.enemies.iter_mut() {
            if enemy.alive && enemy.reached_end(route_len) {
                enemy.alive = false;
                self.lives = self.lives.saturating_sub(1);
                debug!(enemy = enemy.id.get(), lives = self.lives, "enemy escaped");
                out.push(Event::EnemyEscaped { enemy: enemy.id });
            }
        }

        if self.lives == 0 {
            self.transition(Phase::Lost, out);
            return;
        }

        let cleared = self.spawn.is_complete() && self.enemies.iter().all(|enemy| !enemy.alive);
        if !cleared {
            return;
        }

        let next = self.current_wave.saturating_add(1);
        if usize::try_from(next).map_or(true, |next| next >= self.waves.len()) {
            self.transition(Phase::Won, out);
        } else {
            self.current_wave = next;
            self.transition(Phase::BetweenWaves, out);
        }
    }

    fn transition(&mut self, to: Phase, out: &mut Vec<Event>) {
        let from = self.phase;
        if from == to {
            return;
        }

        self.phase = to;
        debug!(?from, ?to, wave = self.current_wave, "phase changed");
        out.push(Event::PhaseChanged { from, to });
    }
}
