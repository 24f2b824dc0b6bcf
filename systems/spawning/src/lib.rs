#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler that decides which enemies enter the route.

use std::time::Duration;

use path_defence_core::{EnemyKind, SpawnProgress, Wave, SPAWN_INTERVAL};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence.
    #[must_use]
    pub const fn new(spawn_interval: Duration) -> Self {
        Self { spawn_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SPAWN_INTERVAL)
    }
}

/// Pure system that releases wave enemies at a fixed cadence.
///
/// Elapsed time is accrued in [`SpawnProgress::accumulator`]. Every whole
/// interval contained in the accumulator releases one enemy until the wave is
/// exhausted, so a single long step releases as many enemies as the elapsed
/// time covers.
#[derive(Clone, Copy, Debug)]
pub struct Spawning {
    spawn_interval: Duration,
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
        }
    }

    /// Advances `progress` by `dt` and appends the kinds released this step.
    ///
    /// Kinds are appended in release order; the caller allocates identifiers
    /// and places the enemies at the route start.
    pub fn handle(
        &self,
        wave: &Wave,
        progress: &mut SpawnProgress,
        dt: Duration,
        out: &mut Vec<EnemyKind>,
    ) {
        if self.spawn_interval.is_zero() || progress.is_complete() {
            return;
        }

        progress.accumulator = progress.accumulator.saturating_add(dt);

        while progress.accumulator >= self.spawn_interval && !progress.is_complete() {
            let Some(kind) = wave.kind_at(progress.spawned) else {
                break;
            };

            progress.accumulator -= self.spawn_interval;
            progress.spawned += 1;
            out.push(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use path_defence_core::WaveGroup;

    #[test]
    fn zero_interval_never_releases() {
        let spawning = Spawning::new(Config::new(Duration::ZERO));
        let wave = Wave::new(vec![WaveGroup::new(EnemyKind::Grunt, 3)]);
        let mut progress = SpawnProgress::for_wave(wave.total());
        let mut out = Vec::new();

        spawning.handle(&wave, &mut progress, Duration::from_secs(10), &mut out);

        assert!(out.is_empty());
        assert_eq!(progress.spawned, 0);
    }

    #[test]
    fn completed_wave_stops_accruing_time() {
        let spawning = Spawning::default();
        let wave = Wave::new(vec![WaveGroup::new(EnemyKind::Grunt, 1)]);
        let mut progress = SpawnProgress::for_wave(wave.total());
        let mut out = Vec::new();

        spawning.handle(&wave, &mut progress, Duration::from_millis(500), &mut out);
        assert_eq!(out, vec![EnemyKind::Grunt]);
        assert!(progress.is_complete());

        spawning.handle(&wave, &mut progress, Duration::from_secs(3), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(progress.accumulator, Duration::ZERO);
    }
}
