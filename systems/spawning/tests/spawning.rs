use std::time::Duration;

use path_defence_core::{EnemyKind, SpawnProgress, Wave, WaveGroup};
use path_defence_system_spawning::{Config, Spawning};

fn mixed_wave() -> Wave {
    Wave::new(vec![
        WaveGroup::new(EnemyKind::Grunt, 2),
        WaveGroup::new(EnemyKind::Runner, 3),
        WaveGroup::new(EnemyKind::Brute, 1),
    ])
}

#[test]
fn first_release_waits_for_a_full_interval() {
    let spawning = Spawning::new(Config::new(Duration::from_millis(500)));
    let wave = mixed_wave();
    let mut progress = SpawnProgress::for_wave(wave.total());
    let mut out = Vec::new();

    for _ in 0..4 {
        spawning.handle(&wave, &mut progress, Duration::from_millis(100), &mut out);
    }
    assert!(out.is_empty(), "no release before 0.5s elapsed");

    spawning.handle(&wave, &mut progress, Duration::from_millis(100), &mut out);
    assert_eq!(out, vec![EnemyKind::Grunt]);
    assert_eq!(progress.accumulator, Duration::ZERO);
}

#[test]
fn large_dt_catches_up_with_every_missed_interval() {
    let spawning = Spawning::default();
    let wave = mixed_wave();
    let mut progress = SpawnProgress::for_wave(wave.total());
    let mut out = Vec::new();

    spawning.handle(&wave, &mut progress, Duration::from_millis(1_700), &mut out);

    assert_eq!(
        out,
        vec![EnemyKind::Grunt, EnemyKind::Grunt, EnemyKind::Runner],
        "three whole intervals fit into 1.7s"
    );
    assert_eq!(progress.spawned, 3);
    assert_eq!(progress.accumulator, Duration::from_millis(200));
}

#[test]
fn release_order_walks_groups_and_stops_at_total() {
    let spawning = Spawning::default();
    let wave = mixed_wave();
    let mut progress = SpawnProgress::for_wave(wave.total());
    let mut out = Vec::new();

    spawning.handle(&wave, &mut progress, Duration::from_secs(60), &mut out);

    assert_eq!(
        out,
        vec![
            EnemyKind::Grunt,
            EnemyKind::Grunt,
            EnemyKind::Runner,
            EnemyKind::Runner,
            EnemyKind::Runner,
            EnemyKind::Brute,
        ]
    );
    assert!(progress.is_complete());
}

#[test]
fn identical_inputs_release_identical_sequences() {
    let run = || {
        let spawning = Spawning::default();
        let wave = mixed_wave();
        let mut progress = SpawnProgress::for_wave(wave.total());
        let mut out = Vec::new();
        for step in [130u64, 470, 20, 900, 310, 1_000] {
            spawning.handle(&wave, &mut progress, Duration::from_millis(step), &mut out);
        }
        (out, progress)
    };

    assert_eq!(run(), run());
}
