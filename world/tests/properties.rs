//! Property tests over random command scripts.

use std::time::Duration;

use path_defence_core::{Cell, CellCoord, Command, Phase, TowerId, TowerKind};
use path_defence_world::{self as world, create_game, query, scaffolding, GameState};
use proptest::prelude::*;

fn arb_kind() -> impl Strategy<Value = TowerKind> {
    prop_oneof![
        Just(TowerKind::Arrow),
        Just(TowerKind::Slow),
        Just(TowerKind::Splash),
    ]
}

fn arb_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        3 => (arb_kind(), 0..22u32, 0..14u32).prop_map(|(kind, column, row)| Command::PlaceTower {
            kind,
            cell: CellCoord::new(column, row),
        }),
        1 => (0..40u32).prop_map(|id| Command::SellTower {
            tower: TowerId::new(id),
        }),
        1 => Just(Command::StartWave),
        6 => (1..400u64).prop_map(|millis| Command::Tick {
            dt: Duration::from_millis(millis),
        }),
    ]
}

fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
    proptest::collection::vec(arb_command(), 1..=max_len)
}

fn rich_game() -> GameState {
    scaffolding::with_gold(&create_game(None).expect("default game"), 2_000)
}

fn run(state: &GameState, script: &[Command]) -> Vec<GameState> {
    let mut states = vec![state.clone()];
    let mut current = state.clone();
    for command in script {
        current = world::apply(&current, command.clone(), &mut Vec::new());
        states.push(current.clone());
    }
    states
}

fn assert_lockstep(state: &GameState) {
    let towers = query::towers(state);
    assert_eq!(query::cells(state).count(Cell::Blocked), towers.len());
    for tower in towers {
        assert_eq!(query::cell(state, tower.cell), Some(Cell::Blocked));
        assert_eq!(
            towers.iter().filter(|other| other.cell == tower.cell).count(),
            1
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn blocked_cells_track_towers(script in arb_script(80)) {
        for state in run(&rich_game(), &script) {
            assert_lockstep(&state);
        }
    }

    #[test]
    fn lives_never_increase(script in arb_script(120)) {
        let states = run(&create_game(None).expect("default game"), &script);
        for pair in states.windows(2) {
            prop_assert!(query::lives(&pair[1]) <= query::lives(&pair[0]));
        }
        let last = states.last().expect("initial state is recorded");
        if query::lives(last) == 0 {
            prop_assert_eq!(query::phase(last), Phase::Lost);
        }
    }

    #[test]
    fn identical_scripts_produce_identical_states(script in arb_script(60)) {
        let first = run(&rich_game(), &script);
        let second = run(&rich_game(), &script);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn terminal_states_ignore_every_command(script in arb_script(20)) {
        let state = world::start_wave(&scaffolding::with_lives(&rich_game(), 1));
        let mut lost = state;
        while query::phase(&lost) == Phase::Wave {
            lost = world::step_wave(&lost, Duration::from_secs(1));
        }
        prop_assume!(query::phase(&lost) == Phase::Lost);

        for command in script {
            if matches!(command, Command::StartWave | Command::Tick { .. }) {
                let next = world::apply(&lost, command, &mut Vec::new());
                prop_assert_eq!(&next, &lost);
            }
        }
    }
}
