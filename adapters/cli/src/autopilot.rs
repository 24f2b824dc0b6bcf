//! Scripted player that fortifies the route and plays every wave.

use std::time::Duration;

use path_defence_core::{Cell, CellCoord, CellPoint, Phase, TowerKind};
use path_defence_world::{self as world, query, GameState};
use tracing::{debug, info, warn};

/// Towers are only placed on cells at most this far from a route cell.
const COVER_RADIUS: f32 = 1.5;

/// Outcome of an autopilot run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) phase: Phase,
    pub(crate) wave: u32,
    pub(crate) wave_count: usize,
    pub(crate) lives: u32,
    pub(crate) gold: u32,
    pub(crate) score: u32,
    pub(crate) towers: usize,
    pub(crate) steps: u64,
}

impl RunSummary {
    fn capture(state: &GameState, steps: u64) -> Self {
        Self {
            phase: query::phase(state),
            wave: query::current_wave(state),
            wave_count: query::wave_count(state),
            lives: query::lives(state),
            gold: query::gold(state),
            score: query::score(state),
            towers: query::towers(state).len(),
            steps,
        }
    }
}

/// Drives a game with a fixed tower kind and step length.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Autopilot {
    kind: TowerKind,
    dt: Duration,
    max_steps: u64,
}

impl Autopilot {
    pub(crate) const fn new(kind: TowerKind, dt: Duration, max_steps: u64) -> Self {
        Self {
            kind,
            dt,
            max_steps,
        }
    }

    /// Plays until the game ends or the step budget runs out.
    pub(crate) fn run(&self, initial: &GameState) -> RunSummary {
        let mut state = initial.clone();
        let mut steps = 0_u64;

        loop {
            match query::phase(&state) {
                Phase::Won | Phase::Lost => break,
                Phase::Build | Phase::BetweenWaves => {
                    state = fortify(&state, self.kind);
                    state = world::start_wave(&state);
                    info!(
                        wave = query::current_wave(&state) + 1,
                        towers = query::towers(&state).len(),
                        gold = query::gold(&state),
                        "wave started"
                    );
                }
                Phase::Wave => {
                    if steps >= self.max_steps {
                        warn!(steps, "step budget exhausted mid-wave");
                        break;
                    }
                    state = world::step_wave(&state, self.dt);
                    steps += 1;

                    if query::phase(&state) != Phase::Wave {
                        info!(
                            lives = query::lives(&state),
                            gold = query::gold(&state),
                            score = query::score(&state),
                            phase = ?query::phase(&state),
                            "wave finished"
                        );
                    }
                }
            }
        }

        RunSummary::capture(&state, steps)
    }
}

/// Places towers of `kind` on every affordable cell next to the route,
/// scanning the grid in row-major order.
pub(crate) fn fortify(state: &GameState, kind: TowerKind) -> GameState {
    let sites: Vec<CellCoord> = query::cells(state)
        .iter()
        .filter(|(cell, classification)| {
            *classification == Cell::Buildable && covers_route(state, *cell)
        })
        .map(|(cell, _)| cell)
        .collect();

    let mut state = state.clone();
    for cell in sites {
        if !query::can_place(&state, cell, kind) {
            break;
        }
        state = world::place_tower(&state, cell, kind);
        debug!(%cell, ?kind, "autopilot placed tower");
    }
    state
}

fn covers_route(state: &GameState, cell: CellCoord) -> bool {
    let point = CellPoint::from(cell);
    query::path(state)
        .iter()
        .any(|waypoint| CellPoint::from(*waypoint).distance(point) <= COVER_RADIUS)
}
