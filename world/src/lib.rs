#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Path Defence.
//!
//! Every operation takes a snapshot by reference and returns a new snapshot;
//! callers never observe partial updates. Rejected commands return a state
//! equal to the input and describe the rejection through [`Event`]s.

mod map;
mod phase;
mod towers;

use std::{num::NonZeroU32, sync::Arc, time::Duration};

use path_defence_core::{
    CellCoord, Command, Enemy, EnemyId, Event, GameConfig, Phase, PathFinder, PathGrid,
    SpawnProgress, TowerId, TowerKind, Wave,
};
use path_defence_system_movement::Movement;
use path_defence_system_pathfinding::BreadthFirst;
use path_defence_system_spawning::Spawning;
use path_defence_system_tower_combat::TowerCombat;
use path_defence_system_tower_targeting::TowerTargeting;
use thiserror::Error;
use tracing::{debug, trace};

pub use map::{build_map, CellGrid, MapLayout};

use towers::TowerRegistry;

/// Failures that can occur while constructing a game.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The configured map has a zero-length edge.
    #[error("map dimensions must be positive, got {columns}x{rows}")]
    InvalidDimensions {
        /// Configured number of columns.
        columns: u32,
        /// Configured number of rows.
        rows: u32,
    },
    /// The configuration does not list any waves.
    #[error("wave table is empty")]
    EmptyWaveTable,
    /// The route provider could not connect the corridor endpoints.
    #[error("no route from {start} to {end}")]
    PathNotFound {
        /// Corridor entrance.
        start: CellCoord,
        /// Corridor exit.
        end: CellCoord,
    },
}

/// Immutable snapshot of a game in progress.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    seed: u64,
    cells: CellGrid,
    path: Arc<[CellCoord]>,
    start: CellCoord,
    end: CellCoord,
    towers: TowerRegistry,
    enemies: Vec<Enemy>,
    waves: Arc<[Wave]>,
    current_wave: u32,
    spawn: SpawnProgress,
    gold: u32,
    lives: u32,
    score: u32,
    phase: Phase,
    next_id: u32,
}

impl GameState {
    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn active_wave(&self) -> Option<&Wave> {
        usize::try_from(self.current_wave)
            .ok()
            .and_then(|index| self.waves.get(index))
    }

    fn step(&mut self, dt: Duration, out: &mut Vec<Event>) {
        if self.phase != Phase::Wave {
            return;
        }

        out.push(Event::TimeAdvanced { dt });
        self.enemies.retain(|enemy| enemy.alive);
        self.release_enemies(dt, out);

        Movement::new().handle(&self.path, &mut self.enemies, dt);

        let mut combat = TowerCombat::new();
        combat.cool_down(self.towers.as_mut_slice(), dt);

        let mut targets = Vec::new();
        TowerTargeting::new().handle(self.towers.as_slice(), &self.enemies, &mut targets);
        combat.handle(
            self.towers.as_mut_slice(),
            &mut self.enemies,
            &targets,
            out,
        );

        self.settle(out);
    }

    fn release_enemies(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let waves = Arc::clone(&self.waves);
        let Some(wave) = usize::try_from(self.current_wave)
            .ok()
            .and_then(|index| waves.get(index))
        else {
            return;
        };

        let mut released = Vec::new();
        Spawning::default().handle(wave, &mut self.spawn, dt, &mut released);

        for kind in released {
            let enemy = EnemyId::new(self.allocate_id());
            trace!(enemy = enemy.get(), ?kind, "enemy spawned");
            self.enemies.push(Enemy::spawn(enemy, kind, self.start));
            out.push(Event::EnemySpawned { enemy, kind });
        }
    }
}

/// Creates a game on the default level using the default configuration.
pub fn create_game(seed: Option<u64>) -> Result<GameState, GameError> {
    create_game_with(&GameConfig::default(), seed, &BreadthFirst::new())
}

/// Creates a game from the provided configuration and route provider.
///
/// The route is computed once here and never changes afterwards. A route that
/// does not step between adjacent corridor cells from the entrance to the exit
/// is treated the same as a missing one.
pub fn create_game_with(
    config: &GameConfig,
    seed: Option<u64>,
    finder: &dyn PathFinder,
) -> Result<GameState, GameError> {
    let (Some(columns), Some(rows)) = (
        NonZeroU32::new(config.columns),
        NonZeroU32::new(config.rows),
    ) else {
        return Err(GameError::InvalidDimensions {
            columns: config.columns,
            rows: config.rows,
        });
    };
    if config.waves.is_empty() {
        return Err(GameError::EmptyWaveTable);
    }

    let MapLayout { cells, start, end } = build_map(columns, rows);
    let not_found = GameError::PathNotFound { start, end };
    let path = finder
        .find_path(&cells, start, end)
        .ok_or_else(|| not_found.clone())?;

    let well_formed = path.first() == Some(&start)
        && path.last() == Some(&end)
        && path.iter().all(|cell| cells.is_walkable(*cell))
        && path
            .windows(2)
            .all(|pair| pair[0].manhattan_distance(pair[1]) == 1);
    if !well_formed {
        return Err(not_found);
    }

    debug!(
        columns = config.columns,
        rows = config.rows,
        route = path.len(),
        waves = config.waves.len(),
        "game created"
    );

    Ok(GameState {
        seed: seed.unwrap_or(0),
        cells,
        path: path.into(),
        start,
        end,
        towers: TowerRegistry::default(),
        enemies: Vec::new(),
        waves: config.waves.clone().into(),
        current_wave: 0,
        spawn: SpawnProgress::default(),
        gold: config.starting_gold,
        lives: config.starting_lives,
        score: 0,
        phase: Phase::Build,
        next_id: 0,
    })
}

/// Applies the provided command and returns the resulting snapshot.
///
/// Outcomes are appended to `out_events` in the order they happened.
#[must_use]
pub fn apply(state: &GameState, command: Command, out_events: &mut Vec<Event>) -> GameState {
    let mut next = state.clone();
    match command {
        Command::PlaceTower { kind, cell } => next.place_tower(kind, cell, out_events),
        Command::SellTower { tower } => next.sell_tower(tower, out_events),
        Command::StartWave => next.start_wave(out_events),
        Command::Tick { dt } => next.step(dt, out_events),
    }
    next
}

/// Places a tower of `kind` on `cell` when the cell is buildable and
/// affordable; otherwise returns an unchanged snapshot.
#[must_use]
pub fn place_tower(state: &GameState, cell: CellCoord, kind: TowerKind) -> GameState {
    apply(state, Command::PlaceTower { kind, cell }, &mut Vec::new())
}

/// Sells the tower with the provided identifier for half its cost.
#[must_use]
pub fn sell_tower(state: &GameState, tower: TowerId) -> GameState {
    apply(state, Command::SellTower { tower }, &mut Vec::new())
}

/// Starts the current wave from the build or between-waves phase.
#[must_use]
pub fn start_wave(state: &GameState) -> GameState {
    apply(state, Command::StartWave, &mut Vec::new())
}

/// Advances an active wave by `dt`. Outside a wave the state is returned as is.
#[must_use]
pub fn step_wave(state: &GameState, dt: Duration) -> GameState {
    apply(state, Command::Tick { dt }, &mut Vec::new())
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use path_defence_core::{
        Cell, CellCoord, Enemy, Phase, PlacementError, SpawnProgress, Tower, TowerId, TowerKind,
        Wave,
    };

    use super::{towers, CellGrid, GameState};

    /// Current phase of the state machine.
    #[must_use]
    pub fn phase(state: &GameState) -> Phase {
        state.phase
    }

    /// Gold available for construction.
    #[must_use]
    pub fn gold(state: &GameState) -> u32 {
        state.gold
    }

    /// Lives remaining before the game is lost.
    #[must_use]
    pub fn lives(state: &GameState) -> u32 {
        state.lives
    }

    /// Total reward collected from kills.
    #[must_use]
    pub fn score(state: &GameState) -> u32 {
        state.score
    }

    /// Seed recorded at construction.
    #[must_use]
    pub fn seed(state: &GameState) -> u64 {
        state.seed
    }

    /// Zero-based index of the current or next wave.
    #[must_use]
    pub fn current_wave(state: &GameState) -> u32 {
        state.current_wave
    }

    /// Number of waves in the table.
    #[must_use]
    pub fn wave_count(state: &GameState) -> usize {
        state.waves.len()
    }

    /// Ordered wave table.
    #[must_use]
    pub fn waves(state: &GameState) -> &[Wave] {
        &state.waves
    }

    /// Release bookkeeping for the active wave.
    #[must_use]
    pub fn spawn_progress(state: &GameState) -> SpawnProgress {
        state.spawn
    }

    /// Towers in placement order.
    #[must_use]
    pub fn towers(state: &GameState) -> &[Tower] {
        state.towers.as_slice()
    }

    /// Tower with the provided identifier.
    #[must_use]
    pub fn tower(state: &GameState, id: TowerId) -> Option<&Tower> {
        state.towers.get(id)
    }

    /// Tower occupying the provided cell.
    #[must_use]
    pub fn tower_at(state: &GameState, cell: CellCoord) -> Option<&Tower> {
        state.towers.at(cell)
    }

    /// Enemies in spawn order, including those that died or escaped during
    /// the most recent step.
    #[must_use]
    pub fn enemies(state: &GameState) -> &[Enemy] {
        &state.enemies
    }

    /// Enemies still travelling the route.
    pub fn alive_enemies(state: &GameState) -> impl Iterator<Item = &Enemy> + '_ {
        state.enemies.iter().filter(|enemy| enemy.alive)
    }

    /// Classified cell grid.
    #[must_use]
    pub fn cells(state: &GameState) -> &CellGrid {
        &state.cells
    }

    /// Classification of a single cell, or `None` when out of bounds.
    #[must_use]
    pub fn cell(state: &GameState, cell: CellCoord) -> Option<Cell> {
        state.cells.get(cell)
    }

    /// Enemy route from entrance to exit, both inclusive.
    #[must_use]
    pub fn path(state: &GameState) -> &[CellCoord] {
        &state.path
    }

    /// Corridor entrance.
    #[must_use]
    pub fn start(state: &GameState) -> CellCoord {
        state.start
    }

    /// Corridor exit.
    #[must_use]
    pub fn end(state: &GameState) -> CellCoord {
        state.end
    }

    /// Map dimensions as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(state: &GameState) -> (u32, u32) {
        (state.cells.columns(), state.cells.rows())
    }

    /// Reason a placement would be rejected, or `None` when it would succeed.
    #[must_use]
    pub fn placement_error(
        state: &GameState,
        cell: CellCoord,
        kind: TowerKind,
    ) -> Option<PlacementError> {
        towers::placement_error(state, cell, kind)
    }

    /// Reports whether a placement would succeed.
    #[must_use]
    pub fn can_place(state: &GameState, cell: CellCoord, kind: TowerKind) -> bool {
        placement_error(state, cell, kind).is_none()
    }
}

/// Helpers that fabricate states unreachable through normal play.
#[cfg(any(test, feature = "test_scaffolding"))]
pub mod scaffolding {
    use super::GameState;

    /// Returns a copy of `state` with the provided number of lives.
    #[must_use]
    pub fn with_lives(state: &GameState, lives: u32) -> GameState {
        GameState {
            lives,
            ..state.clone()
        }
    }

    /// Returns a copy of `state` with the provided amount of gold.
    #[must_use]
    pub fn with_gold(state: &GameState, gold: u32) -> GameState {
        GameState {
            gold,
            ..state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use path_defence_core::{Cell, EnemyKind, PlacementError, WaveGroup, STARTING_GOLD};

    use super::*;

    struct Unreachable;

    impl PathFinder for Unreachable {
        fn find_path(
            &self,
            _grid: &dyn PathGrid,
            _start: CellCoord,
            _end: CellCoord,
        ) -> Option<Vec<CellCoord>> {
            None
        }
    }

    struct Teleport;

    impl PathFinder for Teleport {
        fn find_path(
            &self,
            _grid: &dyn PathGrid,
            start: CellCoord,
            end: CellCoord,
        ) -> Option<Vec<CellCoord>> {
            Some(vec![start, end])
        }
    }

    struct Skipping;

    impl PathFinder for Skipping {
        fn find_path(
            &self,
            grid: &dyn PathGrid,
            start: CellCoord,
            end: CellCoord,
        ) -> Option<Vec<CellCoord>> {
            let mut route = BreadthFirst::new().find_path(grid, start, end)?;
            let _ = route.remove(route.len() / 2);
            Some(route)
        }
    }

    #[test]
    fn zero_sized_maps_are_rejected() {
        let config = GameConfig {
            columns: 0,
            ..GameConfig::default()
        };
        let error = create_game_with(&config, None, &BreadthFirst::new()).unwrap_err();
        assert_eq!(
            error,
            GameError::InvalidDimensions {
                columns: 0,
                rows: 12
            }
        );
    }

    #[test]
    fn empty_wave_tables_are_rejected() {
        let config = GameConfig {
            waves: Vec::new(),
            ..GameConfig::default()
        };
        let error = create_game_with(&config, None, &BreadthFirst::new()).unwrap_err();
        assert_eq!(error, GameError::EmptyWaveTable);
    }

    #[test]
    fn missing_route_is_reported() {
        let error = create_game_with(&GameConfig::default(), None, &Unreachable).unwrap_err();
        assert_eq!(
            error,
            GameError::PathNotFound {
                start: CellCoord::new(0, 2),
                end: CellCoord::new(19, 9)
            }
        );
        assert_eq!(error.to_string(), "no route from (0, 2) to (19, 9)");
    }

    #[test]
    fn routes_through_non_corridor_cells_are_rejected() {
        let error = create_game_with(&GameConfig::default(), None, &Teleport).unwrap_err();
        assert!(matches!(error, GameError::PathNotFound { .. }));
    }

    #[test]
    fn routes_with_gaps_are_rejected() {
        let error = create_game_with(&GameConfig::default(), None, &Skipping).unwrap_err();
        assert!(matches!(error, GameError::PathNotFound { .. }));
    }

    #[test]
    fn accepted_route_only_steps_between_neighbours() {
        let state = create_game(None).expect("default game");
        for pair in state.path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn created_game_starts_in_build_phase() {
        let state = create_game(Some(7)).expect("default game");

        assert_eq!(state.phase, Phase::Build);
        assert_eq!(state.gold, STARTING_GOLD);
        assert_eq!(state.seed, 7);
        assert_eq!(state.path.first(), Some(&state.start));
        assert_eq!(state.path.last(), Some(&state.end));
        assert_eq!(state.path.len(), state.cells.count(Cell::Path));
    }

    #[test]
    fn identifiers_are_shared_between_towers_and_enemies() {
        let config = GameConfig {
            waves: vec![Wave::new(vec![WaveGroup::new(EnemyKind::Grunt, 1)])],
            ..GameConfig::default()
        };
        let state = create_game_with(&config, None, &BreadthFirst::new()).expect("game");
        let state = place_tower(&state, CellCoord::new(0, 0), TowerKind::Arrow);
        let state = start_wave(&state);

        let mut events = Vec::new();
        let state = apply(
            &state,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );

        assert_eq!(state.towers.as_slice()[0].id, TowerId::new(0));
        assert_eq!(state.enemies[0].id, EnemyId::new(1));
    }

    #[test]
    fn apply_leaves_input_untouched() {
        let state = create_game(None).expect("default game");
        let before = state.clone();

        let mut events = Vec::new();
        let next = apply(
            &state,
            Command::PlaceTower {
                kind: TowerKind::Splash,
                cell: CellCoord::new(0, 0),
            },
            &mut events,
        );

        assert_eq!(state, before);
        assert_ne!(next, before);
        assert_eq!(next.cells.get(CellCoord::new(0, 0)), Some(Cell::Blocked));
    }

    #[test]
    fn placement_checks_bounds_before_classification_before_gold() {
        let state = scaffolding::with_gold(&create_game(None).expect("game"), 0);

        assert_eq!(
            query::placement_error(&state, CellCoord::new(40, 40), TowerKind::Arrow),
            Some(PlacementError::OutOfBounds)
        );
        assert_eq!(
            query::placement_error(&state, state.start, TowerKind::Arrow),
            Some(PlacementError::NotBuildable)
        );
        assert_eq!(
            query::placement_error(&state, CellCoord::new(0, 0), TowerKind::Arrow),
            Some(PlacementError::InsufficientGold)
        );
    }
}
