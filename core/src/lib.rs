#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Path Defence engine.
//!
//! This crate defines the value types that flow between the authoritative
//! world and the pure systems. Hosts submit [`Command`] values describing
//! desired mutations, the world folds each command into a fresh state snapshot
//! and reports what happened through [`Event`] values. Systems never hold on to
//! world state; they receive slices of [`Tower`] and [`Enemy`] snapshots, do
//! their part of a simulation step, and hand the results back.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Interval between successive enemy releases within a wave.
pub const SPAWN_INTERVAL: Duration = Duration::from_millis(500);

/// Time a slow tower hit keeps its target slowed.
pub const SLOW_DURATION: Duration = Duration::from_secs(2);

/// Multiplier applied to enemy speed while a slow effect is active.
pub const SLOW_SPEED_MULTIPLIER: f32 = 0.5;

/// Radius around a splash tower's primary target that receives secondary damage.
pub const SPLASH_RADIUS: f32 = 1.5;

/// Fraction of a splash tower's damage dealt to enemies near the primary target.
pub const SPLASH_DAMAGE_FRACTION: f32 = 0.5;

/// Gold available to the player when a game starts.
pub const STARTING_GOLD: u32 = 200;

/// Lives available to the player when a game starts.
pub const STARTING_LIVES: u32 = 10;

/// Number of columns in the default level.
pub const DEFAULT_MAP_COLUMNS: u32 = 20;

/// Number of rows in the default level.
pub const DEFAULT_MAP_ROWS: u32 = 12;

/// Active stage of the game's top-level state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Initial planning stage before the first wave.
    Build,
    /// Enemies are being released and combat resolves every step.
    Wave,
    /// A wave was cleared and the next one has not been started yet.
    BetweenWaves,
    /// The final wave was cleared. Terminal.
    Won,
    /// The player ran out of lives. Terminal.
    Lost,
}

impl Phase {
    /// Reports whether the phase ends the game.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Reports whether a wave may be started from this phase.
    #[must_use]
    pub const fn accepts_start_wave(self) -> bool {
        matches!(self, Self::Build | Self::BetweenWaves)
    }
}

/// Commands that express all permissible game mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests construction of a tower on the provided cell.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell the tower should occupy.
        cell: CellCoord,
    },
    /// Requests that an existing tower be sold for a partial refund.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests that the next configured wave begins.
    StartWave,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Gold deducted for the construction.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Cell that became buildable again.
        cell: CellCoord,
        /// Gold returned to the player.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Identifier named in the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that a wave began.
    WaveStarted {
        /// Zero-based index of the wave.
        wave: u32,
        /// Number of enemies the wave will release.
        total: u32,
    },
    /// Reports that a wave could not be started from the current phase.
    WaveRejected {
        /// Phase that was active when the request arrived.
        phase: Phase,
    },
    /// Indicates that the simulation clock advanced during a wave.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the step.
        dt: Duration,
    },
    /// Confirms that an enemy entered the route.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        enemy: EnemyId,
        /// Type of the enemy.
        kind: EnemyKind,
    },
    /// Confirms that a tower fired at an enemy.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Primary target of the shot.
        enemy: EnemyId,
    },
    /// Reports that an enemy died and paid out its reward.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Gold and score granted for the kill.
        reward: u32,
    },
    /// Reports that an enemy reached the end of the route.
    EnemyEscaped {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Announces a phase transition.
    PhaseChanged {
        /// Phase before the transition.
        from: Phase,
        /// Phase after the transition.
        to: Phase,
    },
}

/// Classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Part of the enemy route. Never changes once the map is built.
    Path,
    /// Free ground where a tower may be placed.
    Buildable,
    /// Ground occupied by a tower.
    Blocked,
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Number of orthogonal steps separating two cells. Consecutive cells of
    /// a route are always exactly one step apart.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        let columns = self.column.abs_diff(other.column);
        let rows = self.row.abs_diff(other.row);
        columns.saturating_add(rows)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Continuous position measured in cell units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPoint {
    column: f32,
    row: f32,
}

impl CellPoint {
    /// Creates a new point from fractional column and row coordinates.
    #[must_use]
    pub const fn new(column: f32, row: f32) -> Self {
        Self { column, row }
    }

    /// Fractional column coordinate.
    #[must_use]
    pub const fn column(&self) -> f32 {
        self.column
    }

    /// Fractional row coordinate.
    #[must_use]
    pub const fn row(&self) -> f32 {
        self.row
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: CellPoint) -> f32 {
        (other.column - self.column).hypot(other.row - self.row)
    }

    /// Moves `distance` units from this point toward `target`.
    ///
    /// Callers are expected to pass a distance shorter than the gap between
    /// the two points; overshooting is the caller's responsibility.
    #[must_use]
    pub fn toward(self, target: CellPoint, distance: f32) -> CellPoint {
        let gap = self.distance(target);
        if gap <= 0.0 {
            return target;
        }

        let scale = distance / gap;
        CellPoint::new(
            self.column + (target.column - self.column) * scale,
            self.row + (target.row - self.row) * scale,
        )
    }
}

impl From<CellCoord> for CellPoint {
    fn from(cell: CellCoord) -> Self {
        Self::new(cell.column() as f32, cell.row() as f32)
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap single-target tower with a fast fire rate.
    Arrow,
    /// Weak tower whose hits halve the target's speed for a while.
    Slow,
    /// Heavy tower whose hits also damage enemies around the target.
    Splash,
}

impl TowerKind {
    /// Every tower kind in catalogue order.
    pub const ALL: [TowerKind; 3] = [Self::Arrow, Self::Slow, Self::Splash];

    /// Gold required to construct the tower.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Arrow => 50,
            Self::Slow => 70,
            Self::Splash => 100,
        }
    }

    /// Gold returned when the tower is sold.
    #[must_use]
    pub const fn refund(self) -> u32 {
        self.cost() / 2
    }

    /// Hit points removed from the primary target per shot.
    #[must_use]
    pub const fn damage(self) -> f32 {
        match self {
            Self::Arrow => 10.0,
            Self::Slow => 4.0,
            Self::Splash => 12.0,
        }
    }

    /// Targeting radius measured in cells.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::Arrow => 2.5,
            Self::Slow => 2.5,
            Self::Splash => 2.0,
        }
    }

    /// Minimum time between successive shots.
    #[must_use]
    pub const fn cooldown(self) -> Duration {
        match self {
            Self::Arrow => Duration::from_millis(500),
            Self::Slow => Duration::from_secs(1),
            Self::Splash => Duration::from_millis(1_200),
        }
    }
}

/// Types of enemies that waves are composed of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Baseline enemy.
    Grunt,
    /// Fast but fragile enemy.
    Runner,
    /// Slow enemy with a large health pool.
    Brute,
}

impl EnemyKind {
    /// Hit points the enemy spawns with.
    #[must_use]
    pub const fn health(self) -> f32 {
        match self {
            Self::Grunt => 30.0,
            Self::Runner => 20.0,
            Self::Brute => 120.0,
        }
    }

    /// Movement speed measured in cells per second.
    #[must_use]
    pub const fn speed(self) -> f32 {
        match self {
            Self::Grunt => 1.5,
            Self::Runner => 2.5,
            Self::Brute => 0.8,
        }
    }

    /// Gold and score granted when the enemy is killed.
    #[must_use]
    pub const fn reward(self) -> u32 {
        match self {
            Self::Grunt => 5,
            Self::Runner => 4,
            Self::Brute => 15,
        }
    }
}

/// Current and maximum hit points of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    maximum: f32,
}

impl Health {
    /// Creates a full health pool.
    #[must_use]
    pub const fn full(maximum: f32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Remaining hit points. May drop below zero on overkill.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Hit points the pool started with.
    #[must_use]
    pub const fn maximum(&self) -> f32 {
        self.maximum
    }

    /// Remaining fraction of the pool clamped to `[0, 1]`, for health bars.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }

    /// Reports whether the pool has been emptied.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0.0
    }

    /// Removes the provided amount of hit points.
    pub fn apply_damage(&mut self, amount: f32) {
        self.current -= amount;
    }
}

/// Immutable representation of a placed tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Hit points removed from the primary target per shot.
    pub damage: f32,
    /// Targeting radius measured in cells.
    pub range: f32,
    /// Configured time between shots.
    pub cooldown: Duration,
    /// Time remaining before the tower may fire again.
    pub ready_in: Duration,
}

impl Tower {
    /// Builds a ready-to-fire tower with the stats of `kind`.
    #[must_use]
    pub fn new(id: TowerId, kind: TowerKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            cell,
            damage: kind.damage(),
            range: kind.range(),
            cooldown: kind.cooldown(),
            ready_in: Duration::ZERO,
        }
    }

    /// Reports whether the cooldown has elapsed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready_in.is_zero()
    }

    /// Reports whether the provided point lies within targeting range.
    #[must_use]
    pub fn in_range(&self, point: CellPoint) -> bool {
        CellPoint::from(self.cell).distance(point) <= self.range
    }
}

/// Immutable representation of an enemy travelling along the route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Identifier allocated to the enemy.
    pub id: EnemyId,
    /// Type of the enemy.
    pub kind: EnemyKind,
    /// Continuous position along the route.
    pub position: CellPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Base movement speed in cells per second.
    pub speed: f32,
    /// Number of route waypoints already reached. Equals the route length once
    /// the enemy arrives at the exit.
    pub path_index: usize,
    /// Cleared once the enemy dies or escapes.
    pub alive: bool,
    /// Gold and score granted when the enemy is killed.
    pub reward: u32,
    /// Remaining duration of the slow effect.
    pub slowed_for: Duration,
}

impl Enemy {
    /// Spawns a fresh enemy of `kind` at the provided cell.
    #[must_use]
    pub fn spawn(id: EnemyId, kind: EnemyKind, cell: CellCoord) -> Self {
        Self {
            id,
            kind,
            position: CellPoint::from(cell),
            health: Health::full(kind.health()),
            speed: kind.speed(),
            path_index: 0,
            alive: true,
            reward: kind.reward(),
            slowed_for: Duration::ZERO,
        }
    }

    /// Speed after applying any active slow effect.
    #[must_use]
    pub fn effective_speed(&self) -> f32 {
        if self.slowed_for.is_zero() {
            self.speed
        } else {
            self.speed * SLOW_SPEED_MULTIPLIER
        }
    }

    /// Reports whether the enemy consumed every waypoint of a route of `route_len`.
    #[must_use]
    pub fn reached_end(&self, route_len: usize) -> bool {
        self.path_index >= route_len
    }
}

/// Group of identical enemies released consecutively within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveGroup {
    /// Type of every enemy in the group.
    pub kind: EnemyKind,
    /// Number of enemies in the group.
    pub count: u32,
}

impl WaveGroup {
    /// Creates a group of `count` enemies of `kind`.
    #[must_use]
    pub const fn new(kind: EnemyKind, count: u32) -> Self {
        Self { kind, count }
    }
}

/// Scripted batch of enemies released during one wave.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wave {
    groups: Vec<WaveGroup>,
}

impl Wave {
    /// Creates a wave releasing the provided groups in order.
    #[must_use]
    pub fn new(groups: Vec<WaveGroup>) -> Self {
        Self { groups }
    }

    /// Groups composing the wave.
    #[must_use]
    pub fn groups(&self) -> &[WaveGroup] {
        &self.groups
    }

    /// Total number of enemies across all groups.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.groups
            .iter()
            .fold(0, |total, group| total.saturating_add(group.count))
    }

    /// Kind of the enemy released `ordinal`-th within the wave.
    ///
    /// Walks the groups in order, so the first `count` releases come from the
    /// first group, the next ones from the second group, and so on.
    #[must_use]
    pub fn kind_at(&self, ordinal: u32) -> Option<EnemyKind> {
        let mut remaining = ordinal;
        for group in &self.groups {
            if remaining < group.count {
                return Some(group.kind);
            }
            remaining -= group.count;
        }
        None
    }
}

/// Builds the five-wave table shipped with the default level.
#[must_use]
pub fn default_waves() -> Vec<Wave> {
    use EnemyKind::{Brute, Grunt, Runner};

    vec![
        Wave::new(vec![WaveGroup::new(Grunt, 6)]),
        Wave::new(vec![WaveGroup::new(Grunt, 8), WaveGroup::new(Runner, 4)]),
        Wave::new(vec![WaveGroup::new(Runner, 10), WaveGroup::new(Grunt, 6)]),
        Wave::new(vec![WaveGroup::new(Grunt, 10), WaveGroup::new(Brute, 3)]),
        Wave::new(vec![
            WaveGroup::new(Runner, 12),
            WaveGroup::new(Brute, 5),
            WaveGroup::new(Grunt, 8),
        ]),
    ]
}

/// Per-wave release bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnProgress {
    /// Enemies released so far in the active wave.
    pub spawned: u32,
    /// Enemies the active wave releases in total.
    pub total: u32,
    /// Time accrued toward the next release.
    pub accumulator: Duration,
}

impl SpawnProgress {
    /// Fresh bookkeeping for a wave releasing `total` enemies.
    #[must_use]
    pub const fn for_wave(total: u32) -> Self {
        Self {
            spawned: 0,
            total,
            accumulator: Duration::ZERO,
        }
    }

    /// Reports whether every enemy of the wave has been released.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.spawned >= self.total
    }
}

/// Target selected by a ready tower during a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// Enemy the tower fires at.
    pub enemy: EnemyId,
}

/// Walkability view consumed by route search.
pub trait PathGrid {
    /// Number of columns in the grid.
    fn width(&self) -> u32;

    /// Number of rows in the grid.
    fn height(&self) -> u32;

    /// Reports whether enemies may traverse the cell. Out-of-bounds cells are
    /// never walkable.
    fn is_walkable(&self, cell: CellCoord) -> bool;
}

/// Route search used once at game construction.
pub trait PathFinder {
    /// Finds an ordered route from `start` to `end`, both inclusive.
    ///
    /// Returns `None` when the cells are not connected.
    fn find_path(
        &self,
        grid: &dyn PathGrid,
        start: CellCoord,
        end: CellCoord,
    ) -> Option<Vec<CellCoord>>;
}

/// Tunable parameters used to construct a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of map columns.
    pub columns: u32,
    /// Number of map rows.
    pub rows: u32,
    /// Gold available at the start.
    pub starting_gold: u32,
    /// Lives available at the start.
    pub starting_lives: u32,
    /// Ordered wave table.
    pub waves: Vec<Wave>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_MAP_COLUMNS,
            rows: DEFAULT_MAP_ROWS,
            starting_gold: STARTING_GOLD,
            starting_lives: STARTING_LIVES,
            waves: default_waves(),
        }
    }
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is part of the route or already holds a tower.
    NotBuildable,
    /// The player cannot afford the tower.
    InsufficientGold,
}

/// Reasons a tower sale request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

#[cfg(test)]
mod tests {
    use super::{
        default_waves, CellCoord, CellPoint, Enemy, EnemyId, EnemyKind, GameConfig, Health,
        Phase, PlacementError, TowerId, TowerKind, Wave, WaveGroup,
    };
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    #[test]
    fn orthogonal_neighbours_are_one_step_apart() {
        let cell = CellCoord::new(3, 0);
        assert_eq!(cell.manhattan_distance(CellCoord::new(3, 1)), 1);
        assert_eq!(cell.manhattan_distance(CellCoord::new(2, 0)), 1);
        assert_eq!(cell.manhattan_distance(CellCoord::new(4, 1)), 2);
        assert_eq!(cell.manhattan_distance(cell), 0);
    }

    #[test]
    fn point_moves_toward_target_by_requested_distance() {
        let start = CellPoint::new(0.0, 0.0);
        let moved = start.toward(CellPoint::new(4.0, 0.0), 1.5);
        assert!((moved.column() - 1.5).abs() < f32::EPSILON);
        assert!(moved.row().abs() < f32::EPSILON);
        assert!((CellPoint::new(0.0, 0.0).distance(CellPoint::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn game_config_round_trips_through_bincode() {
        assert_round_trip(&GameConfig::default());
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientGold);
    }

    #[test]
    fn refund_is_half_cost_rounded_down() {
        for kind in TowerKind::ALL {
            assert_eq!(kind.refund(), kind.cost() / 2);
        }
        assert_eq!(TowerKind::Arrow.cost(), 50);
        assert_eq!(TowerKind::Arrow.refund(), 25);
    }

    #[test]
    fn wave_walks_groups_in_order() {
        let wave = Wave::new(vec![
            WaveGroup::new(EnemyKind::Grunt, 2),
            WaveGroup::new(EnemyKind::Brute, 1),
        ]);

        assert_eq!(wave.total(), 3);
        assert_eq!(wave.kind_at(0), Some(EnemyKind::Grunt));
        assert_eq!(wave.kind_at(1), Some(EnemyKind::Grunt));
        assert_eq!(wave.kind_at(2), Some(EnemyKind::Brute));
        assert_eq!(wave.kind_at(3), None);
    }

    #[test]
    fn default_table_has_five_waves() {
        let waves = default_waves();
        assert_eq!(waves.len(), 5);
        assert!(waves.iter().all(|wave| wave.total() > 0));
    }

    #[test]
    fn health_ratio_is_clamped_on_overkill() {
        let mut health = Health::full(20.0);
        health.apply_damage(5.0);
        assert!((health.ratio() - 0.75).abs() < f32::EPSILON);
        health.apply_damage(30.0);
        assert!(health.is_depleted());
        assert_eq!(health.ratio(), 0.0);
    }

    #[test]
    fn slowed_enemy_moves_at_half_speed() {
        let mut enemy = Enemy::spawn(EnemyId::new(1), EnemyKind::Grunt, CellCoord::new(0, 0));
        assert!((enemy.effective_speed() - 1.5).abs() < f32::EPSILON);
        enemy.slowed_for = Duration::from_millis(10);
        assert!((enemy.effective_speed() - 0.75).abs() < f32::EPSILON);
    }

    #[test]
    fn only_build_and_between_waves_accept_start_wave() {
        assert!(Phase::Build.accepts_start_wave());
        assert!(Phase::BetweenWaves.accepts_start_wave());
        assert!(!Phase::Wave.accepts_start_wave());
        assert!(!Phase::Won.accepts_start_wave());
        assert!(Phase::Lost.is_terminal());
        assert!(!Phase::Wave.is_terminal());
    }
}
