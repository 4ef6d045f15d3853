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
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing player intents or the passage of time, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values that
//! describe every transition it performed. Systems are pure functions over the
//! entity data declared here and never mutate the world directly.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod catalog;
mod rules;

pub use rules::Rules;

use catalog::{mob_stats, tower_stats};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Side length of a single square tile expressed in world units.
        tile_length: f32,
    },
    /// Transitions the world from "not started" to "started".
    StartGame,
    /// Suspends simulation; ticks become no-ops until resumed.
    Pause,
    /// Clears the paused flag.
    Resume,
    /// Records the speed multiplier the driver applies to frame deltas.
    SetSpeed {
        /// Multiplier to activate.
        speed: GameSpeed,
    },
    /// Discards all state and reconstructs the initial world.
    Restart,
    /// Enters placement mode for the provided tower kind.
    StartBuilding {
        /// Kind of tower the player intends to place.
        kind: TowerKind,
    },
    /// Leaves placement mode and clears any selected tile.
    CancelBuilding,
    /// Records the tile hovered or clicked while placing a tower.
    SelectTile {
        /// Tile the player selected.
        tile: TileCoord,
    },
    /// Places the pending tower kind on the provided tile.
    BuildTower {
        /// Tile that should host the new tower.
        tile: TileCoord,
    },
    /// Selects a tower, or clears the selection when `None`.
    SelectTower {
        /// Tower to select.
        tower: Option<TowerId>,
    },
    /// Promotes a tower to its next tier.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Removes a tower and refunds part of its investment.
    SellTower {
        /// Tower to sell.
        tower: TowerId,
    },
    /// Starts the next wave once the current one has completed.
    StartNextWave,
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulated time after the tick.
        now: Duration,
    },
    /// Announces that the game left its pre-start state.
    GameStarted,
    /// Reports the new value of the paused flag.
    PauseChanged {
        /// Whether the simulation is paused.
        paused: bool,
    },
    /// Reports the speed multiplier now in effect.
    SpeedChanged {
        /// Active multiplier.
        speed: GameSpeed,
    },
    /// Confirms that the world was rebuilt from its initial configuration.
    WorldReset,
    /// Confirms that placement mode was entered.
    BuildingStarted {
        /// Tower kind awaiting placement.
        kind: TowerKind,
    },
    /// Confirms that placement mode was left.
    BuildingCancelled,
    /// Reports the currently selected tile.
    TileSelected {
        /// Selected tile, if any.
        tile: Option<TileCoord>,
    },
    /// Reports the currently selected tower.
    TowerSelected {
        /// Selected tower, if any.
        tower: Option<TowerId>,
    },
    /// Confirms that a tower was constructed.
    TowerBuilt {
        /// Identifier allocated to the tower.
        tower: TowerId,
        /// Kind of tower that was constructed.
        kind: TowerKind,
        /// Tile occupied by the tower.
        tile: TileCoord,
        /// Currency deducted for the construction.
        cost: u32,
    },
    /// Confirms that a tower was promoted.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Tier reached by the upgrade.
        tier: TowerTier,
        /// Currency deducted for the upgrade.
        cost: u32,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Currency credited back to the player.
        refund: u32,
    },
    /// Reports that a command did not change the world.
    CommandRejected {
        /// Precondition that was not met.
        reason: RejectionReason,
    },
    /// Announces that the next wave was queued and begins on the following tick.
    WaveQueued {
        /// Ordinal of the queued wave.
        wave: u32,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// Ordinal of the wave, starting at one.
        wave: u32,
    },
    /// Announces that a wave completed and its reward was granted.
    WaveCompleted {
        /// Ordinal of the completed wave.
        wave: u32,
        /// Currency credited for completing the wave.
        reward: u32,
    },
    /// Confirms that a mob entered the path.
    MobSpawned {
        /// Identifier allocated to the mob.
        mob: MobId,
        /// Type of mob that spawned.
        kind: MobKind,
    },
    /// Reports that a mob reached the end of the path and cost a life.
    MobEscaped {
        /// Mob that escaped.
        mob: MobId,
        /// Lives left after the escape was accounted for.
        lives_remaining: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier allocated to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Mob the tower acquired.
        target: MobId,
    },
    /// Reports that a mob's hit points were exhausted.
    MobKilled {
        /// Mob that was removed.
        mob: MobId,
        /// Tower credited with the kill, if it still exists.
        credited_to: Option<TowerId>,
        /// Currency awarded for the kill.
        bounty: u32,
    },
    /// Announces that the world reached a terminal state.
    GameOver {
        /// How the game ended.
        outcome: Outcome,
    },
}

/// Reasons a command may leave the world unchanged.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum RejectionReason {
    /// The player cannot pay for the requested action.
    #[error("insufficient funds: {cost} required, {available} available")]
    InsufficientFunds {
        /// Price of the requested action.
        cost: u32,
        /// Currency the player holds.
        available: u32,
    },
    /// The requested tile lies outside the grid.
    #[error("tile is outside the grid")]
    OutOfBounds,
    /// The requested tile is part of the path or otherwise blocked.
    #[error("tile does not accept towers")]
    NotBuildable,
    /// The requested tile already hosts a tower.
    #[error("tile already hosts a tower")]
    Occupied,
    /// A build was requested without first choosing a tower kind.
    #[error("no tower kind is awaiting placement")]
    NoPendingBuild,
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    UnknownTower,
    /// The tower already reached its final tier.
    #[error("tower is already at its final tier")]
    MaxTier,
    /// The current wave has not completed yet.
    #[error("the current wave has not completed")]
    WaveInProgress,
    /// The final wave is already underway or complete.
    #[error("no waves remain")]
    NoWavesRemaining,
    /// The game was already started.
    #[error("the game has already started")]
    AlreadyStarted,
    /// The world reached a terminal state.
    #[error("the game is over")]
    GameOver,
}

/// Unique identifier assigned to a mob.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MobId(u32);

impl MobId {
    /// Creates a new mob identifier with the provided numeric value.
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

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Reports whether the two tiles share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: TileCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// World-space position of the tile's center.
    #[must_use]
    pub fn center(self, tile_length: f32) -> Vec2 {
        let half = tile_length / 2.0;
        Vec2::new(
            self.column as f32 * tile_length + half,
            self.row as f32 * tile_length + half,
        )
    }

    /// Tile containing the provided world-space position.
    ///
    /// Returns `None` for positions left of or above the origin and for a
    /// non-positive tile length. Upper bounds are the grid's concern.
    #[must_use]
    pub fn from_world(position: Vec2, tile_length: f32) -> Option<Self> {
        if tile_length <= 0.0 || position.x < 0.0 || position.y < 0.0 {
            return None;
        }

        let column = (position.x / tile_length).floor();
        let row = (position.y / tile_length).floor();
        if !column.is_finite() || !row.is_finite() {
            return None;
        }

        Some(Self::new(column as u32, row as u32))
    }
}

/// Classification of a single grid tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Part of the route mobs travel.
    Path,
    /// Open ground that accepts towers.
    Buildable,
    /// Terrain that neither mobs nor towers use.
    Blocked,
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Fast single-target attacks.
    Arrow,
    /// Slow splash damage that cannot reach flying mobs.
    Cannon,
    /// Weak hits that slow their target.
    Frost,
}

impl TowerKind {
    /// Every tower kind in catalog order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Arrow, TowerKind::Cannon, TowerKind::Frost];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Arrow => 0,
            Self::Cannon => 1,
            Self::Frost => 2,
        }
    }
}

/// Upgrade level of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerTier {
    /// Level granted on construction.
    One,
    /// First upgrade.
    Two,
    /// Final upgrade.
    Three,
}

impl TowerTier {
    /// Every tier in ascending order.
    pub const ALL: [TowerTier; 3] = [TowerTier::One, TowerTier::Two, TowerTier::Three];

    /// Tier reached by upgrading, or `None` from the final tier.
    #[must_use]
    pub const fn next(self) -> Option<TowerTier> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => None,
        }
    }

    /// Numeric level in the range 1..=3.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Tiers from one up to and including `self`.
    pub fn up_to(self) -> impl Iterator<Item = TowerTier> {
        Self::ALL.into_iter().filter(move |tier| *tier <= self)
    }

    pub(crate) const fn index(self) -> usize {
        self.level() as usize - 1
    }
}

/// Types of mobs that travel the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MobKind {
    /// Baseline mob.
    Normal,
    /// Quick but fragile.
    Fast,
    /// Slow, armored, and durable.
    Tank,
    /// Airborne; immune to cannons.
    Flying,
}

impl MobKind {
    /// Every mob kind in catalog order.
    pub const ALL: [MobKind; 4] = [MobKind::Normal, MobKind::Fast, MobKind::Tank, MobKind::Flying];

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Normal => 0,
            Self::Fast => 1,
            Self::Tank => 2,
            Self::Flying => 3,
        }
    }
}

/// Tie-break policy used when several mobs are in range of a tower.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetingStrategy {
    /// Mob furthest along the path.
    #[default]
    First,
    /// Mob least far along the path.
    Last,
    /// Mob closest to the tower.
    Nearest,
    /// Mob with the most hit points.
    Strongest,
    /// Mob with the fewest hit points.
    Weakest,
}

/// Multiplier applied by the driver to frame deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameSpeed {
    /// Real time.
    #[default]
    Normal,
    /// Twice real time.
    Double,
}

impl GameSpeed {
    /// Factor by which frame deltas are scaled.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
        }
    }
}

/// Lifecycle of the current wave.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// The wave has not begun spawning yet.
    #[default]
    Pending,
    /// The wave is spawning mobs.
    Active {
        /// Simulated time at which spawning began.
        started_at: Duration,
    },
    /// The wave ran its full duration and its reward was granted.
    Completed {
        /// Simulated time at which the wave completed.
        completed_at: Duration,
    },
}

/// Terminal state of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every wave completed.
    Victory,
    /// Lives were exhausted.
    Defeat,
}

/// Enemy unit travelling the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Mob {
    /// Identifier allocated by the world.
    pub id: MobId,
    /// Type of the mob.
    pub kind: MobKind,
    /// World-space position.
    pub position: Vec2,
    /// Remaining hit points.
    pub hp: u32,
    /// Hit points on spawn.
    pub max_hp: u32,
    /// Speed applied during the most recent movement step, in world units per second.
    pub speed: f32,
    /// Unmodified speed from the catalog.
    pub base_speed: f32,
    /// Flat reduction applied to every hit.
    pub armor: u32,
    /// Currency awarded when the mob is killed.
    pub bounty: u32,
    /// Index of the most recent path waypoint reached; the mob heads for the next one.
    pub path_index: usize,
    /// Simulated time at which the active slow effect expires.
    pub slowed_until: Option<Duration>,
    /// Simulated time at which the mob was scheduled to spawn.
    pub spawned_at: Duration,
}

impl Mob {
    /// Creates a mob with full catalog stats at the provided position.
    #[must_use]
    pub fn spawn(id: MobId, kind: MobKind, position: Vec2, spawned_at: Duration) -> Self {
        let stats = mob_stats(kind);
        Self {
            id,
            kind,
            position,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            base_speed: stats.speed,
            armor: stats.armor,
            bounty: stats.bounty,
            path_index: 0,
            slowed_until: None,
            spawned_at,
        }
    }

    /// Reports whether a slow effect is active at `now`.
    #[must_use]
    pub fn is_slowed(&self, now: Duration) -> bool {
        self.slowed_until.is_some_and(|until| now < until)
    }
}

/// Player-built structure that fires at mobs.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    /// Identifier allocated by the world.
    pub id: TowerId,
    /// Tile occupied by the tower.
    pub tile: TileCoord,
    /// Type of the tower.
    pub kind: TowerKind,
    /// Current upgrade level.
    pub tier: TowerTier,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Engagement radius in world units.
    pub range: f32,
    /// Shots per second.
    pub rate: f32,
    /// Projectile travel speed; `None` fires instant hits.
    pub projectile_speed: Option<f32>,
    /// Simulated time of the most recent shot.
    pub last_fired_at: Option<Duration>,
    /// Mobs this tower landed the killing blow on.
    pub kills: u32,
    /// Total currency spent on construction and upgrades.
    pub invested: u32,
}

impl Tower {
    /// Creates a tier-one tower with stats copied from the catalog.
    #[must_use]
    pub fn build(id: TowerId, tile: TileCoord, kind: TowerKind) -> Self {
        let stats = tower_stats(kind, TowerTier::One);
        Self {
            id,
            tile,
            kind,
            tier: TowerTier::One,
            damage: stats.damage,
            range: stats.range,
            rate: stats.rate,
            projectile_speed: stats.projectile_speed,
            last_fired_at: None,
            kills: 0,
            invested: stats.cost,
        }
    }

    /// Replaces the combat stats with those of `tier` and records the upgrade cost.
    pub fn promote(&mut self, tier: TowerTier) {
        let stats = tower_stats(self.kind, tier);
        self.tier = tier;
        self.damage = stats.damage;
        self.range = stats.range;
        self.rate = stats.rate;
        self.projectile_speed = stats.projectile_speed;
        self.invested = self.invested.saturating_add(stats.cost);
    }

    /// World-space position of the tower's center.
    #[must_use]
    pub fn center(&self, tile_length: f32) -> Vec2 {
        self.tile.center(tile_length)
    }

    /// Splash radius of the current tier, if the tower deals area damage.
    #[must_use]
    pub fn splash_radius(&self) -> Option<f32> {
        tower_stats(self.kind, self.tier)
            .splash
            .map(|splash| splash.radius)
    }

    /// Slow duration applied by the current tier's hits, if any.
    #[must_use]
    pub fn slow_duration(&self) -> Option<Duration> {
        tower_stats(self.kind, self.tier)
            .slow
            .map(|slow| slow.duration)
    }

    /// Cost of upgrading to the next tier, or `None` at the final tier.
    #[must_use]
    pub fn upgrade_cost(&self) -> Option<u32> {
        self.tier
            .next()
            .map(|tier| tower_stats(self.kind, tier).cost)
    }
}

/// Shot travelling toward an aim point.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier allocated by the world.
    pub id: ProjectileId,
    /// Tower that fired the projectile.
    pub source: TowerId,
    /// Kind of the firing tower.
    pub kind: TowerKind,
    /// World-space position.
    pub position: Vec2,
    /// Mob the tower acquired when firing.
    pub target: MobId,
    /// Fixed point the projectile travels toward.
    pub aim: Vec2,
    /// Travel speed in world units per second; zero resolves on creation.
    pub speed: f32,
    /// Damage dealt to each mob hit.
    pub damage: u32,
    /// Radius of the area hit on arrival, if any.
    pub splash_radius: Option<f32>,
    /// Slow duration applied to mobs hit, if any.
    pub slow: Option<Duration>,
    /// Simulated time at which the projectile was fired.
    pub created_at: Duration,
}

impl Projectile {
    /// Reports whether the projectile resolves without travelling.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.speed <= 0.0
    }
}
