//! Static tower, mob, and wave tables.
//!
//! Every table is read-only data consulted by the world when it constructs
//! entities or schedules spawns. Tower costs are per tier: building pays the
//! tier-one cost and each upgrade pays the cost of the tier it reaches.

use std::time::Duration;

use crate::{MobKind, TowerKind, TowerTier};

/// Combat and economy figures for one tower tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Kind the entry describes.
    pub kind: TowerKind,
    /// Tier the entry describes.
    pub tier: TowerTier,
    /// Display name.
    pub name: &'static str,
    /// Currency required to reach this tier.
    pub cost: u32,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Engagement radius in world units.
    pub range: f32,
    /// Shots per second.
    pub rate: f32,
    /// Projectile travel speed; `None` fires instant hits.
    pub projectile_speed: Option<f32>,
    /// Area damage on impact.
    pub splash: Option<Splash>,
    /// Slow applied by hits.
    pub slow: Option<SlowEffect>,
    /// Short description for presentation layers.
    pub description: &'static str,
}

/// Area-of-effect parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Splash {
    /// Radius around the impact point, in world units.
    pub radius: f32,
}

/// Movement debuff parameters.
///
/// Only the duration drives the simulation; mobs are slowed by the fixed
/// multiplier in [`crate::Rules`]. The factor is kept for presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlowEffect {
    /// How long a hit keeps the mob slowed.
    pub duration: Duration,
    /// Advertised speed factor.
    pub factor: f32,
}

/// Baseline figures for one mob type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MobStats {
    /// Kind the entry describes.
    pub kind: MobKind,
    /// Hit points on spawn.
    pub hp: u32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Flat damage reduction per hit.
    pub armor: u32,
    /// Currency awarded on death.
    pub bounty: u32,
    /// Visual radius hint in world units.
    pub size: f32,
}

/// One batch of identical mobs within a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnEntry {
    /// Offset from the wave start before the first mob of the batch appears.
    pub delay: Duration,
    /// Type of every mob in the batch.
    pub kind: MobKind,
    /// Number of mobs in the batch.
    pub count: u32,
    /// Gap between consecutive mobs of the batch.
    pub spacing: Duration,
}

/// Scheduled batch of spawns with a completion reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveDefinition {
    /// Ordinal of the wave, starting at one.
    pub id: u32,
    /// Spawn batches in evaluation order.
    pub entries: &'static [SpawnEntry],
    /// Currency granted when the wave completes.
    pub reward: u32,
}

impl WaveDefinition {
    /// Total number of mobs the wave spawns.
    #[must_use]
    pub fn mob_count(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

/// Catalog entry for the provided tower kind and tier.
#[must_use]
pub fn tower_stats(kind: TowerKind, tier: TowerTier) -> &'static TowerStats {
    &TOWER_STATS[kind.index()][tier.index()]
}

/// Catalog entry for the provided mob kind.
#[must_use]
pub fn mob_stats(kind: MobKind) -> &'static MobStats {
    &MOB_STATS[kind.index()]
}

/// Definition of the wave with the provided one-based ordinal.
#[must_use]
pub fn wave(number: u32) -> Option<&'static WaveDefinition> {
    let index = usize::try_from(number.checked_sub(1)?).ok()?;
    WAVES.get(index)
}

/// Number of waves in the table.
#[must_use]
pub fn total_waves() -> u32 {
    WAVES.len() as u32
}

/// Sum of the catalog costs for every tier from one through `tier`.
#[must_use]
pub fn cumulative_cost(kind: TowerKind, tier: TowerTier) -> u32 {
    tier.up_to().map(|tier| tower_stats(kind, tier).cost).sum()
}

static TOWER_STATS: [[TowerStats; 3]; 3] = [
    [
        TowerStats {
            kind: TowerKind::Arrow,
            tier: TowerTier::One,
            name: "Archer Tower",
            cost: 100,
            damage: 15,
            range: 80.0,
            rate: 2.0,
            projectile_speed: Some(300.0),
            splash: None,
            slow: None,
            description: "Fast single-target attacks",
        },
        TowerStats {
            kind: TowerKind::Arrow,
            tier: TowerTier::Two,
            name: "Ranger Tower",
            cost: 40,
            damage: 25,
            range: 80.0,
            rate: 2.0,
            projectile_speed: Some(350.0),
            splash: None,
            slow: None,
            description: "Increased damage",
        },
        TowerStats {
            kind: TowerKind::Arrow,
            tier: TowerTier::Three,
            name: "Sniper Tower",
            cost: 80,
            damage: 40,
            range: 100.0,
            rate: 2.0,
            projectile_speed: Some(400.0),
            splash: None,
            slow: None,
            description: "Extended range and damage",
        },
    ],
    [
        TowerStats {
            kind: TowerKind::Cannon,
            tier: TowerTier::One,
            name: "Cannon",
            cost: 150,
            damage: 40,
            range: 60.0,
            rate: 0.8,
            projectile_speed: Some(200.0),
            splash: Some(Splash { radius: 40.0 }),
            slow: None,
            description: "Slow but powerful splash damage",
        },
        TowerStats {
            kind: TowerKind::Cannon,
            tier: TowerTier::Two,
            name: "Artillery",
            cost: 80,
            damage: 60,
            range: 60.0,
            rate: 0.8,
            projectile_speed: Some(220.0),
            splash: Some(Splash { radius: 50.0 }),
            slow: None,
            description: "Explosive shells",
        },
        TowerStats {
            kind: TowerKind::Cannon,
            tier: TowerTier::Three,
            name: "Destroyer",
            cost: 150,
            damage: 90,
            range: 60.0,
            rate: 1.0,
            projectile_speed: Some(250.0),
            splash: Some(Splash { radius: 60.0 }),
            slow: None,
            description: "Rapid fire cannons",
        },
    ],
    [
        TowerStats {
            kind: TowerKind::Frost,
            tier: TowerTier::One,
            name: "Ice Tower",
            cost: 120,
            damage: 10,
            range: 70.0,
            rate: 1.5,
            projectile_speed: Some(250.0),
            splash: None,
            slow: Some(SlowEffect {
                duration: Duration::from_secs(2),
                factor: 0.5,
            }),
            description: "Slows enemies by 50%",
        },
        TowerStats {
            kind: TowerKind::Frost,
            tier: TowerTier::Two,
            name: "Frost Tower",
            cost: 60,
            damage: 10,
            range: 85.0,
            rate: 1.5,
            projectile_speed: Some(280.0),
            splash: None,
            slow: Some(SlowEffect {
                duration: Duration::from_secs(3),
                factor: 0.4,
            }),
            description: "Wider freeze effect",
        },
        TowerStats {
            kind: TowerKind::Frost,
            tier: TowerTier::Three,
            name: "Blizzard Tower",
            cost: 120,
            damage: 20,
            range: 85.0,
            rate: 2.0,
            projectile_speed: Some(300.0),
            splash: None,
            slow: Some(SlowEffect {
                duration: Duration::from_secs(4),
                factor: 0.3,
            }),
            description: "Deep freeze",
        },
    ],
];

static MOB_STATS: [MobStats; 4] = [
    MobStats {
        kind: MobKind::Normal,
        hp: 100,
        speed: 80.0,
        armor: 0,
        bounty: 10,
        size: 12.0,
    },
    MobStats {
        kind: MobKind::Fast,
        hp: 60,
        speed: 140.0,
        armor: 0,
        bounty: 15,
        size: 10.0,
    },
    MobStats {
        kind: MobKind::Tank,
        hp: 300,
        speed: 50.0,
        armor: 5,
        bounty: 25,
        size: 16.0,
    },
    MobStats {
        kind: MobKind::Flying,
        hp: 80,
        speed: 100.0,
        armor: 0,
        bounty: 20,
        size: 12.0,
    },
];

const fn entry(delay_ms: u64, kind: MobKind, count: u32, spacing_ms: u64) -> SpawnEntry {
    SpawnEntry {
        delay: Duration::from_millis(delay_ms),
        kind,
        count,
        spacing: Duration::from_millis(spacing_ms),
    }
}

static WAVES: [WaveDefinition; 10] = [
    WaveDefinition {
        id: 1,
        entries: &[
            entry(0, MobKind::Normal, 8, 1_200),
            entry(12_000, MobKind::Fast, 2, 1_500),
        ],
        reward: 50,
    },
    WaveDefinition {
        id: 2,
        entries: &[
            entry(0, MobKind::Normal, 12, 900),
            entry(8_000, MobKind::Fast, 3, 1_000),
            entry(18_000, MobKind::Flying, 1, 1_000),
        ],
        reward: 75,
    },
    WaveDefinition {
        id: 3,
        entries: &[
            entry(0, MobKind::Normal, 10, 800),
            entry(5_000, MobKind::Fast, 6, 600),
        ],
        reward: 100,
    },
    WaveDefinition {
        id: 4,
        entries: &[
            entry(0, MobKind::Fast, 12, 700),
            entry(10_000, MobKind::Tank, 1, 1_000),
        ],
        reward: 125,
    },
    WaveDefinition {
        id: 5,
        entries: &[
            entry(0, MobKind::Normal, 15, 600),
            entry(8_000, MobKind::Tank, 3, 2_000),
        ],
        reward: 150,
    },
    WaveDefinition {
        id: 6,
        entries: &[
            entry(0, MobKind::Flying, 8, 800),
            entry(10_000, MobKind::Fast, 5, 500),
        ],
        reward: 175,
    },
    WaveDefinition {
        id: 7,
        entries: &[
            entry(0, MobKind::Fast, 15, 500),
            entry(6_000, MobKind::Tank, 5, 1_500),
        ],
        reward: 200,
    },
    WaveDefinition {
        id: 8,
        entries: &[
            entry(0, MobKind::Normal, 20, 400),
            entry(5_000, MobKind::Flying, 10, 600),
            entry(12_000, MobKind::Tank, 3, 1_000),
        ],
        reward: 250,
    },
    WaveDefinition {
        id: 9,
        entries: &[
            entry(0, MobKind::Tank, 8, 1_000),
            entry(10_000, MobKind::Fast, 20, 300),
            entry(15_000, MobKind::Flying, 8, 500),
        ],
        reward: 300,
    },
    WaveDefinition {
        id: 10,
        entries: &[
            entry(0, MobKind::Normal, 30, 300),
            entry(5_000, MobKind::Fast, 15, 400),
            entry(10_000, MobKind::Tank, 10, 800),
            entry(15_000, MobKind::Flying, 15, 500),
        ],
        reward: 500,
    },
];
