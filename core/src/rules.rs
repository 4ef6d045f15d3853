//! Tunable constants that shape a game session.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::TargetingStrategy;

/// Configuration consulted by the world and its external driver.
///
/// `Rules::default()` is the reference configuration. Catalog tables are not
/// part of the rules; they are fixed data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rules {
    /// Currency available when the world is created.
    pub initial_money: u32,
    /// Lives available when the world is created.
    pub initial_lives: u32,
    /// Time after its start at which a wave completes and pays its reward.
    pub wave_duration: Duration,
    /// Time after a wave completes before the next one starts on its own.
    pub wave_auto_start_delay: Duration,
    /// Fraction of base speed kept while a mob is slowed.
    pub slow_multiplier: f32,
    /// Lower bound on a mob's speed as a fraction of its base speed.
    pub min_speed_fraction: f32,
    /// Number of tile columns in the grid.
    pub grid_columns: u32,
    /// Number of tile rows in the grid.
    pub grid_rows: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    /// Upper bound the driver applies to a single frame delta.
    pub max_frame_delta: Duration,
    /// Tie-break policy towers use to pick a target.
    pub targeting: TargetingStrategy,
    /// Share of a tower's total investment returned on sale, in percent.
    pub sell_refund_percent: u32,
}

impl Rules {
    /// Refund granted for selling a tower with the provided total investment.
    #[must_use]
    pub fn refund_for(&self, invested: u32) -> u32 {
        let refund = u64::from(invested) * u64::from(self.sell_refund_percent) / 100;
        u32::try_from(refund).unwrap_or(u32::MAX)
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            initial_money: 500,
            initial_lives: 20,
            wave_duration: Duration::from_secs(30),
            wave_auto_start_delay: Duration::from_secs(30),
            slow_multiplier: 0.4,
            min_speed_fraction: 0.3,
            grid_columns: 20,
            grid_rows: 15,
            tile_length: 32.0,
            max_frame_delta: Duration::from_nanos(33_333_333),
            targeting: TargetingStrategy::First,
            sell_refund_percent: 50,
        }
    }
}
