//! Level table and progress-to-next-level math.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ratings::round_to_hundredths;

/// Named progression tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Beginner => f.write_str("beginner"),
            Self::Intermediate => f.write_str("intermediate"),
            Self::Advanced => f.write_str("advanced"),
            Self::Expert => f.write_str("expert"),
        }
    }
}

/// Inclusive points range for a level. `max_points` is `None` for the top
/// tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTier {
    pub level: Level,
    pub min_points: u64,
    pub max_points: Option<u64>,
}

impl LevelTier {
    /// Whether `points` falls inside this tier.
    pub fn contains(&self, points: u64) -> bool {
        points >= self.min_points && self.max_points.is_none_or(|max| points <= max)
    }
}

/// Contiguous, non-overlapping tiers ordered from lowest to highest.
pub const LEVEL_TABLE: [LevelTier; 4] = [
    LevelTier {
        level: Level::Beginner,
        min_points: 0,
        max_points: Some(100),
    },
    LevelTier {
        level: Level::Intermediate,
        min_points: 101,
        max_points: Some(500),
    },
    LevelTier {
        level: Level::Advanced,
        min_points: 501,
        max_points: Some(1000),
    },
    LevelTier {
        level: Level::Expert,
        min_points: 1001,
        max_points: None,
    },
];

/// Where a points total sits in the level table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: Level,
    pub next_level: Option<Level>,
    /// Percentage of the way to the next level, 0–100.
    pub progress_percent: f64,
    pub points_to_next: Option<u64>,
}

fn tier_index(points: u64) -> usize {
    // The table covers every u64, so the scan always finds a tier.
    LEVEL_TABLE
        .iter()
        .position(|tier| tier.contains(points))
        .unwrap_or(0)
}

/// Level for a points total.
///
/// # Examples
/// ```
/// use companion::domain::{Level, level_for_points};
///
/// assert_eq!(level_for_points(100), Level::Beginner);
/// assert_eq!(level_for_points(101), Level::Intermediate);
/// ```
pub fn level_for_points(points: u64) -> Level {
    LEVEL_TABLE
        .get(tier_index(points))
        .map_or(Level::Beginner, |tier| tier.level)
}

/// Progress toward the next level.
///
/// Progress interpolates the total between the current tier's lower bound
/// and the next tier's lower bound and is clamped to 0–100. At the top tier
/// progress is 100 and there is no next level.
pub fn level_progress(points: u64) -> LevelProgress {
    let index = tier_index(points);
    let current = LEVEL_TABLE.get(index).copied().unwrap_or(LEVEL_TABLE[0]);
    let Some(next) = LEVEL_TABLE.get(index + 1) else {
        return LevelProgress {
            level: current.level,
            next_level: None,
            progress_percent: 100.0,
            points_to_next: None,
        };
    };

    let span = next.min_points.saturating_sub(current.min_points);
    let earned = points.saturating_sub(current.min_points);
    let percent = if span == 0 {
        100.0
    } else {
        (u64_to_f64(earned) / u64_to_f64(span) * 100.0).clamp(0.0, 100.0)
    };

    LevelProgress {
        level: current.level,
        next_level: Some(next.level),
        progress_percent: round_to_hundredths(percent),
        points_to_next: Some(next.min_points.saturating_sub(points)),
    }
}

fn u64_to_f64(value: u64) -> f64 {
    // Point totals stay far below 2^53, where the conversion is exact.
    u32::try_from(value).map_or(f64::from(u32::MAX), f64::from)
}
