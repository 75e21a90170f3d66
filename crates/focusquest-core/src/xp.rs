//! XP and level progression.
//!
//! Levels follow a geometric curve: each level requires 1.5x the XP of the
//! previous one, starting at 100. `total_xp` always holds the progress
//! *within* the current level, so it is normalized to stay below
//! `xp_to_next_level` after every gain.

use serde::{Deserialize, Serialize};

/// Titles by level band (one title per five levels, clamped at the last).
const LEVEL_TITLES: [&str; 8] = [
    "Beginner",
    "Apprentice",
    "Focused",
    "Dedicated",
    "Deep Worker",
    "Master",
    "Grandmaster",
    "Monk",
];

/// XP required to advance from `level` to `level + 1`.
///
/// Defined as `floor(100 * 1.5^(level-1))`. Strictly increasing in level.
pub fn xp_required_for_level(level: u32) -> u32 {
    (100.0 * 1.5_f64.powi(level as i32 - 1)).floor() as u32
}

/// Title shown for a level.
pub fn level_title(level: u32) -> &'static str {
    let index = ((level.max(1) - 1) / 5) as usize;
    LEVEL_TITLES[index.min(LEVEL_TITLES.len() - 1)]
}

/// Per-user XP progression state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpState {
    /// XP accumulated toward the next level.
    pub total_xp: u32,
    pub current_level: u32,
    /// Threshold to reach `current_level + 1`.
    pub xp_to_next_level: u32,
}

impl Default for XpState {
    fn default() -> Self {
        Self {
            total_xp: 0,
            current_level: 1,
            xp_to_next_level: xp_required_for_level(1),
        }
    }
}

/// Outcome of applying an XP gain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XpGain {
    pub state: XpState,
    pub leveled_up: bool,
    pub new_level: u32,
}

impl XpState {
    /// Apply a gain of `amount` XP, carrying over across as many level-ups
    /// as the amount covers. A single large grant can jump several levels.
    pub fn apply_gain(&self, amount: u32) -> XpGain {
        let mut total = self.total_xp + amount;
        let mut level = self.current_level;
        let mut threshold = self.xp_to_next_level;

        while total >= threshold {
            total -= threshold;
            level += 1;
            threshold = xp_required_for_level(level);
        }

        XpGain {
            state: XpState {
                total_xp: total,
                current_level: level,
                xp_to_next_level: threshold,
            },
            leveled_up: level > self.current_level,
            new_level: level,
        }
    }

    /// 0.0 .. 100.0 progress toward the next level.
    pub fn progress_pct(&self) -> f64 {
        if self.xp_to_next_level == 0 {
            return 0.0;
        }
        (self.total_xp as f64 / self.xp_to_next_level as f64 * 100.0).min(100.0)
    }

    pub fn title(&self) -> &'static str {
        level_title(self.current_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn thresholds_follow_geometric_curve() {
        assert_eq!(xp_required_for_level(1), 100);
        assert_eq!(xp_required_for_level(2), 150);
        assert_eq!(xp_required_for_level(3), 225);
        assert_eq!(xp_required_for_level(4), 337);
    }

    #[test]
    fn exact_threshold_gain_levels_once_and_zeroes_progress() {
        let state = XpState::default();
        let gain = state.apply_gain(100);
        assert!(gain.leveled_up);
        assert_eq!(gain.new_level, 2);
        assert_eq!(gain.state.total_xp, 0);
        assert_eq!(gain.state.xp_to_next_level, 150);
    }

    #[test]
    fn large_gain_jumps_multiple_levels() {
        let state = XpState::default();
        // 2.5x the level-1 threshold: 100 to level 2, 150 to level 3.
        let gain = state.apply_gain(250);
        assert!(gain.leveled_up);
        assert_eq!(gain.new_level, 3);
        assert_eq!(gain.state.total_xp, 0);
        assert_eq!(gain.state.xp_to_next_level, 225);
    }

    #[test]
    fn sub_threshold_gain_does_not_level() {
        let state = XpState::default();
        let gain = state.apply_gain(99);
        assert!(!gain.leveled_up);
        assert_eq!(gain.new_level, 1);
        assert_eq!(gain.state.total_xp, 99);
    }

    #[test]
    fn zero_gain_is_identity() {
        let state = XpState {
            total_xp: 42,
            current_level: 3,
            xp_to_next_level: 225,
        };
        let gain = state.apply_gain(0);
        assert!(!gain.leveled_up);
        assert_eq!(gain.state, state);
    }

    #[test]
    fn titles_advance_by_five_level_bands() {
        assert_eq!(level_title(1), "Beginner");
        assert_eq!(level_title(5), "Beginner");
        assert_eq!(level_title(6), "Apprentice");
        assert_eq!(level_title(11), "Focused");
        assert_eq!(level_title(36), "Monk");
        // Clamped at the last title for arbitrarily high levels.
        assert_eq!(level_title(500), "Monk");
    }

    proptest! {
        #[test]
        fn thresholds_strictly_increase(level in 1u32..40) {
            prop_assert!(xp_required_for_level(level + 1) > xp_required_for_level(level));
        }

        #[test]
        fn gain_normalizes_below_threshold(
            total in 0u32..100,
            level in 1u32..20,
            amount in 0u32..100_000,
        ) {
            let state = XpState {
                total_xp: total,
                current_level: level,
                xp_to_next_level: xp_required_for_level(level),
            };
            let gain = state.apply_gain(amount);
            prop_assert!(gain.state.total_xp < gain.state.xp_to_next_level);
            prop_assert!(gain.new_level >= level);
            prop_assert_eq!(gain.leveled_up, gain.new_level > level);
        }
    }
}
