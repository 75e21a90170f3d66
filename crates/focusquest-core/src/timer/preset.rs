//! Timer duration presets.

use serde::{Deserialize, Serialize};

/// The stock preset menu, in minutes.
pub const DEFAULT_PRESETS: [u32; 4] = [15, 25, 45, 60];

/// The preset selected when none is configured.
pub const DEFAULT_MINUTES: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub minutes: u32,
}

impl Preset {
    pub fn total_seconds(&self) -> u32 {
        self.minutes.saturating_mul(60)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_is_25_minutes() {
        assert_eq!(Preset::default().total_seconds(), 1500);
    }
}
