//! Focus countdown timer.

mod engine;
mod preset;

pub use engine::{FocusTimer, TimerState};
pub use preset::{Preset, DEFAULT_MINUTES, DEFAULT_PRESETS};
