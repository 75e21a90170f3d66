//! Timer engine implementation.
//!
//! The timer is a tick-driven state machine. It holds no thread or
//! interval -- the caller invokes `tick()` once per second, and dropping
//! the driving loop drops the tick source with it.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed) -> Idle
//! ```
//!
//! ## Minute accounting
//!
//! Natural completion credits the *target* duration
//! (`ceil(total_seconds / 60)`); an early finish credits the *elapsed*
//! time (`ceil(elapsed_seconds / 60)`). The asymmetry feeds XP and
//! session-duration accounting and must not be collapsed.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::preset::Preset;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Core countdown engine.
///
/// Serializable so a frontend can persist it between invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusTimer {
    state: TimerState,
    total_seconds: u32,
    remaining_seconds: u32,
}

impl FocusTimer {
    /// Create an idle timer for `minutes` of focus.
    pub fn new(minutes: u32) -> Self {
        let total = minutes.saturating_mul(60);
        Self {
            state: TimerState::Idle,
            total_seconds: total,
            remaining_seconds: total,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.total_seconds - self.remaining_seconds
    }

    /// 0.0 .. 100.0 progress through the countdown.
    pub fn progress_pct(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        self.elapsed_seconds() as f64 / self.total_seconds as f64 * 100.0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin (or resume) the countdown.
    ///
    /// Silent no-op when nothing remains to count down, or when the timer
    /// is already running or completed.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                if self.remaining_seconds == 0 {
                    return None;
                }
                self.state = TimerState::Running;
                Some(Event::TimerStarted {
                    total_seconds: self.total_seconds,
                    remaining_seconds: self.remaining_seconds,
                    at: Utc::now(),
                })
            }
            TimerState::Running | TimerState::Completed => None,
        }
    }

    /// Stop the countdown without losing progress.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    remaining_seconds: self.remaining_seconds,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Back to idle with the full duration restored.
    pub fn reset(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused | TimerState::Completed => {
                self.state = TimerState::Idle;
                self.remaining_seconds = self.total_seconds;
                Some(Event::TimerReset {
                    total_seconds: self.total_seconds,
                    at: Utc::now(),
                })
            }
            TimerState::Idle => None,
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Some(Event::TimerCompleted)` when the countdown reaches
    /// zero; the credited minutes are the ceiling of the *target*
    /// duration.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.state = TimerState::Completed;
            return Some(Event::TimerCompleted {
                elapsed_minutes: self.total_seconds.div_ceil(60),
                natural: true,
                at: Utc::now(),
            });
        }
        None
    }

    /// Advance by `seconds` ticks, stopping at completion.
    ///
    /// Lets a frontend that was away (e.g. between CLI invocations) catch
    /// the countdown up to wall time.
    pub fn advance_by(&mut self, seconds: u32) -> Option<Event> {
        for _ in 0..seconds {
            if let Some(event) = self.tick() {
                return Some(event);
            }
        }
        None
    }

    /// End the session now, crediting only the time actually spent.
    ///
    /// The completion event is emitted only when at least one elapsed
    /// minute rounds up; the state becomes `Completed` either way.
    pub fn finish_early(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let elapsed_minutes = self.elapsed_seconds().div_ceil(60);
        self.state = TimerState::Completed;
        if elapsed_minutes == 0 {
            return None;
        }
        Some(Event::TimerCompleted {
            elapsed_minutes,
            natural: false,
            at: Utc::now(),
        })
    }

    /// Swap in a new duration. Only honored while idle.
    pub fn select_preset(&mut self, preset: Preset) -> Option<Event> {
        if self.state != TimerState::Idle {
            return None;
        }
        self.total_seconds = preset.total_seconds();
        self.remaining_seconds = self.total_seconds;
        Some(Event::PresetSelected {
            minutes: preset.minutes,
            at: Utc::now(),
        })
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(super::preset::DEFAULT_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed_minutes(event: Option<Event>) -> Option<(u32, bool)> {
        match event {
            Some(Event::TimerCompleted {
                elapsed_minutes,
                natural,
                ..
            }) => Some((elapsed_minutes, natural)),
            _ => None,
        }
    }

    #[test]
    fn start_pause_resume() {
        let mut timer = FocusTimer::new(25);
        assert_eq!(timer.state(), TimerState::Idle);

        assert!(timer.start().is_some());
        assert_eq!(timer.state(), TimerState::Running);

        assert!(timer.pause().is_some());
        assert_eq!(timer.state(), TimerState::Paused);

        assert!(timer.start().is_some());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[test]
    fn full_countdown_credits_target_minutes() {
        let mut timer = FocusTimer::new(25);
        timer.start();

        let mut completion = None;
        for _ in 0..1500 {
            if let Some(event) = timer.tick() {
                completion = Some(event);
            }
        }
        assert_eq!(timer.state(), TimerState::Completed);
        assert_eq!(completed_minutes(completion), Some((25, true)));
    }

    #[test]
    fn finish_early_credits_elapsed_ceiling() {
        let mut timer = FocusTimer::new(25);
        timer.start();
        for _ in 0..61 {
            timer.tick();
        }
        // ceil(61 / 60) = 2
        let event = timer.finish_early();
        assert_eq!(completed_minutes(event), Some((2, false)));
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[test]
    fn finish_early_with_no_elapsed_minute_emits_nothing() {
        let mut timer = FocusTimer::new(25);
        timer.start();
        let event = timer.finish_early();
        assert!(event.is_none());
        // The state still settles in Completed.
        assert_eq!(timer.state(), TimerState::Completed);
    }

    #[test]
    fn start_with_zero_remaining_is_a_noop() {
        let mut timer = FocusTimer::new(0);
        assert!(timer.start().is_none());
        assert_eq!(timer.state(), TimerState::Idle);
        assert!(timer.tick().is_none());
    }

    #[test]
    fn tick_outside_running_does_nothing() {
        let mut timer = FocusTimer::new(25);
        assert!(timer.tick().is_none());
        timer.start();
        timer.pause();
        assert!(timer.tick().is_none());
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn reset_restores_full_duration() {
        let mut timer = FocusTimer::new(25);
        timer.start();
        for _ in 0..100 {
            timer.tick();
        }
        timer.reset();
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn preset_only_applies_while_idle() {
        let mut timer = FocusTimer::new(25);
        assert!(timer.select_preset(Preset { minutes: 45 }).is_some());
        assert_eq!(timer.total_seconds(), 45 * 60);

        timer.start();
        assert!(timer.select_preset(Preset { minutes: 15 }).is_none());
        assert_eq!(timer.total_seconds(), 45 * 60);
    }

    #[test]
    fn advance_by_stops_at_completion() {
        let mut timer = FocusTimer::new(1);
        timer.start();
        let event = timer.advance_by(3600);
        assert_eq!(completed_minutes(event), Some((1, true)));
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn engine_round_trips_through_json() {
        let mut timer = FocusTimer::new(25);
        timer.start();
        timer.tick();
        let json = serde_json::to_string(&timer).unwrap();
        let restored: FocusTimer = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), TimerState::Running);
        assert_eq!(restored.remaining_seconds(), timer.remaining_seconds());
    }
}
