//! Focus/break timer state machine.
//!
//! Two modes: a free-running stopwatch and a pomodoro countdown cycling
//! focus -> short break -> ... -> long break. The machine is driven by an
//! external one-second tick; it owns no clock and schedules nothing, so
//! pausing or tearing down the owning surface simply stops calling
//! `tick()`.

use chrono::{DateTime, Utc};

use super::documents::NewTimerLog;
use crate::models::week::TimerMode;

/// Pomodoro durations in minutes plus the long-break cadence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PomodoroConfig {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_before_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            short_break_minutes: 5,
            long_break_minutes: 15,
            sessions_before_long_break: 4,
        }
    }
}

/// Meditation countdown presets, in minutes.
pub const MEDITATION_PRESETS: [u32; 5] = [5, 10, 15, 20, 30];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PomodoroPhase {
    Focus,
    ShortBreak,
    LongBreak,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PomodoroState {
    /// 1-based focus-session counter within the current cycle.
    pub session: u32,
    pub phase: PomodoroPhase,
}

impl Default for PomodoroState {
    fn default() -> Self {
        Self {
            session: 1,
            phase: PomodoroPhase::Focus,
        }
    }
}

/// Result of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Timer is not running; nothing happened.
    Idle,
    Running,
    /// The countdown target was reached and the timer stopped. In
    /// pomodoro mode the machine has already advanced to the next phase.
    TargetReached {
        elapsed_seconds: u32,
        completed_phase: Option<PomodoroPhase>,
    },
}

/// A finished session as handed to the logging flow. `minutes` defaults to
/// the measured duration rounded to the nearest minute, but the user may
/// adjust it before the log is committed.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletedSession {
    pub seconds: u32,
    pub minutes: u32,
    pub tag: Option<String>,
    pub mode: TimerMode,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
}

impl CompletedSession {
    /// Override the measured minutes with a user-confirmed value.
    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.minutes = minutes;
        self
    }

    /// Turn the session into a log entry for the week mutation API.
    pub fn into_log(self, activity: &str, date: &str) -> NewTimerLog {
        NewTimerLog {
            activity: activity.to_string(),
            minutes: self.minutes,
            date: date.to_string(),
            mode: self.mode,
            tag: self.tag,
        }
    }
}

pub struct Timer {
    mode: TimerMode,
    seconds: u32,
    running: bool,
    target_seconds: Option<u32>,
    tag: Option<String>,
    pomodoro: PomodoroState,
    config: PomodoroConfig,
    started_at: Option<DateTime<Utc>>,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}

impl Timer {
    pub fn new(config: PomodoroConfig) -> Self {
        Self {
            mode: TimerMode::Simple,
            seconds: 0,
            running: false,
            target_seconds: None,
            tag: None,
            pomodoro: PomodoroState::default(),
            config,
            started_at: None,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pomodoro(&self) -> PomodoroState {
        self.pomodoro
    }

    pub fn target_seconds(&self) -> Option<u32> {
        self.target_seconds
    }

    /// Seconds left on the countdown, if one is set.
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.target_seconds
            .map(|target| target.saturating_sub(self.seconds))
    }

    /// Countdown progress in percent, if a target is set.
    pub fn progress(&self) -> Option<f32> {
        self.target_seconds
            .filter(|target| *target > 0)
            .map(|target| self.seconds as f32 / target as f32 * 100.0)
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.tag = tag.map(str::to_string);
    }

    pub fn start(&mut self) {
        if self.started_at.is_none() || self.seconds == 0 {
            self.started_at = Some(Utc::now());
        }
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    /// Advance one second. The caller owns the tick cadence.
    pub fn tick(&mut self) -> Tick {
        if !self.running {
            return Tick::Idle;
        }

        self.seconds += 1;

        if let Some(target) = self.target_seconds {
            if self.seconds >= target {
                self.running = false;
                let elapsed = self.seconds;
                let completed_phase = match self.mode {
                    TimerMode::Pomodoro => {
                        let phase = self.pomodoro.phase;
                        self.advance_pomodoro();
                        Some(phase)
                    }
                    TimerMode::Simple => None,
                };
                return Tick::TargetReached {
                    elapsed_seconds: elapsed,
                    completed_phase,
                };
            }
        }

        Tick::Running
    }

    fn advance_pomodoro(&mut self) {
        match self.pomodoro.phase {
            PomodoroPhase::Focus => {
                if self.pomodoro.session >= self.config.sessions_before_long_break {
                    self.pomodoro.phase = PomodoroPhase::LongBreak;
                    self.target_seconds = Some(self.config.long_break_minutes * 60);
                } else {
                    self.pomodoro.session += 1;
                    self.pomodoro.phase = PomodoroPhase::ShortBreak;
                    self.target_seconds = Some(self.config.short_break_minutes * 60);
                }
            }
            PomodoroPhase::ShortBreak => {
                self.pomodoro.phase = PomodoroPhase::Focus;
                self.target_seconds = Some(self.config.work_minutes * 60);
            }
            PomodoroPhase::LongBreak => {
                // The cycle starts over after a long break.
                self.pomodoro.session = 1;
                self.pomodoro.phase = PomodoroPhase::Focus;
                self.target_seconds = Some(self.config.work_minutes * 60);
            }
        }
        self.seconds = 0;
    }

    /// Stop and emit the session for logging. Elapsed time converts to
    /// whole minutes, rounded to nearest.
    pub fn stop(&mut self) -> CompletedSession {
        let elapsed = self.seconds;
        self.running = false;
        self.seconds = 0;
        self.target_seconds = None;

        CompletedSession {
            seconds: elapsed,
            minutes: (elapsed + 30) / 60,
            tag: self.tag.clone(),
            mode: self.mode,
            start_time: self.started_at.take(),
            end_time: Utc::now(),
        }
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.seconds = 0;
        match self.mode {
            TimerMode::Pomodoro => {
                self.pomodoro = PomodoroState::default();
                self.target_seconds = Some(self.config.work_minutes * 60);
            }
            TimerMode::Simple => {
                self.target_seconds = None;
            }
        }
    }

    pub fn set_simple_mode(&mut self) {
        self.mode = TimerMode::Simple;
        self.reset();
    }

    pub fn set_pomodoro_mode(&mut self) {
        self.mode = TimerMode::Pomodoro;
        self.reset();
    }

    /// Free countdown in simple mode (meditation presets and the like).
    pub fn set_countdown(&mut self, minutes: u32) {
        self.target_seconds = Some(minutes * 60);
        self.seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run the timer until the current countdown completes.
    fn run_to_target(timer: &mut Timer) -> Tick {
        timer.start();
        loop {
            match timer.tick() {
                Tick::Running => continue,
                outcome => return outcome,
            }
        }
    }

    #[test]
    fn simple_mode_counts_up_without_target() {
        let mut timer = Timer::default();
        timer.start();
        for _ in 0..90 {
            assert_eq!(timer.tick(), Tick::Running);
        }
        assert_eq!(timer.seconds(), 90);
        assert_eq!(timer.remaining_seconds(), None);
        assert_eq!(timer.progress(), None);
    }

    #[test]
    fn tick_is_inert_while_paused() {
        let mut timer = Timer::default();
        timer.start();
        timer.tick();
        timer.pause();
        assert_eq!(timer.tick(), Tick::Idle);
        assert_eq!(timer.seconds(), 1);
    }

    #[test]
    fn pomodoro_cycle_with_default_presets() {
        let mut timer = Timer::default();
        timer.set_pomodoro_mode();
        assert_eq!(timer.target_seconds(), Some(25 * 60));
        assert_eq!(timer.pomodoro().session, 1);
        assert_eq!(timer.pomodoro().phase, PomodoroPhase::Focus);

        // Sessions 1 through 3 each end in a short break, with the
        // counter stepping 1 -> 2 -> 3 -> 4.
        for expected_session in 2..=4 {
            let outcome = run_to_target(&mut timer);
            assert_eq!(
                outcome,
                Tick::TargetReached {
                    elapsed_seconds: 25 * 60,
                    completed_phase: Some(PomodoroPhase::Focus),
                }
            );
            assert_eq!(timer.pomodoro().phase, PomodoroPhase::ShortBreak);
            assert_eq!(timer.pomodoro().session, expected_session);
            assert_eq!(timer.target_seconds(), Some(5 * 60));

            let outcome = run_to_target(&mut timer);
            assert_eq!(
                outcome,
                Tick::TargetReached {
                    elapsed_seconds: 5 * 60,
                    completed_phase: Some(PomodoroPhase::ShortBreak),
                }
            );
            assert_eq!(timer.pomodoro().phase, PomodoroPhase::Focus);
            assert_eq!(timer.pomodoro().session, expected_session);
            assert_eq!(timer.target_seconds(), Some(25 * 60));
        }

        // The fourth completed focus session earns the long break.
        let outcome = run_to_target(&mut timer);
        assert_eq!(
            outcome,
            Tick::TargetReached {
                elapsed_seconds: 25 * 60,
                completed_phase: Some(PomodoroPhase::Focus),
            }
        );
        assert_eq!(timer.pomodoro().phase, PomodoroPhase::LongBreak);
        assert_eq!(timer.target_seconds(), Some(15 * 60));

        // Finishing the long break restarts the cycle at session 1.
        run_to_target(&mut timer);
        assert_eq!(timer.pomodoro().phase, PomodoroPhase::Focus);
        assert_eq!(timer.pomodoro().session, 1);
        assert_eq!(timer.target_seconds(), Some(25 * 60));
    }

    #[test]
    fn stop_rounds_to_nearest_minute() {
        let mut timer = Timer::default();
        timer.set_tag(Some("focus"));
        timer.start();
        for _ in 0..90 {
            timer.tick();
        }

        let session = timer.stop();
        assert_eq!(session.seconds, 90);
        assert_eq!(session.minutes, 2);
        assert_eq!(session.tag.as_deref(), Some("focus"));
        assert_eq!(session.mode, TimerMode::Simple);
        assert!(session.start_time.is_some());

        // Timer is back to zero and idle.
        assert_eq!(timer.seconds(), 0);
        assert!(!timer.is_running());
        assert_eq!(timer.target_seconds(), None);
    }

    #[test]
    fn stop_rounds_down_below_half_minute() {
        let mut timer = Timer::default();
        timer.start();
        for _ in 0..89 {
            timer.tick();
        }
        assert_eq!(timer.stop().minutes, 1);
    }

    #[test]
    fn confirmed_minutes_can_be_adjusted() {
        let mut timer = Timer::default();
        timer.start();
        for _ in 0..300 {
            timer.tick();
        }

        let session = timer.stop().with_minutes(10);
        assert_eq!(session.minutes, 10);

        let log = session.into_log("Reading", "2026-02-04");
        assert_eq!(log.minutes, 10);
        assert_eq!(log.activity, "Reading");
        assert_eq!(log.mode, TimerMode::Simple);
    }

    #[test]
    fn countdown_progress_and_remaining() {
        let mut timer = Timer::default();
        timer.set_countdown(MEDITATION_PRESETS[0]);
        assert_eq!(timer.target_seconds(), Some(300));

        timer.start();
        for _ in 0..75 {
            timer.tick();
        }
        assert_eq!(timer.remaining_seconds(), Some(225));
        assert_eq!(timer.progress(), Some(25.0));

        // Reaching the target stops a simple-mode countdown without any
        // phase bookkeeping.
        for _ in 0..224 {
            timer.tick();
        }
        assert_eq!(
            timer.tick(),
            Tick::TargetReached {
                elapsed_seconds: 300,
                completed_phase: None,
            }
        );
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_restores_mode_defaults() {
        let mut timer = Timer::default();
        timer.set_pomodoro_mode();
        run_to_target(&mut timer);
        assert_eq!(timer.pomodoro().session, 2);

        timer.reset();
        assert_eq!(timer.pomodoro().session, 1);
        assert_eq!(timer.pomodoro().phase, PomodoroPhase::Focus);
        assert_eq!(timer.target_seconds(), Some(25 * 60));
        assert!(!timer.is_running());

        timer.set_simple_mode();
        assert_eq!(timer.target_seconds(), None);
    }
}
