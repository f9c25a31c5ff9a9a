use tracing::{debug, info, warn};

use crate::caret::{caret_position, CaretPosition, GlyphLayout};
use crate::clock::{SessionClock, SystemTimeSource, TimeSource, TimerHandle};
use crate::error::SessionError;
use crate::language::Language;
use crate::metrics::{Metrics, SessionResults};
use crate::text_source::ResilientSource;
use crate::tracker::{CharState, InputGate, InputTracker, Passage, Rejection};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// What happened to an input update
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputOutcome {
    Accepted,
    Rejected(Rejection),
    Finished(SessionResults),
}

/// One typing test, from passage load to finish.
///
/// Focus and Caps Lock are tracked as two separate flags; a paused session
/// only resumes once both allow it (see [`Session::can_resume`]).
#[derive(Debug)]
pub struct Session<T: TimeSource = SystemTimeSource> {
    time: T,
    state: SessionState,
    tracker: InputTracker,
    clock: SessionClock,
    timer: Option<TimerHandle>,
    metrics: Option<Metrics>,
    loading: bool,
    focused: bool,
    caps_lock: bool,
    backspace_disabled: bool,
}

impl Session<SystemTimeSource> {
    pub fn new() -> Self {
        Self::with_time_source(SystemTimeSource)
    }
}

impl Default for Session<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> Session<T> {
    /// A session waiting for its first passage
    pub fn with_time_source(time: T) -> Self {
        Self {
            time,
            state: SessionState::Idle,
            tracker: InputTracker::default(),
            clock: SessionClock::new(),
            timer: None,
            metrics: None,
            loading: true,
            focused: true,
            caps_lock: false,
            backspace_disabled: false,
        }
    }

    /// Drop the current passage and block input until the next one arrives.
    pub fn begin_loading(&mut self) {
        self.reset();
        self.tracker = InputTracker::default();
        self.loading = true;
    }

    /// Install a new passage and start over in `Idle`.
    pub fn load_passage(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        let passage = Passage::new(text)?;
        self.reset();
        info!(target: "session", chars = passage.len(), "passage_loaded");
        self.tracker = InputTracker::new(passage);
        self.loading = false;
        Ok(())
    }

    /// Fetch a fresh passage from `source` and reset onto it.
    pub fn request_passage(
        &mut self,
        source: &mut ResilientSource,
        word_count: usize,
        language: Language,
    ) {
        self.begin_loading();
        let text = source.passage(word_count, language);
        if let Err(err) = self.load_passage(text) {
            warn!(target: "session", error = %err, "passage_rejected");
        }
    }

    /// Start the same passage again from scratch.
    pub fn restart(&mut self) {
        self.reset();
    }

    // the timer is cancelled before any other state is cleared
    fn reset(&mut self) {
        self.timer = None;
        self.clock.reset();
        self.tracker = match self.tracker.passage() {
            Some(passage) => InputTracker::new(passage.clone()),
            None => InputTracker::default(),
        };
        self.metrics = None;
        self.transition(SessionState::Idle);
    }

    /// Feed the full current typed string.
    pub fn input(&mut self, value: &str) -> InputOutcome {
        let gate = InputGate {
            finished: self.state == SessionState::Finished,
            loading: self.loading,
            caps_lock: self.caps_lock,
            unfocused: !self.focused,
            backspace_disabled: self.backspace_disabled,
        };

        if let Err(reason) = self.tracker.update(value, gate) {
            debug!(target: "session", ?reason, state = %self.state, "input_rejected");
            return InputOutcome::Rejected(reason);
        }

        if self.state == SessionState::Idle && !self.tracker.typed().is_empty() {
            self.start_timer();
            self.transition(SessionState::Running);
        }

        if self
            .tracker
            .check_completion(self.state == SessionState::Running)
        {
            return InputOutcome::Finished(self.finish());
        }

        InputOutcome::Accepted
    }

    fn finish(&mut self) -> SessionResults {
        self.stop_timer();
        let elapsed = self.clock.elapsed_secs();
        let passage = self.tracker.passage().map(Passage::chars).unwrap_or(&[]);
        let metrics = Metrics::compute(self.tracker.typed(), passage, elapsed);
        self.metrics = Some(metrics);
        self.transition(SessionState::Finished);

        let results = SessionResults::new(&metrics, elapsed);
        info!(
            target: "session",
            wpm = results.wpm,
            cpm = results.cpm,
            accuracy = results.accuracy_percent,
            errors = results.error_count,
            elapsed_secs = results.elapsed_secs,
            "session_finished"
        );
        results
    }

    pub fn focus_lost(&mut self) {
        self.focused = false;
        if self.state == SessionState::Running {
            self.pause();
        }
    }

    pub fn focus_gained(&mut self) {
        self.focused = true;
        self.try_resume();
    }

    pub fn set_caps_lock(&mut self, on: bool) {
        if self.caps_lock != on {
            debug!(target: "session", caps_lock = on, "caps_lock_changed");
        }
        self.caps_lock = on;
        if on {
            if self.state == SessionState::Running {
                self.pause();
            }
        } else {
            self.try_resume();
        }
    }

    /// Resume is only allowed while focused with Caps Lock off.
    pub fn can_resume(&self) -> bool {
        self.focused && !self.caps_lock
    }

    fn start_timer(&mut self) {
        let timer = self.clock.start(self.time.now());
        debug!(target: "session", ?timer, "timer_started");
        self.timer = Some(timer);
    }

    fn stop_timer(&mut self) {
        self.clock.pause(self.time.now());
        self.timer = None;
    }

    fn pause(&mut self) {
        self.stop_timer();
        self.transition(SessionState::Paused);
    }

    fn try_resume(&mut self) {
        if self.state == SessionState::Paused && self.can_resume() {
            self.start_timer();
            self.transition(SessionState::Running);
        }
    }

    /// Recurring timer callback.
    pub fn tick(&mut self) {
        if let Some(timer) = self.timer {
            self.clock.tick(timer, self.time.now());
        }
    }

    pub fn set_backspace_disabled(&mut self, disabled: bool) {
        self.backspace_disabled = disabled;
    }

    fn transition(&mut self, to: SessionState) {
        if self.state != to {
            debug!(target: "session", from = %self.state, %to, "transition");
            self.state = to;
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the blocking Caps Lock advisory should be on screen
    pub fn shows_caps_lock_advisory(&self) -> bool {
        self.caps_lock
    }

    pub fn backspace_disabled(&self) -> bool {
        self.backspace_disabled
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs()
    }

    pub fn passage(&self) -> Option<&Passage> {
        self.tracker.passage()
    }

    pub fn typed(&self) -> &[char] {
        self.tracker.typed()
    }

    pub fn typed_string(&self) -> String {
        self.tracker.typed_string()
    }

    pub fn char_states(&self) -> Vec<CharState> {
        self.tracker.char_states()
    }

    pub fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    pub fn results(&self) -> Option<SessionResults> {
        self.metrics
            .as_ref()
            .map(|m| SessionResults::new(m, self.clock.elapsed_secs()))
    }

    pub fn caret<L: GlyphLayout + ?Sized>(&self, layout: &L) -> CaretPosition {
        let passage_len = self.tracker.passage().map_or(0, Passage::len);
        caret_position(layout, self.tracker.typed().len(), passage_len)
    }
}
