//! A calculator session: one input state machine plus one history log.
//!
//! The session routes completed calculations into the history and to any
//! registered result listeners, and owns the deferred auto-clear that
//! follows a failed calculation.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::calculator::{
    CalcMode, Calculator, Constant, InputState, Key, Operator, Outcome, ResetTicket,
    ScientificFn, Settings,
};
use crate::history::{DEFAULT_CAPACITY, HistoryEntry, HistoryLog};

/// Delay before the error indicator is cleared automatically.
pub const DEFAULT_AUTO_CLEAR: Duration = Duration::from_millis(1500);

type ResultCallback = Arc<dyn Fn(&str, &str) + Send + Sync>;

/// Options for building a [`Session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub settings: Settings,
    pub mode: CalcMode,
    pub history_capacity: usize,
    pub auto_clear: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            mode: CalcMode::Standard,
            history_capacity: DEFAULT_CAPACITY,
            auto_clear: DEFAULT_AUTO_CLEAR,
        }
    }
}

/// Drives a calculator and records its results.
///
/// Key presses are handled synchronously. A failed calculation schedules
/// a reset on the current tokio runtime; without a runtime the error
/// stays on the display until the next key press clears it.
pub struct Session {
    calculator: Arc<Mutex<Calculator>>,
    history: HistoryLog,
    auto_clear: Duration,
    pending_reset: Option<JoinHandle<()>>,
    on_result: Vec<ResultCallback>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(SessionOptions::default())
    }

    pub fn with_options(options: SessionOptions) -> Self {
        let mut calculator = Calculator::with_settings(options.settings);
        calculator.set_mode(options.mode);

        Self {
            calculator: Arc::new(Mutex::new(calculator)),
            history: HistoryLog::with_capacity(options.history_capacity),
            auto_clear: options.auto_clear,
            pending_reset: None,
            on_result: Vec::new(),
        }
    }

    /// Set a callback for every completed calculation.
    ///
    /// Called with `(expression, result)` after the entry has been added
    /// to the history.
    pub fn on_result(&mut self, callback: impl Fn(&str, &str) + Send + Sync + 'static) {
        self.on_result.push(Arc::new(callback));
    }

    /// Take a snapshot of the visible calculator state.
    pub fn state(&self) -> InputState {
        self.lock().state()
    }

    pub fn mode(&self) -> CalcMode {
        self.lock().mode()
    }

    pub fn set_mode(&mut self, mode: CalcMode) {
        self.lock().set_mode(mode);
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Look up a history entry, 0 being the most recent.
    pub fn select(&self, index: usize) -> Option<&HistoryEntry> {
        self.history.select(index)
    }

    /// Put a history entry's result back on the display.
    pub fn recall(&mut self, index: usize) -> Outcome {
        let Some(value) = self
            .history
            .select(index)
            .map(|entry| entry.text_for_display().to_string())
        else {
            return Outcome::Ignored;
        };
        self.apply(|calculator| calculator.load_operand(&value))
    }

    /// Check if an auto-clear is scheduled and has not run yet.
    pub fn has_pending_reset(&self) -> bool {
        self.pending_reset
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Apply a key press.
    pub fn press(&mut self, key: Key) -> Outcome {
        self.apply(|calculator| calculator.press(key))
    }

    pub fn press_digit(&mut self, digit: char) -> Outcome {
        self.apply(|calculator| calculator.press_digit(digit))
    }

    pub fn press_operator(&mut self, op: Operator) -> Outcome {
        self.press(Key::Operator(op))
    }

    pub fn press_clear(&mut self) -> Outcome {
        self.press(Key::Clear)
    }

    pub fn press_delete(&mut self) -> Outcome {
        self.press(Key::Delete)
    }

    pub fn press_equals(&mut self) -> Outcome {
        self.press(Key::Equals)
    }

    pub fn press_scientific(&mut self, function: ScientificFn) -> Outcome {
        self.press(Key::Scientific(function))
    }

    pub fn press_constant(&mut self, constant: Constant) -> Outcome {
        self.press(Key::Constant(constant))
    }

    fn apply(&mut self, transition: impl FnOnce(&mut Calculator) -> Outcome) -> Outcome {
        let (outcome, superseded) = {
            let mut calculator = self.lock();
            let before = calculator.generation();
            let outcome = transition(&mut *calculator);
            (outcome, calculator.generation() != before)
        };

        if superseded {
            self.cancel_pending_reset();
        }

        match &outcome {
            Outcome::Evaluated { expression, result } => {
                self.history.append(expression, result);
                for callback in &self.on_result {
                    callback(expression, result);
                }
            }
            Outcome::Failed { reset, .. } => self.schedule_reset(*reset),
            Outcome::Updated | Outcome::Ignored => {}
        }

        outcome
    }

    fn schedule_reset(&mut self, ticket: ResetTicket) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime, error will stay until the next key press");
            return;
        };

        let calculator = Arc::clone(&self.calculator);
        let delay = self.auto_clear;
        debug!(generation = ticket.generation(), ?delay, "auto-clear scheduled");

        self.pending_reset = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if lock(&calculator).expire(ticket) {
                debug!(generation = ticket.generation(), "auto-clear fired");
            }
        }));
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(handle) = self.pending_reset.take() {
            handle.abort();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Calculator> {
        lock(&self.calculator)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_pending_reset();
    }
}

fn lock(calculator: &Mutex<Calculator>) -> MutexGuard<'_, Calculator> {
    calculator.lock().unwrap_or_else(PoisonError::into_inner)
}
