use std::time::{Duration, Instant};

/// Trailing-edge debounce with de-duplication.
///
/// A value becomes available once `window` has passed without a newer push,
/// and is dropped if it equals the last value handed out.
#[derive(Debug, Clone)]
pub struct Debounced<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
    last_emitted: Option<T>,
}

impl<T: PartialEq + Clone> Debounced<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The pending value if its quiet period is over and it differs from the
    /// last emission.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, due)) if now >= *due => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        self.emit(value)
    }

    /// Emit the pending value immediately, ignoring the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        let (value, _) = self.pending.take()?;
        self.emit(value)
    }

    fn emit(&mut self, value: T) -> Option<T> {
        if self.last_emitted.as_ref() == Some(&value) {
            return None;
        }
        self.last_emitted = Some(value.clone());
        Some(value)
    }
}
