//! Single-slot scheduler for timed continuations.
//!
//! At most one continuation is pending. Scheduling replaces whatever was
//! pending, and every continuation carries a fresh [`RoutineToken`] so a
//! resumption can be matched against the routine that is supposed to be
//! running.

/// Identity of one scheduled continuation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoutineToken(u64);

/// Where the engine picks up once a wait has elapsed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Lead-in finished; reveal the sequence and sound the first note
    RevealSequence,
    /// Note `index` has sounded for its full duration
    NoteOff(usize),
    /// Pause after note `index` is over
    NextNote(usize),
    /// Playback is done; accept input
    OpenInput,
    /// Result delay is over; start the level now current
    StartLevel,
}

#[derive(Clone, Copy, Debug)]
struct Pending {
    token: RoutineToken,
    remaining: f64,
    continuation: Continuation,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_token: u64,
    pending: Option<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `continuation` after `delay` seconds, cancelling anything pending
    pub fn schedule(&mut self, delay: f64, continuation: Continuation) -> RoutineToken {
        let token = RoutineToken(self.next_token);
        self.next_token = self.next_token.wrapping_add(1);
        if let Some(old) = self.pending.take() {
            tracing::debug!(continuation = ?old.continuation, "replacing pending continuation");
        }
        self.pending = Some(Pending {
            token,
            remaining: delay.max(0.0),
            continuation,
        });
        token
    }

    /// Cancel `token` if it is still pending. Returns whether anything was cancelled.
    pub fn cancel(&mut self, token: RoutineToken) -> bool {
        match self.pending {
            Some(p) if p.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Drop whatever is pending
    pub fn cancel_all(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self, token: RoutineToken) -> bool {
        self.pending.is_some_and(|p| p.token == token)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Seconds left before the pending continuation fires
    pub fn remaining(&self) -> Option<f64> {
        self.pending.map(|p| p.remaining)
    }

    /// Spend up to `*budget` seconds waiting on the pending continuation.
    ///
    /// If it falls due, the wait is subtracted from the budget and the
    /// continuation is returned; the caller should resume it and poll again
    /// with the leftover budget. Otherwise the whole budget is consumed.
    pub fn poll(&mut self, budget: &mut f64) -> Option<(RoutineToken, Continuation)> {
        let pending = self.pending.as_mut()?;
        if pending.remaining <= *budget {
            *budget -= pending.remaining;
            let fired = (pending.token, pending.continuation);
            self.pending = None;
            Some(fired)
        } else {
            pending.remaining -= *budget;
            *budget = 0.0;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut s = Scheduler::new();
        let token = s.schedule(1.0, Continuation::OpenInput);

        let mut budget = 0.6;
        assert_eq!(s.poll(&mut budget), None);
        assert_eq!(budget, 0.0);
        assert!(s.is_pending(token));

        let mut budget = 0.5;
        assert_eq!(s.poll(&mut budget), Some((token, Continuation::OpenInput)));
        assert!((budget - 0.1).abs() < 1e-9);
        assert!(!s.has_pending());
    }

    #[test]
    fn test_zero_delay_fires_on_next_poll() {
        let mut s = Scheduler::new();
        let token = s.schedule(0.0, Continuation::StartLevel);
        let mut budget = 0.0;
        assert_eq!(s.poll(&mut budget), Some((token, Continuation::StartLevel)));
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let mut s = Scheduler::new();
        let first = s.schedule(1.0, Continuation::OpenInput);
        let second = s.schedule(2.0, Continuation::StartLevel);
        assert_ne!(first, second);
        assert!(!s.is_pending(first));
        assert!(s.is_pending(second));

        let mut budget = 5.0;
        assert_eq!(s.poll(&mut budget), Some((second, Continuation::StartLevel)));
        assert_eq!(s.poll(&mut budget), None);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut s = Scheduler::new();
        let token = s.schedule(1.0, Continuation::NoteOff(0));
        assert!(s.cancel(token));
        assert!(!s.cancel(token));
        s.cancel_all();
        s.cancel_all();
        assert!(!s.has_pending());
    }

    #[test]
    fn test_cancel_stale_token_keeps_current() {
        let mut s = Scheduler::new();
        let stale = s.schedule(1.0, Continuation::NoteOff(0));
        let current = s.schedule(1.0, Continuation::NextNote(0));
        assert!(!s.cancel(stale));
        assert!(s.is_pending(current));
    }

    #[test]
    fn test_negative_delay_is_clamped() {
        let mut s = Scheduler::new();
        s.schedule(-3.0, Continuation::OpenInput);
        assert_eq!(s.remaining(), Some(0.0));
    }
}
