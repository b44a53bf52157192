use std::time::{Duration, Instant};

use crate::state::Origin;

/// A debounced seek that became due and should be issued on the device.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FiredSeek {
    pub target: f64,
    pub origin: Origin,
}

#[derive(Debug, Copy, Clone)]
struct PendingSeek {
    target: f64,
    origin: Origin,
    due: Instant,
}

/// Coalesces rapid seek requests into one delayed device command.
///
/// Driven by the player actor's tick: `request` on every seek intent,
/// `poll` and `grace_elapsed` on every loop iteration, `cancel` whenever
/// the current track is replaced. Time is always passed in, so the logic is
/// deterministic under test.
#[derive(Debug)]
pub struct SeekDebouncer {
    delay: Duration,
    grace: Duration,
    pending: Option<PendingSeek>,
    grace_until: Option<(Instant, Origin)>,
}

impl SeekDebouncer {
    pub fn new(delay: Duration, grace: Duration) -> Self {
        Self {
            delay,
            grace,
            pending: None,
            grace_until: None,
        }
    }

    /// Schedule a device seek to `target`, replacing any pending one.
    pub fn request(&mut self, target: f64, origin: Origin, now: Instant) {
        self.pending = Some(PendingSeek {
            target,
            origin,
            due: now + self.delay,
        });
        // A superseding request keeps isSeeking held; the grace window
        // restarts when the new seek fires.
        self.grace_until = None;
    }

    /// Drop any pending seek and grace window. Seeking into a track that has
    /// since been replaced must not happen.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.grace_until = None;
    }

    /// Fire the pending seek once it is due. Starts the grace window.
    pub fn poll(&mut self, now: Instant) -> Option<FiredSeek> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        self.grace_until = Some((now + self.grace, pending.origin));
        Some(FiredSeek {
            target: pending.target,
            origin: pending.origin,
        })
    }

    /// Once the grace window passes (no device confirmation arrived), report
    /// the origin whose seek it was so the caller can clear `is_seeking`.
    pub fn grace_elapsed(&mut self, now: Instant) -> Option<Origin> {
        match self.grace_until {
            Some((until, origin)) if now >= until => {
                self.grace_until = None;
                Some(origin)
            }
            _ => None,
        }
    }

    /// The device confirmed the seek; no grace timeout needed anymore.
    pub fn confirm(&mut self) {
        self.grace_until = None;
    }

    /// True while a device seek is scheduled or its grace window is open.
    pub fn in_flight(&self) -> bool {
        self.pending.is_some() || self.grace_until.is_some()
    }

    /// Earliest instant the actor needs to wake up for, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.map(|p| p.due);
        let grace = self.grace_until.map(|(t, _)| t);
        match (pending, grace) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
