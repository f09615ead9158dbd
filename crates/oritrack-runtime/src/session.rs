//! Tracking session state machine.
//!
//! Two states: `Idle` (no zero reference exists) and `Tracking` (a
//! reference is held). The reference lives inside the `Tracking` variant,
//! so "active without a reference" is structurally inexpressible – the
//! invariant that a reference exists iff the session is active cannot be
//! violated by a missed null check.

use oritrack_engine::ZeroReference;
use oritrack_types::OrientationAngles;

/// The session's current mode.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Not tracking; no zero reference exists.
    Idle,
    /// Actively tracking against the captured zero reference.
    Tracking { reference: ZeroReference },
}

/// Aggregate session lifecycle.
///
/// Created idle. [`TrackingSession::start`] captures the supplied estimate
/// as the zero reference; [`TrackingSession::stop`] discards it. A stop
/// may be operator-requested or forced internally by a delivery failure –
/// the state machine does not distinguish, only the emitted event does.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    state: SessionState,
}

impl TrackingSession {
    /// Create an idle session.
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// `true` while a zero reference is held.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Tracking { .. })
    }

    /// `Idle → Tracking`, capturing `current` as the zero reference.
    ///
    /// Returns `false` (and changes nothing) when already tracking; the
    /// control surface is edge-triggered and re-zeroing requires an
    /// explicit stop first.
    pub fn start(&mut self, current: OrientationAngles) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = SessionState::Tracking {
            reference: ZeroReference::capture(current),
        };
        true
    }

    /// `Tracking → Idle`, discarding the reference.
    ///
    /// Returns `false` when already idle (stop while idle is a no-op).
    pub fn stop(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = SessionState::Idle;
        true
    }

    /// Signed delta of `current` from the zero reference, or `None` while
    /// idle (nothing is computed or reported without a reference).
    pub fn delta(&self, current: OrientationAngles) -> Option<OrientationAngles> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Tracking { reference } => Some(reference.delta(current)),
        }
    }

    /// The captured zero pose, while tracking.
    pub fn reference(&self) -> Option<OrientationAngles> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Tracking { reference } => Some(reference.reference()),
        }
    }
}

impl Default for TrackingSession {
    fn default() -> Self {
        Self::new()
    }
}
