//! [`TrackingLoop`] – the failure-aware reporting loop.
//!
//! Each tick of the loop:
//!
//! 1. **Ingest** – route the incoming sample to the [`FusionEstimator`]
//!    and recompute the instantaneous estimate from the latest sample
//!    pair.
//! 2. **Smooth** – step the [`SmoothingFilter`] toward the new estimate.
//! 3. **Reference** – while a session is active, compute the signed delta
//!    from the captured zero pose.
//! 4. **Deliver** – hand the delta to the [`DeliverySink`]. At most one
//!    delivery is outstanding; a delta computed while one is in flight
//!    supersedes the pending value instead of queueing, because
//!    orientation is a continuous signal where only the latest value
//!    matters.
//! 5. **React** – a failed delivery forces the session back to idle and
//!    emits a `SessionStopped { DeliveryFailed }` alert. No retry: the
//!    operator must explicitly restart tracking.
//!
//! Sample ingestion and smoothing continue unconditionally while a
//! delivery is outstanding; only the decision to *send* is affected.
//!
//! All mutable state is owned by the single loop task, so no locks are
//! needed. Control commands and delivery outcomes are folded into the
//! same task via `select!`.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use oritrack_engine::{FusionEstimator, SmoothingFilter};
use oritrack_middleware::{DeliverySink, EventBus, Topic, TopicReceiver};
use oritrack_types::{Event, EventPayload, OrientationAngles, SensorSample, StopReason};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::session::TrackingSession;

/// Event source tag used by the loop.
const SOURCE: &str = "oritrack-runtime::tracking_loop";

/// Configuration bundle for [`TrackingLoop`].
#[derive(Debug, Clone)]
pub struct TrackingLoopConfig {
    /// Smoothing coefficient handed to the [`SmoothingFilter`].
    pub smoothing_rate: f32,
    /// Rounding factor handed to the [`FusionEstimator`].
    pub precision: f32,
}

impl Default for TrackingLoopConfig {
    fn default() -> Self {
        Self {
            smoothing_rate: oritrack_engine::DEFAULT_SMOOTHING_RATE,
            precision: oritrack_engine::DEFAULT_PRECISION,
        }
    }
}

/// The reporting-loop orchestrator.
///
/// Owns the estimator, the smoothing filter, the session state machine,
/// and the delivery sink handle. The synchronous core
/// ([`ingest`][Self::ingest], [`handle_command`][Self::handle_command],
/// [`on_delivery_outcome`][Self::on_delivery_outcome]) carries all the
/// state transitions; [`run`][Self::run] wires it to a sample stream and
/// the event bus.
pub struct TrackingLoop {
    estimator: FusionEstimator,
    /// Seeded lazily from the first instantaneous estimate, so the first
    /// session start observes a live value instead of a {0, 0} transient.
    filter: Option<SmoothingFilter>,
    smoothing_rate: f32,
    session: TrackingSession,
    sink: Arc<dyn DeliverySink>,
    bus: EventBus,
}

impl TrackingLoop {
    /// Construct a loop around `sink`, publishing its events on `bus`.
    pub fn new(config: TrackingLoopConfig, sink: Arc<dyn DeliverySink>, bus: EventBus) -> Self {
        Self {
            estimator: FusionEstimator::new(config.precision),
            filter: None,
            smoothing_rate: config.smoothing_rate,
            session: TrackingSession::new(),
            sink,
            bus,
        }
    }

    /// `true` while a tracking session is active.
    pub fn is_tracking(&self) -> bool {
        self.session.is_active()
    }

    /// The current smoothed estimate (instantaneous until the filter has
    /// been seeded by a first sample).
    pub fn current_estimate(&self) -> OrientationAngles {
        match &self.filter {
            Some(filter) => filter.current(),
            None => self.estimator.estimate(),
        }
    }

    // -------------------------------------------------------------------
    // Synchronous core
    // -------------------------------------------------------------------

    /// Feed one sensor sample through fusion and smoothing.
    ///
    /// Returns the zero-referenced delta to report, or `None` while no
    /// session is active.
    pub fn ingest(&mut self, sample: &SensorSample) -> Option<OrientationAngles> {
        self.estimator.ingest(sample);
        let instantaneous = self.estimator.estimate();

        let smoothed = match self.filter.as_mut() {
            Some(filter) => filter.update(instantaneous),
            None => {
                let filter = SmoothingFilter::new(self.smoothing_rate, instantaneous);
                let current = filter.current();
                self.filter = Some(filter);
                current
            }
        };

        self.session.delta(smoothed)
    }

    /// Begin a session, capturing the current smoothed estimate as the
    /// zero reference. Returns `false` when already tracking.
    pub fn start(&mut self) -> bool {
        let current = self.current_estimate();
        if self.filter.is_none() {
            self.filter = Some(SmoothingFilter::new(self.smoothing_rate, current));
        }
        if !self.session.start(current) {
            debug!("start ignored: session already active");
            return false;
        }
        info!(
            roll = current.roll,
            yaw = current.yaw,
            "tracking started, zero reference captured"
        );
        self.publish_alert(EventPayload::SessionStarted { reference: current });
        true
    }

    /// End the session for `reason`. Returns `false` when already idle.
    pub fn stop(&mut self, reason: StopReason) -> bool {
        if !self.session.stop() {
            return false;
        }
        match reason {
            StopReason::Requested => info!("tracking stopped by request"),
            StopReason::DeliveryFailed => {
                warn!("delivery failed; tracking disabled until restarted")
            }
        }
        self.publish_alert(EventPayload::SessionStopped { reason });
        true
    }

    /// Apply an edge-triggered control command.
    pub fn handle_command(&mut self, payload: &EventPayload) {
        match payload {
            EventPayload::StartTracking => {
                self.start();
            }
            EventPayload::StopTracking => {
                self.stop(StopReason::Requested);
            }
            other => debug!(payload = ?other, "ignoring non-command event on control lane"),
        }
    }

    /// Observe the outcome of a completed delivery.
    ///
    /// Returns `true` when a failure forced the session to stop.
    pub fn on_delivery_outcome(&mut self, delivered: bool) -> bool {
        if delivered {
            return false;
        }
        self.stop(StopReason::DeliveryFailed)
    }

    // -------------------------------------------------------------------
    // Async driver
    // -------------------------------------------------------------------

    /// Drive the loop until the sample stream ends.
    ///
    /// `control_rx` must be a subscription to the bus `Control` lane,
    /// taken by the caller before any command is published so none are
    /// missed. Selects over the sample stream, the control lane, and the
    /// in-flight delivery; control commands are checked first so an
    /// already-buffered start is observed before the first sample.
    pub async fn run(
        mut self,
        mut samples: BoxStream<'static, SensorSample>,
        mut control_rx: TopicReceiver,
    ) {
        let mut in_flight: Option<JoinHandle<bool>> = None;
        let mut pending: Option<OrientationAngles> = None;

        loop {
            tokio::select! {
                biased;

                control = control_rx.recv() => match control {
                    Ok(event) => self.handle_command(&event.payload),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(lagged_by = n, "control subscriber lagged");
                    }
                    // Unreachable while the loop holds the bus; bail out
                    // rather than spin if it ever happens.
                    Err(broadcast::error::RecvError::Closed) => break,
                },

                outcome = next_outcome(&mut in_flight) => {
                    in_flight = None;
                    if self.on_delivery_outcome(outcome) {
                        // The session is gone; the superseded delta dies
                        // with it.
                        pending = None;
                    } else if let Some(delta) = pending.take() {
                        if self.session.is_active() {
                            in_flight = Some(self.spawn_delivery(delta));
                        }
                    }
                }

                maybe_sample = samples.next() => {
                    let Some(sample) = maybe_sample else { break };
                    if let Some(delta) = self.ingest(&sample) {
                        let _ = self.bus.publish_to(
                            Topic::Orientation,
                            Event::new(SOURCE, EventPayload::OrientationDelta(delta)),
                        );
                        if in_flight.is_some() {
                            // Supersede, never queue: only the latest
                            // delta is worth sending.
                            pending = Some(delta);
                        } else {
                            in_flight = Some(self.spawn_delivery(delta));
                        }
                    }
                }
            }
        }

        if let Some(handle) = in_flight {
            handle.abort();
        }
        info!("sample stream ended, tracking loop shut down");
    }

    // -------------------------------------------------------------------
    // Private helpers
    // -------------------------------------------------------------------

    fn spawn_delivery(&self, delta: OrientationAngles) -> JoinHandle<bool> {
        let sink = Arc::clone(&self.sink);
        tokio::spawn(async move {
            match sink.deliver(delta).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "delivery attempt failed");
                    false
                }
            }
        })
    }

    fn publish_alert(&self, payload: EventPayload) {
        // Best-effort publish – no subscribers is not an error.
        let _ = self
            .bus
            .publish_to(Topic::SystemAlerts, Event::new(SOURCE, payload));
    }
}

/// Await the in-flight delivery, or park forever when none is out.
///
/// A join failure (panicked or aborted delivery task) counts as a failed
/// delivery.
async fn next_outcome(in_flight: &mut Option<JoinHandle<bool>>) -> bool {
    match in_flight.as_mut() {
        Some(handle) => handle.await.unwrap_or(false),
        None => std::future::pending().await,
    }
}
