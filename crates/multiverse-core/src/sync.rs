//! Synchronization controller.
//!
//! Owns the only mutable universe state in the system: the current
//! universe with its overlay, the last observed seed, and the enrichment
//! progress. Everything else reads snapshots.
//!
//! # Refresh
//!
//! `refresh(force)` derives the seed from the clock. An unchanged seed
//! without `force` is a no-op. Otherwise the base universe is generated and
//! published (overlay cleared) before the enrichment request is issued, so
//! subscribers always see the base record first.
//!
//! # Tickets
//!
//! Each enrichment request carries a [`Ticket`] of `(seed, generation)`.
//! A later request for the same seed (a forced refresh) supersedes earlier
//! ones. A request for another seed is stale once the epoch moves on.
//! Superseded and stale results are discarded; the in-flight calls are
//! never aborted.

use std::sync::Arc;
use std::time::Duration;

use multiverse_types::{
    CurrentUniverse, EnrichmentOverlay, EnrichmentPhase, EnrichmentStatus, Seed, Universe,
    UniverseEvent,
};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::clock::{EpochClock, TimeSource};
use crate::enricher::{Enricher, EnrichmentFailure, EnrichmentRequest};
use crate::generator::UniverseGenerator;
use crate::merge::{MergeOutcome, apply_enrichment};

/// Capacity of the change-event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Identity of one enrichment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    /// Seed the request was issued for.
    pub seed: Seed,
    /// Monotonic issue counter across all requests.
    pub generation: u64,
}

/// What `refresh` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Same epoch, not forced: nothing happened.
    Unchanged {
        /// The current seed.
        seed: Seed,
    },
    /// A base universe was generated and published.
    Generated {
        /// Seed of the new universe.
        seed: Seed,
        /// Whether the refresh was forced.
        forced: bool,
    },
}

impl RefreshOutcome {
    /// The seed the refresh observed.
    pub const fn seed(self) -> Seed {
        match self {
            Self::Unchanged { seed } | Self::Generated { seed, .. } => seed,
        }
    }

    /// Whether a universe was generated.
    pub const fn generated(self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

/// Mutable controller state, guarded by one lock.
#[derive(Debug, Default)]
struct SyncState {
    current: Option<CurrentUniverse>,
    last_observed_seed: Option<Seed>,
    status: EnrichmentStatus,
    /// Most recently issued ticket. Never cleared, so late results from
    /// older same-seed requests are still recognized as superseded.
    latest_ticket: Option<Ticket>,
    next_generation: u64,
}

impl SyncState {
    fn issue_ticket(&mut self, seed: Seed) -> Ticket {
        let ticket = Ticket {
            seed,
            generation: self.next_generation,
        };
        self.next_generation = self.next_generation.saturating_add(1);
        self.latest_ticket = Some(ticket);
        ticket
    }

    fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest_ticket == Some(ticket)
    }

    fn is_superseded(&self, ticket: Ticket) -> bool {
        self.latest_ticket
            .is_some_and(|latest| latest.seed == ticket.seed && latest.generation != ticket.generation)
    }
}

/// Lets an enricher update the progress label of its own request.
///
/// Updates are dropped once the request is no longer the latest, or once
/// its enrichment has finished.
#[derive(Debug, Clone)]
pub struct PhaseReporter {
    target: Option<ReporterTarget>,
    ticket: Ticket,
}

#[derive(Debug, Clone)]
struct ReporterTarget {
    state: Arc<RwLock<SyncState>>,
    events: broadcast::Sender<UniverseEvent>,
}

impl PhaseReporter {
    /// A reporter that discards every update.
    pub const fn noop() -> Self {
        Self {
            target: None,
            ticket: Ticket {
                seed: Seed::new(0),
                generation: 0,
            },
        }
    }

    /// The ticket of the request this reporter belongs to.
    pub const fn ticket(&self) -> Ticket {
        self.ticket
    }

    /// Set the progress phase. Returns whether the update was accepted.
    pub async fn report(&self, phase: EnrichmentPhase) -> bool {
        let Some(target) = &self.target else {
            return false;
        };

        let status = {
            let mut state = target.state.write().await;
            if !state.is_latest(self.ticket) || !state.status.in_progress {
                return false;
            }
            state.status = EnrichmentStatus::running(phase);
            state.status.clone()
        };

        debug!(seed = self.ticket.seed.value(), phase = ?phase, "enrichment phase changed");
        // Having no subscribers is fine.
        let _ = target.events.send(UniverseEvent::PhaseChanged {
            seed: self.ticket.seed,
            status,
        });
        true
    }
}

/// Orchestrates epoch detection, generation, enrichment, and merging.
pub struct SynchronizationController {
    clock: EpochClock,
    generator: UniverseGenerator,
    time: Arc<dyn TimeSource>,
    enricher: Arc<dyn Enricher>,
    enrichment_enabled: bool,
    request_timeout: Option<Duration>,
    state: Arc<RwLock<SyncState>>,
    events: broadcast::Sender<UniverseEvent>,
}

impl SynchronizationController {
    /// Create a controller. Nothing is generated until the first
    /// `refresh`.
    pub fn new(clock: EpochClock, time: Arc<dyn TimeSource>, enricher: Arc<dyn Enricher>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            clock,
            generator: UniverseGenerator::new(clock.epoch_duration_ms()),
            time,
            enricher,
            enrichment_enabled: true,
            request_timeout: None,
            state: Arc::new(RwLock::new(SyncState::default())),
            events,
        }
    }

    /// Bound every enrichment round trip. Exceeding it counts as
    /// [`EnrichmentFailure::Timeout`].
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Turn enrichment requests on or off. When off, base universes are
    /// published and the status stays idle.
    #[must_use]
    pub const fn with_enrichment(mut self, enabled: bool) -> Self {
        self.enrichment_enabled = enabled;
        self
    }

    /// Detect an epoch change (or honor `force`) and publish a new base
    /// universe, then issue its enrichment request.
    pub async fn refresh(&self, force: bool) -> RefreshOutcome {
        self.refresh_inner(force, false).await.0
    }

    /// Like [`refresh`](Self::refresh), and also return the universe on
    /// display as of that refresh.
    ///
    /// The snapshot is taken under the same lock as the refresh, so it
    /// always belongs to the returned seed even if another refresh runs
    /// right after.
    pub async fn refresh_snapshot(&self, force: bool) -> (RefreshOutcome, Option<CurrentUniverse>) {
        self.refresh_inner(force, true).await
    }

    async fn refresh_inner(
        &self,
        force: bool,
        snapshot: bool,
    ) -> (RefreshOutcome, Option<CurrentUniverse>) {
        let seed = self.clock.current_seed(self.time.now_ms());

        let (ticket, universe, published) = {
            let mut state = self.state.write().await;
            if !force && state.last_observed_seed == Some(seed) {
                let current = if snapshot { state.current.clone() } else { None };
                return (RefreshOutcome::Unchanged { seed }, current);
            }

            state.last_observed_seed = Some(seed);
            let universe = self.generator.generate(seed);
            let current = CurrentUniverse::from_base(universe.clone());
            let published = snapshot.then(|| current.clone());
            state.current = Some(current);
            let ticket = state.issue_ticket(seed);
            state.status = if self.enrichment_enabled {
                EnrichmentStatus::running(EnrichmentPhase::Calibrating)
            } else {
                EnrichmentStatus::idle()
            };
            (ticket, universe, published)
        };

        info!(
            seed = seed.value(),
            forced = force,
            generation = ticket.generation,
            climate = %universe.planet.climate,
            "universe generated"
        );
        // Having no subscribers is fine.
        let _ = self.events.send(UniverseEvent::Generated {
            seed,
            forced: force,
        });

        if self.enrichment_enabled {
            self.spawn_enrichment(ticket, universe);
        }

        (
            RefreshOutcome::Generated {
                seed,
                forced: force,
            },
            published,
        )
    }

    fn spawn_enrichment(&self, ticket: Ticket, universe: Universe) {
        let reporter = PhaseReporter {
            target: Some(ReporterTarget {
                state: Arc::clone(&self.state),
                events: self.events.clone(),
            }),
            ticket,
        };
        let request = EnrichmentRequest::new(universe);
        let pending = self.enricher.enrich(request, reporter);
        let timeout = self.request_timeout;
        let state = Arc::clone(&self.state);
        let events = self.events.clone();

        debug!(seed = ticket.seed.value(), generation = ticket.generation, "enrichment issued");

        tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, pending)
                    .await
                    .unwrap_or_else(|_elapsed| Err(EnrichmentFailure::Timeout(limit))),
                None => pending.await,
            };
            settle(&state, &events, ticket, result).await
        });
    }

    /// Route an enrichment completion for `ticket` through the merger.
    ///
    /// This is what the spawned enrichment task calls when the enricher
    /// resolves; it is public so replays and tests can inject results.
    pub async fn complete(
        &self,
        ticket: Ticket,
        result: Result<EnrichmentOverlay, EnrichmentFailure>,
    ) -> MergeOutcome {
        settle(&self.state, &self.events, ticket, result).await
    }

    /// Merge `overlay` onto the current universe if it is still the
    /// universe for `for_seed`.
    pub async fn apply(&self, for_seed: Seed, overlay: EnrichmentOverlay) -> MergeOutcome {
        let outcome = {
            let mut state = self.state.write().await;
            apply_enrichment(state.current.as_mut(), for_seed, overlay)
        };
        if outcome.is_applied() {
            let _ = self.events.send(UniverseEvent::Enriched { seed: for_seed });
        }
        outcome
    }

    /// Snapshot of the current universe, if one has been generated.
    pub async fn current(&self) -> Option<CurrentUniverse> {
        self.state.read().await.current.clone()
    }

    /// Snapshot of the enrichment progress.
    pub async fn status(&self) -> EnrichmentStatus {
        self.state.read().await.status.clone()
    }

    /// The seed seen by the last generating refresh.
    pub async fn last_observed_seed(&self) -> Option<Seed> {
        self.state.read().await.last_observed_seed
    }

    /// The most recently issued enrichment ticket.
    pub async fn latest_ticket(&self) -> Option<Ticket> {
        self.state.read().await.latest_ticket
    }

    /// The seed for the current wall-clock time.
    pub fn current_seed(&self) -> Seed {
        self.clock.current_seed(self.time.now_ms())
    }

    /// Countdown to the next epoch boundary as `MM:SS`.
    pub fn countdown(&self) -> String {
        self.clock.countdown(self.time.now_ms())
    }

    /// Time until the next epoch boundary.
    pub fn time_remaining(&self) -> Duration {
        self.clock.time_remaining(self.time.now_ms())
    }

    /// The epoch clock in use.
    pub const fn clock(&self) -> &EpochClock {
        &self.clock
    }

    /// Current wall-clock time from the controller's time source.
    pub fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    /// Subscribe to change events.
    pub fn subscribe(&self) -> broadcast::Receiver<UniverseEvent> {
        self.events.subscribe()
    }
}

/// Apply a completed enrichment result under the state lock.
async fn settle(
    state: &RwLock<SyncState>,
    events: &broadcast::Sender<UniverseEvent>,
    ticket: Ticket,
    result: Result<EnrichmentOverlay, EnrichmentFailure>,
) -> MergeOutcome {
    let seed = ticket.seed;
    let mut guard = state.write().await;

    match result {
        Ok(overlay) => {
            if guard.is_superseded(ticket) {
                debug!(
                    seed = seed.value(),
                    generation = ticket.generation,
                    "superseded enrichment discarded"
                );
                return MergeOutcome::Superseded;
            }

            let outcome = apply_enrichment(guard.current.as_mut(), seed, overlay);
            if guard.is_latest(ticket) {
                guard.status = EnrichmentStatus::idle();
            }
            drop(guard);

            if outcome.is_applied() {
                info!(seed = seed.value(), generation = ticket.generation, "enrichment merged");
                let _ = events.send(UniverseEvent::Enriched { seed });
            }
            outcome
        }
        Err(failure) => {
            let live = guard.is_latest(ticket);
            if live {
                guard.status = EnrichmentStatus::idle();
            }
            drop(guard);

            warn!(
                seed = seed.value(),
                generation = ticket.generation,
                error = %failure,
                "enrichment failed, keeping base universe"
            );
            if live {
                let _ = events.send(UniverseEvent::EnrichmentFailed {
                    seed,
                    reason: failure.to_string(),
                });
            }
            MergeOutcome::Skipped
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::future::BoxFuture;
    use tokio::sync::oneshot;

    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::enricher::NullEnricher;
    use crate::generator::DEFAULT_EPOCH_DURATION_MS;

    const EPOCH: u64 = DEFAULT_EPOCH_DURATION_MS;

    /// Counts calls and answers each with a description naming the seed.
    #[derive(Debug, Default)]
    struct CountingEnricher {
        calls: AtomicUsize,
    }

    impl Enricher for CountingEnricher {
        fn enrich(
            &self,
            request: EnrichmentRequest,
            phase: PhaseReporter,
        ) -> BoxFuture<'static, Result<EnrichmentOverlay, EnrichmentFailure>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                let _ = phase.report(EnrichmentPhase::ScanningCoordinates).await;
                Ok(EnrichmentOverlay {
                    description: Some(format!("world {}", request.seed)),
                    ..EnrichmentOverlay::default()
                })
            })
        }
    }

    /// Never resolves on its own; the test drives completion.
    #[derive(Debug, Default)]
    struct HeldEnricher {
        senders: std::sync::Mutex<Vec<oneshot::Sender<()>>>,
    }

    impl Enricher for HeldEnricher {
        fn enrich(
            &self,
            _request: EnrichmentRequest,
            _phase: PhaseReporter,
        ) -> BoxFuture<'static, Result<EnrichmentOverlay, EnrichmentFailure>> {
            let (tx, rx) = oneshot::channel();
            if let Ok(mut senders) = self.senders.lock() {
                senders.push(tx);
            }
            Box::pin(async move {
                let _ = rx.await;
                Err(EnrichmentFailure::Transport("released".to_owned()))
            })
        }
    }

    fn controller(
        now: u64,
        enricher: Arc<dyn Enricher>,
    ) -> (SynchronizationController, Arc<ManualTimeSource>) {
        let time = Arc::new(ManualTimeSource::new(now));
        let clock = EpochClock::new(EPOCH).unwrap();
        let controller = SynchronizationController::new(clock, time.clone(), enricher);
        (controller, time)
    }

    async fn next_settled(rx: &mut broadcast::Receiver<UniverseEvent>) -> UniverseEvent {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .unwrap()
                .unwrap();
            if matches!(
                event,
                UniverseEvent::Enriched { .. } | UniverseEvent::EnrichmentFailed { .. }
            ) {
                return event;
            }
        }
    }

    #[tokio::test]
    async fn nothing_current_before_first_refresh() {
        let (ctl, _) = controller(0, Arc::new(NullEnricher::default()));
        assert!(ctl.current().await.is_none());
        assert!(ctl.last_observed_seed().await.is_none());
        assert!(!ctl.status().await.in_progress);
    }

    #[tokio::test]
    async fn repeated_refresh_in_one_epoch_is_idempotent() {
        let enricher = Arc::new(CountingEnricher::default());
        let (ctl, time) = controller(5 * EPOCH + 10, enricher.clone());
        let mut rx = ctl.subscribe();

        let first = ctl.refresh(false).await;
        assert_eq!(first, RefreshOutcome::Generated { seed: Seed::new(5), forced: false });
        let _ = next_settled(&mut rx).await;

        time.advance(1_000);
        let second = ctl.refresh(false).await;
        assert_eq!(second, RefreshOutcome::Unchanged { seed: Seed::new(5) });
        assert_eq!(enricher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refresh_snapshot_belongs_to_the_returned_seed() {
        let (ctl, time) = controller(5 * EPOCH, Arc::new(NullEnricher::default()));
        let ctl = ctl.with_enrichment(false);

        let (outcome, current) = ctl.refresh_snapshot(false).await;
        assert!(outcome.generated());
        assert_eq!(current.unwrap().seed(), outcome.seed());

        let (outcome, current) = ctl.refresh_snapshot(false).await;
        assert_eq!(outcome, RefreshOutcome::Unchanged { seed: Seed::new(5) });
        assert_eq!(current.unwrap().seed(), Seed::new(5));

        // A later refresh moves the controller on without touching the
        // snapshot already handed out.
        time.set(6 * EPOCH);
        let (outcome, forced) = ctl.refresh_snapshot(true).await;
        assert_eq!(outcome.seed(), Seed::new(6));
        let forced = forced.unwrap();
        ctl.refresh(true).await;
        assert_eq!(forced.seed(), Seed::new(6));
        assert_eq!(forced.id(), "UNI-6");
    }

    #[tokio::test]
    async fn epoch_advance_generates_and_enriches() {
        let enricher = Arc::new(CountingEnricher::default());
        let (ctl, time) = controller(5 * EPOCH, enricher.clone());
        let mut rx = ctl.subscribe();

        let _ = ctl.refresh(false).await;
        let _ = next_settled(&mut rx).await;

        time.set(6 * EPOCH);
        assert!(ctl.refresh(false).await.generated());
        let event = next_settled(&mut rx).await;
        assert_eq!(event, UniverseEvent::Enriched { seed: Seed::new(6) });

        let current = ctl.current().await.unwrap();
        assert_eq!(current.seed(), Seed::new(6));
        assert_eq!(current.overlay.description.as_deref(), Some("world 6"));
        assert_eq!(enricher.calls.load(Ordering::SeqCst), 2);
        assert!(!ctl.status().await.in_progress);
    }

    #[tokio::test]
    async fn forced_refresh_regenerates_identically_and_reenriches() {
        let enricher = Arc::new(CountingEnricher::default());
        let (ctl, _) = controller(5 * EPOCH, enricher.clone());
        let mut rx = ctl.subscribe();

        let _ = ctl.refresh(false).await;
        let _ = next_settled(&mut rx).await;
        let before = ctl.current().await.unwrap().universe;

        let outcome = ctl.refresh(true).await;
        assert_eq!(outcome, RefreshOutcome::Generated { seed: Seed::new(5), forced: true });
        assert_eq!(ctl.current().await.unwrap().universe, before);
        let _ = next_settled(&mut rx).await;
        assert_eq!(enricher.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn base_is_published_before_enrichment_and_overlay_cleared() {
        let (ctl, _) = controller(5 * EPOCH, Arc::new(HeldEnricher::default()));
        let _ = ctl.refresh(false).await;
        let ticket = ctl.latest_ticket().await.unwrap();
        let _ = ctl
            .complete(
                ticket,
                Ok(EnrichmentOverlay {
                    location: Some("Sector-9".to_owned()),
                    ..EnrichmentOverlay::default()
                }),
            )
            .await;
        assert!(ctl.current().await.unwrap().overlay.location.is_some());

        // A forced refresh publishes the bare base again.
        let _ = ctl.refresh(true).await;
        let current = ctl.current().await.unwrap();
        assert!(current.overlay.is_empty());
        let status = ctl.status().await;
        assert!(status.in_progress);
        assert_eq!(status.phase, EnrichmentPhase::Calibrating);
    }

    #[tokio::test]
    async fn stale_result_is_ignored_and_fresh_result_applied() {
        let (ctl, time) = controller(4 * EPOCH, Arc::new(HeldEnricher::default()));
        let _ = ctl.refresh(false).await;
        let stale_ticket = ctl.latest_ticket().await.unwrap();
        assert_eq!(stale_ticket.seed, Seed::new(4));

        time.set(5 * EPOCH);
        let _ = ctl.refresh(false).await;
        let fresh_ticket = ctl.latest_ticket().await.unwrap();
        let before = ctl.current().await.unwrap();
        assert_eq!(before.seed(), Seed::new(5));

        let stale = EnrichmentOverlay {
            description: Some("from seed 4".to_owned()),
            ..EnrichmentOverlay::default()
        };
        assert_eq!(ctl.complete(stale_ticket, Ok(stale)).await, MergeOutcome::Stale);
        assert_eq!(ctl.current().await.unwrap(), before);

        let fresh = EnrichmentOverlay {
            description: Some("from seed 5".to_owned()),
            ..EnrichmentOverlay::default()
        };
        assert_eq!(ctl.complete(fresh_ticket, Ok(fresh)).await, MergeOutcome::Applied);
        let after = ctl.current().await.unwrap();
        assert_eq!(after.overlay.description.as_deref(), Some("from seed 5"));
        assert_eq!(after.universe, before.universe);
    }

    #[tokio::test]
    async fn apply_checks_the_current_seed() {
        let (ctl, _) = controller(5 * EPOCH, Arc::new(HeldEnricher::default()));
        let _ = ctl.refresh(false).await;

        let overlay = EnrichmentOverlay {
            anomalies: Some(vec!["Time loops at dusk".to_owned()]),
            ..EnrichmentOverlay::default()
        };
        assert_eq!(ctl.apply(Seed::new(4), overlay.clone()).await, MergeOutcome::Stale);
        assert!(ctl.current().await.unwrap().overlay.is_empty());
        assert_eq!(ctl.apply(Seed::new(5), overlay).await, MergeOutcome::Applied);
        assert!(ctl.current().await.unwrap().overlay.anomalies.is_some());
    }

    #[tokio::test]
    async fn superseded_same_seed_result_is_ignored() {
        let (ctl, _) = controller(5 * EPOCH, Arc::new(HeldEnricher::default()));
        let _ = ctl.refresh(false).await;
        let older = ctl.latest_ticket().await.unwrap();
        let _ = ctl.refresh(true).await;
        let newer = ctl.latest_ticket().await.unwrap();
        assert_eq!(older.seed, newer.seed);
        assert_ne!(older.generation, newer.generation);

        let late = EnrichmentOverlay {
            description: Some("late".to_owned()),
            ..EnrichmentOverlay::default()
        };
        assert_eq!(ctl.complete(older, Ok(late)).await, MergeOutcome::Superseded);
        assert!(ctl.current().await.unwrap().overlay.is_empty());
        // The newer request is still in flight.
        assert!(ctl.status().await.in_progress);
    }

    #[tokio::test]
    async fn failure_clears_progress_and_keeps_base() {
        let (ctl, _) = controller(7 * EPOCH, Arc::new(NullEnricher::default()));
        let mut rx = ctl.subscribe();
        let _ = ctl.refresh(false).await;

        let event = next_settled(&mut rx).await;
        assert!(matches!(event, UniverseEvent::EnrichmentFailed { seed, .. } if seed == Seed::new(7)));
        let current = ctl.current().await.unwrap();
        assert_eq!(current.seed(), Seed::new(7));
        assert!(current.overlay.is_empty());
        assert!(!ctl.status().await.in_progress);
    }

    #[tokio::test]
    async fn stale_failure_does_not_clear_live_progress() {
        let (ctl, time) = controller(4 * EPOCH, Arc::new(HeldEnricher::default()));
        let _ = ctl.refresh(false).await;
        let old = ctl.latest_ticket().await.unwrap();
        time.set(5 * EPOCH);
        let _ = ctl.refresh(false).await;

        let outcome = ctl
            .complete(old, Err(EnrichmentFailure::Transport("reset".to_owned())))
            .await;
        assert_eq!(outcome, MergeOutcome::Skipped);
        assert!(ctl.status().await.in_progress);
    }

    #[tokio::test]
    async fn timeout_counts_as_failure() {
        let (ctl, _) = controller(2 * EPOCH, Arc::new(HeldEnricher::default()));
        let ctl = ctl.with_request_timeout(Duration::from_millis(20));
        let mut rx = ctl.subscribe();
        let _ = ctl.refresh(false).await;

        match next_settled(&mut rx).await {
            UniverseEvent::EnrichmentFailed { reason, .. } => {
                assert!(reason.contains("timed out"), "{reason}");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn disabled_enrichment_never_calls_enricher() {
        let enricher = Arc::new(CountingEnricher::default());
        let (ctl, _) = controller(EPOCH, enricher.clone());
        let ctl = ctl.with_enrichment(false);
        assert!(ctl.refresh(false).await.generated());
        assert!(!ctl.status().await.in_progress);
        assert_eq!(enricher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn phase_updates_only_for_live_ticket() {
        let (ctl, time) = controller(4 * EPOCH, Arc::new(HeldEnricher::default()));
        let _ = ctl.refresh(false).await;
        let old = ctl.latest_ticket().await.unwrap();
        let stale_reporter = PhaseReporter {
            target: Some(ReporterTarget {
                state: Arc::clone(&ctl.state),
                events: ctl.events.clone(),
            }),
            ticket: old,
        };

        time.set(5 * EPOCH);
        let _ = ctl.refresh(false).await;
        assert!(!stale_reporter.report(EnrichmentPhase::RenderingVisuals).await);
        assert_eq!(ctl.status().await.phase, EnrichmentPhase::Calibrating);

        let live = PhaseReporter {
            ticket: ctl.latest_ticket().await.unwrap(),
            ..stale_reporter
        };
        assert!(live.report(EnrichmentPhase::RenderingVisuals).await);
        assert_eq!(ctl.status().await.label, "Rendering visual data...");
        assert!(!PhaseReporter::noop().report(EnrichmentPhase::Idle).await);
    }

    #[tokio::test]
    async fn countdown_reads_time_source() {
        let (ctl, _) = controller(EPOCH - 1_000, Arc::new(NullEnricher::default()));
        assert_eq!(ctl.countdown(), "00:01");
        assert_eq!(ctl.current_seed(), Seed::new(0));
    }
}
