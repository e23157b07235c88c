//! Fixed-rate tracking loop
//!
//! Each tick propagates the whole catalog against one shared time basis,
//! refreshes the selected object's telemetry and orbit ring, and publishes
//! the result as a single immutable snapshot. Consumers read the latest
//! snapshot from a watch channel at their own pace.

use crate::config::SchedulerConfig;
use crate::orbital::{PropagationAdapter, Propagator, Sgp4Propagator, TimeBasis};
use crate::tle::Catalog;
use crate::tracking::orbit_path::OrbitPathProjector;
use crate::tracking::types::{
    OrbitPath, SelectedTelemetry, TrackedObjectPosition, TrackingSnapshot, TrackingStatus,
};
use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// No catalog installed yet
    Uninitialized,
    /// Catalog installed, loop not started
    Idle,
    Running,
    Stopped,
}

/// Handle for the visualization surface to pick or clear the tracked object
#[derive(Clone)]
pub struct SelectionControl {
    tx: Arc<watch::Sender<Option<String>>>,
}

impl SelectionControl {
    pub fn select(&self, name: impl Into<String>) {
        self.tx.send_replace(Some(name.into()));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    pub fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }
}

pub struct TrackingScheduler<P = Sgp4Propagator> {
    config: SchedulerConfig,
    state: SchedulerState,
    catalog: Option<Arc<Catalog>>,
    adapter: PropagationAdapter<P>,
    projector: OrbitPathProjector,
    selection_tx: Arc<watch::Sender<Option<String>>>,
    selection_rx: watch::Receiver<Option<String>>,
    snapshot_tx: watch::Sender<Arc<TrackingSnapshot>>,
    /// Selection the telemetry and ring below belong to
    tracked: Option<String>,
    telemetry: Option<TrackedObjectPosition>,
    orbit_path: Option<OrbitPath>,
    ticks: u64,
}

impl TrackingScheduler<Sgp4Propagator> {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_propagator(config, Sgp4Propagator)
    }
}

impl<P: Propagator> TrackingScheduler<P> {
    pub fn with_propagator(config: SchedulerConfig, propagator: P) -> Self {
        let (selection_tx, selection_rx) = watch::channel(None);
        let (snapshot_tx, _) = watch::channel(Arc::new(TrackingSnapshot::with_status(
            TrackingStatus::AwaitingCatalog,
            0,
        )));
        let projector = OrbitPathProjector::new(config.orbit_path_samples);
        Self {
            config,
            state: SchedulerState::Uninitialized,
            catalog: None,
            adapter: PropagationAdapter::new(propagator),
            projector,
            selection_tx: Arc::new(selection_tx),
            selection_rx,
            snapshot_tx,
            tracked: None,
            telemetry: None,
            orbit_path: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Hand over the catalog; allowed once
    pub fn install_catalog(&mut self, catalog: Arc<Catalog>) -> Result<()> {
        if self.state != SchedulerState::Uninitialized {
            bail!("catalog already installed (state {:?})", self.state);
        }
        info!(
            "[TRACKER] catalog installed: {} objects from {:?}",
            catalog.len(),
            catalog.source
        );
        self.catalog = Some(catalog);
        self.state = SchedulerState::Idle;
        Ok(())
    }

    pub fn selection(&self) -> SelectionControl {
        SelectionControl {
            tx: Arc::clone(&self.selection_tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<TrackingSnapshot>> {
        self.snapshot_tx.subscribe()
    }

    pub fn latest(&self) -> Arc<TrackingSnapshot> {
        Arc::clone(&self.snapshot_tx.borrow())
    }

    /// Run one tick for `instant` and publish its snapshot
    pub fn tick_at(&mut self, instant: DateTime<Utc>) -> Arc<TrackingSnapshot> {
        self.ticks += 1;
        let snapshot = Arc::new(self.compute(instant));
        self.snapshot_tx.send_replace(Arc::clone(&snapshot));
        snapshot
    }

    fn compute(&mut self, instant: DateTime<Utc>) -> TrackingSnapshot {
        let Some(catalog) = self.catalog.clone() else {
            return TrackingSnapshot::with_status(TrackingStatus::AwaitingCatalog, self.ticks);
        };
        if catalog.is_empty() {
            return TrackingSnapshot::with_status(TrackingStatus::NoObjectsAvailable, self.ticks);
        }

        let selection = self.selection_rx.borrow_and_update().clone();
        if selection != self.tracked {
            match &selection {
                Some(name) => info!("[TRACKER] selected {}", name),
                None => info!("[TRACKER] selection cleared"),
            }
            self.tracked = selection.clone();
            self.telemetry = None;
            self.orbit_path = None;
        }
        // Names may repeat; the selection always means the first catalog entry
        let selected_set = selection.as_deref().and_then(|name| catalog.find(name));

        let basis = TimeBasis::at(instant);
        let mut selected_position = None;
        let positions: Vec<TrackedObjectPosition> = catalog
            .iter()
            .filter_map(|set| {
                let sample = self.adapter.propagate_with_basis(set, instant, basis)?;
                let position = TrackedObjectPosition::new(set, sample);
                if selected_set.is_some_and(|selected| std::ptr::eq(selected, set)) {
                    selected_position = Some(position.clone());
                }
                Some(position)
            })
            .collect();
        let omitted = catalog.len() - positions.len();
        if omitted > 0 {
            debug!("[TRACKER] tick={} omitted {} objects", self.ticks, omitted);
        }

        let mut stale = false;
        if let Some(set) = selected_set {
            match selected_position {
                Some(position) => {
                    self.telemetry = Some(position);
                    self.orbit_path = self.projector.project(&self.adapter, set, basis);
                }
                // Keep last known values; no ring update this tick
                None => stale = self.telemetry.is_some(),
            }
        }

        TrackingSnapshot {
            status: TrackingStatus::Tracking,
            tick: self.ticks,
            basis: Some(basis),
            positions,
            selection,
            telemetry: self
                .telemetry
                .clone()
                .map(|position| SelectedTelemetry { position, stale }),
            orbit_path: self.orbit_path.clone(),
        }
    }
}

impl<P: Propagator + Send + 'static> TrackingScheduler<P> {
    /// Start ticking on the configured period. Requires an installed catalog.
    pub fn start(mut self) -> Result<TrackerHandle<P>> {
        if self.state != SchedulerState::Idle {
            bail!("cannot start tracker in state {:?}", self.state);
        }
        self.state = SchedulerState::Running;

        let period = self.config.tick_interval();
        let selection = self.selection();
        let snapshots = self.subscribe();
        let token = CancellationToken::new();
        let cancel = token.clone();

        info!("[TRACKER] started, period={:?}", period);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {
                        self.tick_at(Utc::now());
                    }
                }
            }
            self.state = SchedulerState::Stopped;
            info!("[TRACKER] stopped after {} ticks", self.ticks);
            self
        });

        Ok(TrackerHandle {
            token,
            task,
            selection,
            snapshots,
        })
    }
}

/// Running tracker
pub struct TrackerHandle<P = Sgp4Propagator> {
    token: CancellationToken,
    task: JoinHandle<TrackingScheduler<P>>,
    selection: SelectionControl,
    snapshots: watch::Receiver<Arc<TrackingSnapshot>>,
}

impl<P> TrackerHandle<P> {
    pub fn selection(&self) -> SelectionControl {
        self.selection.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<TrackingSnapshot>> {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Arc<TrackingSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// Stop scheduling ticks; an in-flight tick finishes first
    pub async fn stop(self) -> Result<TrackingScheduler<P>> {
        self.token.cancel();
        self.task
            .await
            .map_err(|e| anyhow!("tracker task failed: {e}"))
    }
}
