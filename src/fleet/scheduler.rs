use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{interval, MissedTickBehavior};
use utoipa::ToSchema;

use crate::missions::MissionIndex;
use crate::propagation::{OrbitalElements, PropagationError, Propagator};
use crate::store::{self, Collection, Store};
use crate::zones::ZoneResolver;

use super::error::SchedulerError;
use super::live::compute_live_feature;

/// Reference data every pass reads. Built once before the first tick.
#[derive(Debug, Default)]
pub struct FleetContext {
    pub satellites: Vec<OrbitalElements>,
    pub zones: ZoneResolver,
    pub missions: MissionIndex,
}

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub tick: Duration,
    pub satellite_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            satellite_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SchedulerMode {
    Idle,
    Propagating { started: DateTime<Utc> },
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SatelliteFailure {
    pub satellite_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PassReport {
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub published: usize,
    pub failed: Vec<SatelliteFailure>,
    pub store_errors: usize,
    /// Ticks that came due while this pass was running and were dropped.
    pub skipped_ticks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SchedulerStatus {
    pub mode: SchedulerMode,
    pub passes: u64,
    pub last_pass: Option<PassReport>,
}

#[derive(Debug)]
struct Shared {
    status: SchedulerStatus,
}

/// Read-only view of the scheduler status, cheap to clone.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    shared: Arc<StdMutex<Shared>>,
}

impl StatusHandle {
    pub fn status(&self) -> SchedulerStatus {
        self.shared.lock().unwrap().status.clone()
    }
}

#[derive(Debug)]
struct WorkerHandle {
    stop_tx: oneshot::Sender<()>,
    join: JoinHandle<()>,
}

#[derive(Clone)]
struct PassRunner {
    store: Arc<dyn Store>,
    propagator: Arc<dyn Propagator>,
    context: Arc<FleetContext>,
    satellite_timeout: Duration,
    in_flight: Arc<StdMutex<HashSet<String>>>,
}

/// Marks a satellite's computation as running until dropped.
struct InFlightGuard {
    set: Arc<StdMutex<HashSet<String>>>,
    satellite_id: String,
}

impl InFlightGuard {
    fn acquire(set: &Arc<StdMutex<HashSet<String>>>, satellite_id: &str) -> Option<Self> {
        if !set.lock().unwrap().insert(satellite_id.to_string()) {
            return None;
        }
        Some(Self {
            set: Arc::clone(set),
            satellite_id: satellite_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.satellite_id);
        }
    }
}

/// Periodically propagates the whole fleet and republishes `SATPOS`.
///
/// One timer tick drives exactly one pass. Ticks that fall due while a pass
/// is still running are skipped, so passes never overlap.
pub struct FleetScheduler {
    runner: PassRunner,
    tick: Duration,
    shared: Arc<StdMutex<Shared>>,
    worker: Option<WorkerHandle>,
}

impl FleetScheduler {
    pub fn new(
        store: Arc<dyn Store>,
        propagator: Arc<dyn Propagator>,
        context: Arc<FleetContext>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            runner: PassRunner {
                store,
                propagator,
                context,
                satellite_timeout: config.satellite_timeout,
                in_flight: Arc::default(),
            },
            tick: config.tick,
            shared: Arc::new(StdMutex::new(Shared {
                status: SchedulerStatus {
                    mode: SchedulerMode::Idle,
                    passes: 0,
                    last_pass: None,
                },
            })),
            worker: None,
        }
    }

    pub fn status_handle(&self) -> StatusHandle {
        StatusHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Runs a single pass at `now` without touching the timer.
    pub async fn run_pass(&self, now: DateTime<Utc>) -> PassReport {
        self.runner.run(now).await
    }

    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let join = tokio::spawn(run_scheduler_loop(
            self.runner.clone(),
            Arc::clone(&self.shared),
            self.tick,
            stop_rx,
        ));
        self.worker = Some(WorkerHandle { stop_tx, join });

        log::info!(
            "Fleet scheduler started ({} satellites, {} zones, tick {:?})",
            self.runner.context.satellites.len(),
            self.runner.context.zones.len(),
            self.tick
        );
        Ok(())
    }

    /// Stops after the pass in progress, if any, has finished.
    pub async fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.stop_tx.send(());
            if let Err(e) = worker.join.await {
                log::error!("Fleet scheduler task failed: {}", e);
            }
        }
        let mut locked = self.shared.lock().unwrap();
        locked.status.mode = SchedulerMode::Idle;
    }
}

async fn run_scheduler_loop(
    runner: PassRunner,
    shared: Arc<StdMutex<Shared>>,
    tick: Duration,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let should_stop = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if should_stop {
            break;
        }

        let started = Utc::now();
        {
            let mut locked = shared.lock().unwrap();
            locked.status.mode = SchedulerMode::Propagating { started };
        }

        let mut report = runner.run(started).await;
        let elapsed = (report.finished - report.started)
            .to_std()
            .unwrap_or_default();
        report.skipped_ticks = (elapsed.as_nanos() / tick.as_nanos().max(1)) as u64;

        if report.failed.is_empty() && report.store_errors == 0 {
            log::debug!(
                "Fleet pass published {} satellites in {:?}",
                report.published,
                elapsed
            );
        } else {
            log::warn!(
                "Fleet pass published {} satellites, {} failed, {} store errors",
                report.published,
                report.failed.len(),
                report.store_errors
            );
        }
        if report.skipped_ticks > 0 {
            log::warn!(
                "Fleet pass took {:?}, skipping {} tick(s)",
                elapsed,
                report.skipped_ticks
            );
        }

        let mut locked = shared.lock().unwrap();
        locked.status.mode = SchedulerMode::Idle;
        locked.status.passes += 1;
        locked.status.last_pass = Some(report);
    }

    let mut locked = shared.lock().unwrap();
    locked.status.mode = SchedulerMode::Idle;
}

enum Outcome {
    Published,
    Failed(PropagationError),
    StoreFailed(String),
}

impl PassRunner {
    async fn run(&self, now: DateTime<Utc>) -> PassReport {
        let started = Utc::now();
        let mut tasks = JoinSet::new();

        for elements in self.context.satellites.iter().cloned() {
            let runner = self.clone();
            tasks.spawn(async move {
                let id = elements.satellite_id.clone();
                let outcome = runner.publish(elements, now).await;
                (id, outcome)
            });
        }

        let mut report = PassReport {
            started,
            finished: started,
            published: 0,
            failed: Vec::new(),
            store_errors: 0,
            skipped_ticks: 0,
        };

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Outcome::Published)) => report.published += 1,
                Ok((id, Outcome::Failed(e))) => {
                    log::warn!("Skipping {} this pass: {}", id, e);
                    report.failed.push(SatelliteFailure {
                        satellite_id: id,
                        reason: e.to_string(),
                    });
                }
                Ok((id, Outcome::StoreFailed(e))) => {
                    log::warn!("Failed to publish {}: {}", id, e);
                    report.store_errors += 1;
                }
                Err(e) => log::error!("Fleet pass task failed: {}", e),
            }
        }

        report.failed.sort_by(|a, b| a.satellite_id.cmp(&b.satellite_id));
        report.finished = Utc::now();
        report
    }

    async fn publish(&self, elements: OrbitalElements, now: DateTime<Utc>) -> Outcome {
        let id = elements.satellite_id.clone();
        let propagator = Arc::clone(&self.propagator);
        let context = Arc::clone(&self.context);

        // At most one blocking thread per satellite, even after a timeout.
        let Some(guard) = InFlightGuard::acquire(&self.in_flight, &id) else {
            return Outcome::Failed(PropagationError::StillRunning(id));
        };

        let work = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            compute_live_feature(
                &elements,
                now,
                propagator.as_ref(),
                &context.zones,
                &context.missions,
            )
        });

        // A timed-out computation keeps its blocking thread and guard but never writes.
        let feature = match tokio::time::timeout(self.satellite_timeout, work).await {
            Ok(Ok(Ok(feature))) => feature,
            Ok(Ok(Err(e))) => return Outcome::Failed(e),
            Ok(Err(e)) => {
                return Outcome::Failed(PropagationError::Task {
                    satellite: id,
                    message: e.to_string(),
                })
            }
            Err(_) => return Outcome::Failed(PropagationError::Timeout(id)),
        };

        match store::put_json(self.store.as_ref(), Collection::SatPos, &id, &feature) {
            Ok(()) => Outcome::Published,
            Err(e) => Outcome::StoreFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::test_support::{elements, index, resolver, Behaviour, FixedPropagator};
    use crate::fleet::LiveSatelliteFeature;
    use crate::store::MemoryStore;
    use std::sync::atomic::Ordering;

    fn context(satellites: &[&str]) -> Arc<FleetContext> {
        Arc::new(FleetContext {
            satellites: satellites.iter().map(|id| elements(id)).collect(),
            zones: resolver(),
            missions: index(satellites),
        })
    }

    fn memory_store() -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store.ensure_schema().unwrap();
        store
    }

    fn scheduler(
        store: Arc<MemoryStore>,
        propagator: Arc<FixedPropagator>,
        satellites: &[&str],
        config: SchedulerConfig,
    ) -> FleetScheduler {
        FleetScheduler::new(store, propagator, context(satellites), config)
    }

    #[tokio::test]
    async fn pass_publishes_every_satellite() {
        let store = memory_store();
        let propagator = Arc::new(
            FixedPropagator::default()
                .with("M001", Behaviour::At(5.0))
                .with("M003", Behaviour::At(120.0))
                .with("M006", Behaviour::At(200.0)),
        );
        let scheduler = scheduler(
            store.clone(),
            propagator,
            &["M001", "M003", "M006"],
            SchedulerConfig::default(),
        );

        let report = scheduler.run_pass(Utc::now()).await;
        assert_eq!(report.published, 3);
        assert!(report.failed.is_empty());

        let m001: LiveSatelliteFeature =
            store::get_json(store.as_ref(), Collection::SatPos, "M001")
                .unwrap()
                .unwrap();
        assert_eq!(m001.zones, ["Z1"]);
        assert_eq!(m001.missions.len(), 1);
        assert_eq!(m001.missions[0].id, "Z1");
        assert!((m001.geometry.coordinates[0] - 5.0).abs() < 1e-9);

        let m003: LiveSatelliteFeature =
            store::get_json(store.as_ref(), Collection::SatPos, "M003")
                .unwrap()
                .unwrap();
        assert_eq!(m003.missions[0].id, "Z2");

        let m006: LiveSatelliteFeature =
            store::get_json(store.as_ref(), Collection::SatPos, "M006")
                .unwrap()
                .unwrap();
        assert!(m006.missions.is_empty());
    }

    #[tokio::test]
    async fn failing_satellite_is_skipped_and_keeps_stale_record() {
        let store = memory_store();
        store
            .put(Collection::SatPos, "M002", b"{\"stale\":true}")
            .unwrap();
        let propagator = Arc::new(
            FixedPropagator::default()
                .with("M001", Behaviour::At(5.0))
                .with("M002", Behaviour::Fail),
        );
        let scheduler = scheduler(
            store.clone(),
            propagator,
            &["M001", "M002"],
            SchedulerConfig::default(),
        );

        let report = scheduler.run_pass(Utc::now()).await;
        assert_eq!(report.published, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].satellite_id, "M002");
        assert_eq!(
            store.get(Collection::SatPos, "M002").unwrap(),
            Some(b"{\"stale\":true}".to_vec())
        );
    }

    #[tokio::test]
    async fn stuck_satellite_times_out_without_stalling_the_pass() {
        let store = memory_store();
        let propagator = Arc::new(
            FixedPropagator::default()
                .with("M001", Behaviour::At(5.0))
                .with("M002", Behaviour::Slow(Duration::from_millis(400), 10.0)),
        );
        let scheduler = scheduler(
            store.clone(),
            propagator,
            &["M001", "M002"],
            SchedulerConfig {
                tick: Duration::from_secs(1),
                satellite_timeout: Duration::from_millis(50),
            },
        );

        let report = scheduler.run_pass(Utc::now()).await;
        assert_eq!(report.published, 1);
        assert_eq!(
            report.failed,
            vec![SatelliteFailure {
                satellite_id: "M002".into(),
                reason: PropagationError::Timeout("M002".into()).to_string(),
            }]
        );
        assert!((report.finished - report.started).num_milliseconds() < 400);
        assert_eq!(store.get(Collection::SatPos, "M002").unwrap(), None);
    }

    #[test]
    fn stuck_satellite_holds_a_single_blocking_thread() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .max_blocking_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let store = memory_store();
        let propagator = Arc::new(
            FixedPropagator::default()
                .with("M001", Behaviour::At(5.0))
                .with("M002", Behaviour::Slow(Duration::from_secs(1), 10.0)),
        );
        let scheduler = scheduler(
            store,
            propagator.clone(),
            &["M001", "M002"],
            SchedulerConfig {
                tick: Duration::from_secs(1),
                satellite_timeout: Duration::from_millis(100),
            },
        );

        let reports = runtime.block_on(async {
            let mut reports = Vec::new();
            for _ in 0..4 {
                reports.push(scheduler.run_pass(Utc::now()).await);
            }
            reports
        });
        runtime.shutdown_timeout(Duration::from_millis(10));

        for report in &reports {
            assert_eq!(report.published, 1);
            assert_eq!(report.failed.len(), 1);
            assert_eq!(report.failed[0].satellite_id, "M002");
        }
        assert_eq!(
            reports[0].failed[0].reason,
            PropagationError::Timeout("M002".into()).to_string()
        );
        for report in &reports[1..] {
            assert_eq!(
                report.failed[0].reason,
                PropagationError::StillRunning("M002".into()).to_string()
            );
        }
        // M001 once per pass, M002 only on the first pass.
        assert_eq!(propagator.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn store_errors_do_not_abort_the_pass() {
        let store = Arc::new(MemoryStore::new());
        let propagator = Arc::new(
            FixedPropagator::default()
                .with("M001", Behaviour::At(5.0))
                .with("M003", Behaviour::At(6.0)),
        );
        let scheduler = scheduler(store, propagator, &["M001", "M003"], SchedulerConfig::default());

        let report = scheduler.run_pass(Utc::now()).await;
        assert_eq!(report.published, 0);
        assert_eq!(report.store_errors, 2);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn published_record_reads_back_byte_identical() {
        let store = memory_store();
        let propagator = Arc::new(FixedPropagator::default().with("M001", Behaviour::At(5.0)));
        let scheduler = scheduler(
            store.clone(),
            propagator,
            &["M001"],
            SchedulerConfig::default(),
        );
        scheduler.run_pass(Utc::now()).await;

        let bytes = store.get(Collection::SatPos, "M001").unwrap().unwrap();
        let feature: LiveSatelliteFeature = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(serde_json::to_vec(&feature).unwrap(), bytes);
        assert_eq!(store.get(Collection::SatPos, "M001").unwrap().unwrap(), bytes);
    }

    #[tokio::test]
    async fn start_and_stop() {
        let store = memory_store();
        let propagator = Arc::new(FixedPropagator::default().with("M001", Behaviour::At(5.0)));
        let mut scheduler = scheduler(
            store.clone(),
            propagator,
            &["M001"],
            SchedulerConfig {
                tick: Duration::from_millis(20),
                satellite_timeout: Duration::from_secs(1),
            },
        );

        scheduler.start().unwrap();
        assert!(matches!(scheduler.start(), Err(SchedulerError::AlreadyRunning)));
        tokio::time::sleep(Duration::from_millis(150)).await;
        scheduler.stop().await;

        let status = scheduler.status_handle().status();
        assert_eq!(status.mode, SchedulerMode::Idle);
        assert!(status.passes >= 2, "passes {}", status.passes);
        assert_eq!(status.last_pass.unwrap().published, 1);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.status_handle().status().passes, status.passes);
        assert!(store.get(Collection::SatPos, "M001").unwrap().is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn slow_passes_never_overlap() {
        let store = memory_store();
        let propagator = Arc::new(
            FixedPropagator::default()
                .with("M001", Behaviour::Slow(Duration::from_millis(60), 5.0)),
        );
        let mut scheduler = scheduler(
            store,
            propagator.clone(),
            &["M001"],
            SchedulerConfig {
                tick: Duration::from_millis(10),
                satellite_timeout: Duration::from_secs(1),
            },
        );

        scheduler.start().unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.stop().await;

        let status = scheduler.status_handle().status();
        assert_eq!(propagator.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(
            propagator.calls.load(Ordering::SeqCst) as u64,
            status.passes
        );
        assert!(status.passes < 10, "passes {}", status.passes);
        assert!(status.last_pass.unwrap().skipped_ticks >= 1);
    }
}
