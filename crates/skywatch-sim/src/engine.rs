//! The simulation engine and its background tick driver.
//!
//! `SimulationEngine` shares an `Arc<EngineCore>` with the driver
//! thread. The store sits behind a single mutex, giving every consumer
//! the same total ordering of mutations; spawn and destroy requests go
//! through queues drained only at step boundaries so the entity map is
//! never mutated mid-iteration.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use tracing::{debug, info};

use skywatch_core::commands::{SpawnProps, SpawnRequest};
use skywatch_core::constants::{
    DETECTION_INTERVAL, DT, MAX_FRAME_TIME, PERF_WINDOW, TICK_RATE,
};
use skywatch_core::enums::EntityKind;
use skywatch_core::state::{PerfStats, WorldSnapshot};

use crate::scenario;
use crate::store::WorldStore;
use crate::systems;

/// Configuration for a new engine.
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial speed multiplier (1.0 = real time).
    pub speed: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            speed: 1.0,
        }
    }
}

/// Rolling window of step durations plus a steps-per-wall-second counter.
#[derive(Default)]
struct PerfTracker {
    window: VecDeque<f64>,
    fps: f64,
    steps_this_second: u32,
    last_sample: Option<Instant>,
}

impl PerfTracker {
    fn record(&mut self, step_duration: Duration) {
        self.window.push_back(step_duration.as_secs_f64() * 1000.0);
        while self.window.len() > PERF_WINDOW {
            self.window.pop_front();
        }
        self.steps_this_second += 1;
        let now = Instant::now();
        match self.last_sample {
            None => self.last_sample = Some(now),
            Some(since) => {
                let elapsed = now.duration_since(since).as_secs_f64();
                if elapsed >= 1.0 {
                    self.fps = self.steps_this_second as f64 / elapsed;
                    self.steps_this_second = 0;
                    self.last_sample = Some(now);
                }
            }
        }
    }

    fn avg_ms(&self) -> f64 {
        if self.window.is_empty() {
            0.0
        } else {
            self.window.iter().sum::<f64>() / self.window.len() as f64
        }
    }

    fn max_ms(&self) -> f64 {
        self.window.iter().copied().fold(0.0, f64::max)
    }

    fn reset(&mut self) {
        self.window.clear();
        self.fps = 0.0;
        self.steps_this_second = 0;
        self.last_sample = None;
    }
}

/// State shared between the engine handle and the driver thread.
pub(crate) struct EngineCore {
    store: Mutex<WorldStore>,
    spawn_queue: Mutex<VecDeque<SpawnRequest>>,
    destroy_queue: Mutex<VecDeque<String>>,
    rng: Mutex<ChaCha8Rng>,
    running: AtomicBool,
    paused: AtomicBool,
    perf: Mutex<PerfTracker>,
    /// Simulated seconds since the last detection sweep. Seeded at the
    /// interval so the first step after creation or start sweeps.
    detection_accum: Mutex<f64>,
}

impl EngineCore {
    /// Advance the simulation by one step. `dt` is the nominal frame
    /// time; the effective timestep applied to entities and the clock is
    /// `dt * speed`, so raising the multiplier compresses simulated time
    /// without changing the step cadence.
    fn step(&self, dt: f64) {
        let started = Instant::now();

        if !self.paused.load(Ordering::SeqCst) {
            let mut store = self.store.lock().unwrap();
            let mut rng = self.rng.lock().unwrap();
            let effective_dt = dt * store.clock().speed;

            self.drain_spawns(&mut store, &mut rng);
            systems::behavior::run(&mut store, &mut rng, effective_dt);
            if self.detection_due(effective_dt) {
                systems::detection::run(&mut store);
            }
            let sim_time = store.clock().elapsed_secs;
            let expired = systems::cleanup::expired_wrecks(&mut store, sim_time);
            self.destroy_queue.lock().unwrap().extend(expired);
            self.drain_destroys(&mut store);
            systems::bounds::run(&mut store, &mut rng);
            store.update_clock(effective_dt);
        }

        self.perf.lock().unwrap().record(started.elapsed());
    }

    fn drain_spawns(&self, store: &mut WorldStore, rng: &mut ChaCha8Rng) {
        let requests: Vec<SpawnRequest> = self.spawn_queue.lock().unwrap().drain(..).collect();
        for request in requests {
            match store.create_entity(request, rng) {
                Ok(id) => {
                    store.log_event("entity_spawned", Some(&id), Value::Null);
                    debug!(id, "spawned entity");
                }
                Err(err) => debug!(%err, "spawn request rejected"),
            }
        }
    }

    fn drain_destroys(&self, store: &mut WorldStore) {
        let ids: Vec<String> = self.destroy_queue.lock().unwrap().drain(..).collect();
        for id in ids {
            if store.remove_entity(&id) {
                debug!(id, "destroyed entity");
            }
        }
    }

    /// True once per `DETECTION_INTERVAL` of simulated time. Pairwise
    /// range checks are the dominant cost of a large world and do not
    /// need to run at full tick rate.
    fn detection_due(&self, effective_dt: f64) -> bool {
        let mut accum = self.detection_accum.lock().unwrap();
        *accum += effective_dt;
        if *accum >= DETECTION_INTERVAL {
            *accum = 0.0;
            return true;
        }
        false
    }

    /// Fixed-timestep driver. Frame time is clamped so a stall produces
    /// at most `MAX_FRAME_TIME / DT` catch-up steps instead of a spiral.
    fn run_loop(&self) {
        let tick = Duration::from_secs_f64(DT);
        let mut last = Instant::now();
        let mut accumulator = 0.0;

        while self.running.load(Ordering::SeqCst) {
            let now = Instant::now();
            let frame = now.duration_since(last).as_secs_f64().min(MAX_FRAME_TIME);
            last = now;

            accumulator += frame;
            while accumulator >= DT {
                if !self.running.load(Ordering::SeqCst) {
                    return;
                }
                self.step(DT);
                accumulator -= DT;
            }

            let remaining = DT - accumulator;
            if remaining > 0.0 {
                std::thread::sleep(tick.mul_f64(remaining / DT));
            }
        }
    }
}

/// Handle owning the engine core and its driver thread.
pub struct SimulationEngine {
    core: Arc<EngineCore>,
    driver: Option<JoinHandle<()>>,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        let mut store = WorldStore::new();
        store.set_speed(config.speed);
        Self {
            core: Arc::new(EngineCore {
                store: Mutex::new(store),
                spawn_queue: Mutex::new(VecDeque::new()),
                destroy_queue: Mutex::new(VecDeque::new()),
                rng: Mutex::new(ChaCha8Rng::seed_from_u64(config.seed)),
                running: AtomicBool::new(false),
                paused: AtomicBool::new(false),
                perf: Mutex::new(PerfTracker::default()),
                detection_accum: Mutex::new(DETECTION_INTERVAL),
            }),
            driver: None,
        }
    }

    /// Start the background driver. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.core.running.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.core.paused.store(false, Ordering::SeqCst);
        self.core.perf.lock().unwrap().reset();
        *self.core.detection_accum.lock().unwrap() = DETECTION_INTERVAL;
        {
            let mut store = self.core.store.lock().unwrap();
            store.clock.running = true;
            store.log_event("simulation_started", None, Value::Null);
        }

        let core = Arc::clone(&self.core);
        let handle = std::thread::Builder::new()
            .name("skywatch-sim-loop".into())
            .spawn(move || core.run_loop())
            .expect("failed to spawn simulation driver thread");
        self.driver = Some(handle);
        info!("simulation started");
        true
    }

    /// Stop the driver and join it. Returns false if not running.
    pub fn stop(&mut self) -> bool {
        if !self.core.running.swap(false, Ordering::SeqCst) {
            return false;
        }
        if let Some(handle) = self.driver.take() {
            let _ = handle.join();
        }
        {
            let mut store = self.core.store.lock().unwrap();
            store.clock.running = false;
            store.log_event("simulation_stopped", None, Value::Null);
        }
        info!("simulation stopped");
        true
    }

    /// Hold world updates and the simulation clock; the driver cadence
    /// keeps ticking.
    pub fn pause(&self) {
        self.core.paused.store(true, Ordering::SeqCst);
        info!("simulation paused");
    }

    pub fn resume(&self) {
        self.core.paused.store(false, Ordering::SeqCst);
        info!("simulation resumed");
    }

    pub fn is_running(&self) -> bool {
        self.core.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.core.paused.load(Ordering::SeqCst)
    }

    /// Set the speed multiplier, clamped to the legal range.
    pub fn set_speed_multiplier(&self, speed: f64) {
        let mut store = self.core.store.lock().unwrap();
        store.set_speed(speed);
        let applied = store.clock().speed;
        store.log_event(
            "simulation_speed_changed",
            None,
            json!({ "speed": applied }),
        );
        info!(speed = applied, "speed multiplier changed");
    }

    /// Queue an entity spawn, applied at the next step boundary.
    pub fn spawn_entity(
        &self,
        kind: EntityKind,
        id: Option<String>,
        position: DVec3,
        props: SpawnProps,
    ) -> bool {
        self.core.spawn_queue.lock().unwrap().push_back(SpawnRequest {
            kind,
            id,
            position,
            props,
        });
        true
    }

    /// Queue an entity removal. Returns false for an unknown id.
    pub fn destroy_entity(&self, id: &str) -> bool {
        if !self.core.store.lock().unwrap().entity_exists(id) {
            return false;
        }
        self.core
            .destroy_queue
            .lock()
            .unwrap()
            .push_back(id.to_string());
        true
    }

    /// Queue a demo population: drones on a randomized ring, targets
    /// scattered on the ground. Purges groups left empty by a previous
    /// population first.
    pub fn spawn_test_scenario(&self, n_drones: usize, n_targets: usize) {
        self.core.store.lock().unwrap().cleanup_empty_groups();
        let requests = {
            let mut rng = self.core.rng.lock().unwrap();
            scenario::build_test_scenario(n_drones, n_targets, &mut rng)
        };
        self.core.spawn_queue.lock().unwrap().extend(requests);
    }

    /// Advance exactly one step synchronously. `dt` is the nominal frame
    /// time (`DT` for a normal tick); tests drive the engine through
    /// this for determinism.
    pub fn step(&self, dt: f64) {
        self.core.step(dt);
    }

    /// Lock the store for direct reads and per-entity commands.
    pub fn store(&self) -> MutexGuard<'_, WorldStore> {
        self.core.store.lock().unwrap()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        self.core.store.lock().unwrap().get_state_snapshot()
    }

    pub fn get_performance_stats(&self) -> PerfStats {
        let perf = self.core.perf.lock().unwrap();
        let store = self.core.store.lock().unwrap();
        PerfStats {
            fps: perf.fps,
            target_fps: TICK_RATE as f64,
            speed_multiplier: store.clock().speed,
            entity_count: store.entity_count(),
            avg_frame_ms: perf.avg_ms(),
            max_frame_ms: perf.max_ms(),
            running: self.is_running(),
            paused: self.is_paused(),
        }
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
