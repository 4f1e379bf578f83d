//! Fixed-cadence driver running a [`Simulation`] on its own thread.
//!
//! The driver thread owns the simulation exclusively (moved in at
//! [`start`](RealtimeDriver::start)). After every tick it publishes a
//! [`Frame`] that readers pick up with [`latest`](RealtimeDriver::latest)
//! without ever touching the simulation. [`stop`](RealtimeDriver::stop)
//! returns the simulation to the caller.
//!
//! ```text
//!   caller ──pause/resume/stop (atomics)──► driver thread
//!                                              │ run_tick()
//!   caller ◄──────────── latest: Arc<Frame> ◄──┘ publish
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use herd_core::{ConfigError, TickId};

use crate::metrics::TickMetrics;
use crate::simulation::{AgentSnapshot, Simulation};

/// Idle poll while paused or after a failed tick.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// State published after each tick.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    /// Tick this frame reflects.
    pub tick: TickId,
    /// Every live agent.
    pub agents: Vec<AgentSnapshot>,
    /// Metrics of the tick that produced this frame.
    pub metrics: TickMetrics,
}

type Latest = Arc<Mutex<Arc<Frame>>>;

/// Handle to a simulation ticking in the background.
pub struct RealtimeDriver {
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    latest: Latest,
    handle: Option<JoinHandle<Simulation>>,
}

impl RealtimeDriver {
    /// Move `sim` onto a driver thread and start ticking at its
    /// [`tick_interval`](Simulation::tick_interval).
    pub fn start(sim: Simulation) -> Result<Self, ConfigError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let paused = Arc::new(AtomicBool::new(false));
        let latest: Latest = Arc::new(Mutex::new(Arc::new(Frame {
            tick: sim.current_tick(),
            agents: sim.snapshot_agents(),
            metrics: sim.last_metrics().clone(),
        })));

        let state = DriverState {
            sim,
            shutdown: Arc::clone(&shutdown),
            paused: Arc::clone(&paused),
            latest: Arc::clone(&latest),
        };
        let handle = thread::Builder::new()
            .name("herd-tick".into())
            .spawn(move || state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("tick thread: {e}"),
            })?;

        Ok(Self {
            shutdown,
            paused,
            latest,
            handle: Some(handle),
        })
    }

    /// Most recently published frame.
    pub fn latest(&self) -> Arc<Frame> {
        let guard = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Stop ticking until [`resume`](Self::resume).
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume ticking.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake();
    }

    /// Whether ticking is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Stop the driver and take the simulation back.
    ///
    /// Returns `None` if the driver thread panicked.
    pub fn stop(mut self) -> Option<Simulation> {
        self.halt()
    }

    fn wake(&self) {
        if let Some(h) = &self.handle {
            h.thread().unpark();
        }
    }

    fn halt(&mut self) -> Option<Simulation> {
        self.shutdown.store(true, Ordering::Release);
        self.wake();
        let handle = self.handle.take()?;
        handle.join().ok()
    }
}

impl Drop for RealtimeDriver {
    fn drop(&mut self) {
        self.halt();
    }
}

struct DriverState {
    sim: Simulation,
    shutdown: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    latest: Latest,
}

impl DriverState {
    fn run(mut self) -> Simulation {
        log::debug!("tick thread started");
        while !self.shutdown.load(Ordering::Acquire) {
            if self.paused.load(Ordering::Acquire) || self.sim.engine().is_tick_disabled() {
                thread::park_timeout(IDLE_POLL);
                continue;
            }

            let tick_start = Instant::now();
            match self.sim.run_tick() {
                Ok(report) => self.publish(Frame {
                    tick: report.tick,
                    agents: self.sim.snapshot_agents(),
                    metrics: report.metrics,
                }),
                Err(e) => log::error!("tick thread: {e}"),
            }

            // park_timeout so that stop() can cut the wait short.
            if let Some(remaining) = self.sim.tick_interval().checked_sub(tick_start.elapsed()) {
                thread::park_timeout(remaining);
            }
        }
        log::debug!("tick thread stopped at tick {}", self.sim.current_tick());
        self.sim
    }

    fn publish(&self, frame: Frame) {
        let mut guard = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn sim() -> Simulation {
        let config = SimConfig {
            worker_count: Some(1),
            tick_interval_ms: 1,
            ..SimConfig::with_world(20, 0.1, 200.0, 200.0, 4, 4, 5)
        };
        Simulation::new(config).unwrap()
    }

    fn wait_for_tick(driver: &RealtimeDriver, at_least: u64) -> Arc<Frame> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let f = driver.latest();
            if f.tick.0 >= at_least || Instant::now() > deadline {
                return f;
            }
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn initial_frame_is_published() {
        let driver = RealtimeDriver::start(sim()).unwrap();
        driver.pause();
        assert_eq!(driver.latest().agents.len(), 20);
        drop(driver);
    }

    #[test]
    fn driver_ticks_and_returns_simulation() {
        let driver = RealtimeDriver::start(sim()).unwrap();
        let frame = wait_for_tick(&driver, 5);
        assert!(frame.tick.0 >= 5);
        let sim = driver.stop().unwrap();
        assert!(sim.current_tick().0 >= 5);
    }

    #[test]
    fn pause_holds_the_tick() {
        let driver = RealtimeDriver::start(sim()).unwrap();
        wait_for_tick(&driver, 2);
        driver.pause();
        assert!(driver.is_paused());
        thread::sleep(Duration::from_millis(30));
        let held = driver.latest().tick;
        thread::sleep(Duration::from_millis(30));
        assert_eq!(driver.latest().tick, held);
        driver.resume();
        let after = wait_for_tick(&driver, held.0 + 1);
        assert!(after.tick > held);
    }
}
