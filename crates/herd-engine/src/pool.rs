//! Persistent worker pool for the parallel phase of a tick.
//!
//! Workers share one task channel and loop on `recv()` until it closes.
//! Each [`RangeTask`] carries an owned [`MotionChunk`] out to a worker,
//! which runs the behaviour over it and sends the chunk back on the
//! task's reply channel. Ownership moves with the chunk, so no two
//! workers can ever see the same agent.
//!
//! ```text
//!   TickEngine ──task_tx──► [worker 0] ─┐
//!        ▲                  [worker 1] ─┼─reply──► TickEngine (barrier)
//!        │                  [worker N] ─┘
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use herd_arena::MotionChunk;
use herd_behavior::{Behavior, Guidance};
use herd_core::{ConfigError, SharedSink, TickId};
use herd_world::WorldBounds;

/// One range of agents for one worker, for one tick.
#[derive(Debug)]
pub(crate) struct RangeTask {
    pub task: usize,
    pub tick: TickId,
    pub seed: u64,
    pub chunk: MotionChunk,
    pub guidance: Arc<[Guidance]>,
    pub delay: Duration,
    pub reply: Sender<RangeResult>,
}

/// A processed range coming back from a worker.
#[derive(Debug)]
pub(crate) struct RangeResult {
    pub task: usize,
    pub chunk: MotionChunk,
    pub busy_us: u64,
}

/// State every worker thread holds for its whole life.
struct WorkerShared {
    behavior: Arc<dyn Behavior>,
    bounds: WorldBounds,
    sink: SharedSink,
}

/// Fixed-size pool of worker threads.
///
/// Dropping the pool closes the task channel and joins every worker.
pub struct WorkerPool {
    task_tx: Option<Sender<RangeTask>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers running `behavior`.
    pub fn spawn(
        size: usize,
        behavior: Arc<dyn Behavior>,
        bounds: WorldBounds,
        sink: SharedSink,
    ) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<RangeTask>();
        let mut pool = Self {
            task_tx: Some(task_tx),
            handles: Vec::with_capacity(size),
        };
        for i in 0..size {
            let rx = task_rx.clone();
            let shared = WorkerShared {
                behavior: Arc::clone(&behavior),
                bounds,
                sink: Arc::clone(&sink),
            };
            let handle = thread::Builder::new()
                .name(format!("herd-worker-{i}"))
                .spawn(move || worker_loop(i, rx, shared))
                .map_err(|e| ConfigError::ThreadSpawnFailed {
                    reason: format!("worker {i}: {e}"),
                })?;
            pool.handles.push(handle);
        }
        log::debug!("worker pool started with {size} threads");
        Ok(pool)
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Queue a task. Returns it back if every worker is gone.
    pub(crate) fn submit(&self, task: RangeTask) -> Result<(), Box<RangeTask>> {
        match &self.task_tx {
            Some(tx) => tx.send(task).map_err(|e| Box::new(e.into_inner())),
            None => Err(Box::new(task)),
        }
    }

    /// Close the task channel and join every worker. Returns how many
    /// workers exited cleanly.
    pub fn shutdown(&mut self) -> usize {
        self.task_tx.take();
        let mut joined = 0;
        for handle in self.handles.drain(..) {
            if handle.join().is_ok() {
                joined += 1;
            }
        }
        joined
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.handles.len())
            .field("open", &self.task_tx.is_some())
            .finish()
    }
}

fn worker_loop(index: usize, task_rx: Receiver<RangeTask>, shared: WorkerShared) {
    while let Ok(task) = task_rx.recv() {
        let reply = task.reply.clone();
        let result = run_range(task, &shared);
        // Caller may have abandoned the tick.
        let _ = reply.send(result);
    }
    log::trace!("worker {index} exiting");
}

/// Seed for one task's RNG stream.
pub(crate) fn task_seed(seed: u64, tick: TickId, task: usize) -> u64 {
    seed ^ tick.0.rotate_left(32) ^ task as u64
}

fn run_range(task: RangeTask, shared: &WorkerShared) -> RangeResult {
    let started = Instant::now();
    let RangeTask {
        task,
        tick,
        seed,
        mut chunk,
        guidance,
        delay,
        ..
    } = task;
    let range = chunk.range();
    shared.sink.emit(&format!(
        "tick {tick} task {task} start: agents {}..{}",
        range.start, range.end
    ));
    log::trace!("tick {tick} task {task} start {}..{}", range.start, range.end);

    let mut rng = ChaCha8Rng::seed_from_u64(task_seed(seed, tick, task));
    let start = chunk.start;
    for (offset, motion) in chunk.motion.iter_mut().enumerate() {
        let g = guidance
            .get(start + offset)
            .copied()
            .unwrap_or(Guidance::Dormant);
        let p = shared.behavior.propose(motion, g, &shared.bounds, &mut rng);
        motion.next = p.next;
        motion.state = p.state;
    }

    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let busy_us = started.elapsed().as_micros() as u64;
    shared.sink.emit(&format!(
        "tick {tick} task {task} finish: {} agents in {busy_us} us",
        range.len()
    ));
    RangeResult {
        task,
        chunk,
        busy_us,
    }
}
