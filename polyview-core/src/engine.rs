/// Engine context: world space, operation queue and animator thread
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::animator::{AnimationEvent, Animator, Shared, Status};
use crate::error::EngineError;
use crate::frame::{Frame, FrameSource};
use crate::geometry::WorldSpace;
use crate::operation::Operation;

/// Queue length used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 10;

/// Owns the world and feeds operations to its animator
///
/// ```no_run
/// use polyview_core::{demo, Engine, Operation};
///
/// let mut engine = Engine::new(demo::world().unwrap());
/// engine.start([Operation::rotate(0.0, 0.0, 90.0)]).unwrap();
/// let frame = engine.frame();
/// println!("{} objects, {}", frame.objects.len(), frame.status);
/// ```
pub struct Engine {
    shared: Arc<Shared>,
    queue: Option<SyncSender<Operation>>,
    worker: Option<JoinHandle<()>>,
    feeder: Option<JoinHandle<()>>,
    capacity: usize,
}

impl Engine {
    pub fn new(world: WorldSpace) -> Self {
        Self {
            shared: Arc::new(Shared::new(world)),
            queue: None,
            worker: None,
            feeder: None,
            capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Bound on queued operations. Blocking submissions wait while it is full.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Receive animation progress from now on.
    pub fn subscribe(&self) -> Receiver<AnimationEvent> {
        let (tx, rx) = mpsc::channel();
        self.shared.observers.lock().push(tx);
        rx
    }

    /// Spawn the animator and queue the start-up operations ahead of any input.
    ///
    /// Start-up operations are queued regardless of the busy state and block
    /// while the queue is full. Starting again after `shutdown` spawns a new
    /// animator.
    pub fn start(&mut self, startup: impl IntoIterator<Item = Operation>) -> Result<(), EngineError> {
        self.spawn_worker();
        for op in startup {
            self.submit(op)?;
        }
        Ok(())
    }

    /// Like `start`, but the start-up operations are fed from a separate
    /// thread so the caller can go on pumping frames.
    ///
    /// All of them count as pending from the moment this returns, so input
    /// stays dropped until the last one has finished.
    pub fn start_in_background(&mut self, startup: Vec<Operation>) -> Result<(), EngineError> {
        self.spawn_worker();
        if startup.is_empty() {
            return Ok(());
        }
        let queue = self.queue.clone().ok_or(EngineError::NotStarted)?;
        let shared = self.shared.clone();
        *shared.pending.lock() += startup.len();

        self.feeder = Some(thread::spawn(move || {
            let total = startup.len();
            for (sent, op) in startup.into_iter().enumerate() {
                if queue.send(op).is_err() {
                    log::warn!("animator gone, {} start-up operations not queued", total - sent);
                    for _ in sent..total {
                        shared.finish_one();
                    }
                    return;
                }
            }
            log::debug!("queued {total} start-up operations");
        }));
        Ok(())
    }

    fn spawn_worker(&mut self) {
        if self.queue.is_some() {
            return;
        }
        self.shared.stopping.store(false, Ordering::Release);
        let (tx, rx) = mpsc::sync_channel(self.capacity);
        let animator = Animator::new(self.shared.clone());
        self.worker = Some(thread::spawn(move || animator.run(rx)));
        self.queue = Some(tx);
        log::info!("engine started with queue capacity {}", self.capacity);
    }

    /// Queue `op`, waiting for room if the queue is full.
    pub fn submit(&self, op: Operation) -> Result<(), EngineError> {
        let queue = self.queue.as_ref().ok_or(EngineError::NotStarted)?;
        *self.shared.pending.lock() += 1;
        queue.send(op).map_err(|_| {
            self.shared.finish_one();
            EngineError::QueueClosed
        })
    }

    /// Queue `op` only if nothing is animating or waiting.
    ///
    /// Returns whether the operation was accepted. Input that arrives during
    /// an animation is dropped rather than buffered so that held keys do not
    /// pile up work.
    pub fn submit_input(&self, op: Operation) -> bool {
        let Some(queue) = self.queue.as_ref() else {
            return false;
        };
        let mut pending = self.shared.pending.lock();
        if *pending > 0 {
            log::debug!("busy, dropping input: {op}");
            return false;
        }
        match queue.try_send(op) {
            Ok(()) => {
                *pending += 1;
                true
            }
            Err(TrySendError::Full(op) | TrySendError::Disconnected(op)) => {
                log::warn!("queue unavailable, dropping input: {op}");
                false
            }
        }
    }

    /// Whether an operation is animating or queued
    pub fn is_busy(&self) -> bool {
        *self.shared.pending.lock() > 0
    }

    /// Block until every submitted operation has finished.
    pub fn wait_idle(&self) {
        let mut pending = self.shared.pending.lock();
        while *pending > 0 {
            self.shared.idle.wait(&mut pending);
        }
    }

    pub fn status(&self) -> Status {
        self.shared.status.read().clone()
    }

    /// Consistent copy of the world
    pub fn world(&self) -> WorldSpace {
        self.shared.world.read().clone()
    }

    /// Paint-ordered snapshot taken under a single read lock.
    pub fn frame(&self) -> Frame {
        let status = self.status().to_string();
        let world = self.shared.world.read();
        Frame::capture(&world, status)
    }

    /// Stop the animator after the operation in progress.
    ///
    /// Operations still queued are discarded.
    pub fn shutdown(&mut self) {
        self.shared.stopping.store(true, Ordering::Release);
        self.queue = None;
        // The feeder holds a sender, so the animator only ends once it is done.
        if let Some(feeder) = self.feeder.take() {
            if feeder.join().is_err() {
                log::error!("start-up feeder thread panicked");
            }
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("animator thread panicked");
            }
        }
    }
}

impl FrameSource for Engine {
    fn frame(&self) -> Frame {
        Engine::frame(self)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
