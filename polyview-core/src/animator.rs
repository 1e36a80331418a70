/// Background worker that animates queued operations
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex, RwLock};

use crate::geometry::WorldSpace;
use crate::operation::Operation;

/// What the animator is doing, for status display
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Animating(Operation),
    Complete(Operation),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Idle => write!(f, "Idle"),
            Status::Animating(op) => write!(f, "{op}"),
            Status::Complete(op) => write!(f, "Complete. {op}"),
        }
    }
}

/// Progress reported to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    Started(Operation),
    /// Step `step` of `of` has been applied to the world.
    Tick { step: u32, of: u32 },
    Finished(Operation),
}

/// State shared between the engine handle and its animator thread
pub(crate) struct Shared {
    pub world: RwLock<WorldSpace>,
    pub status: RwLock<Status>,
    /// Operations submitted but not yet finished
    pub pending: Mutex<usize>,
    pub idle: Condvar,
    pub stopping: AtomicBool,
    pub observers: Mutex<Vec<Sender<AnimationEvent>>>,
}

impl Shared {
    pub fn new(world: WorldSpace) -> Self {
        Self {
            world: RwLock::new(world),
            status: RwLock::new(Status::Idle),
            pending: Mutex::new(0),
            idle: Condvar::new(),
            stopping: AtomicBool::new(false),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn finish_one(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    fn notify(&self, event: AnimationEvent) {
        self.observers
            .lock()
            .retain(|observer| observer.send(event.clone()).is_ok());
    }
}

/// Single consumer of the operation queue
///
/// Operations run one at a time in submission order. Each one is split into
/// `steps` equal sub-steps spread over its duration, and every sub-step is
/// applied to the already transformed world, so the steps compound.
pub(crate) struct Animator {
    shared: Arc<Shared>,
}

impl Animator {
    pub fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Drain `queue` until every sender is gone.
    pub fn run(self, queue: Receiver<Operation>) {
        log::info!("animator started");
        for op in queue {
            if self.shared.stopping.load(Ordering::Acquire) {
                log::debug!("discarding queued operation: {op}");
            } else {
                self.animate(&op);
            }
            self.shared.finish_one();
        }
        log::info!("animator stopped");
    }

    /// Animate one operation to completion.
    pub fn animate(&self, op: &Operation) {
        log::info!("starting: {op}");
        *self.shared.status.write() = Status::Animating(*op);
        self.shared.notify(AnimationEvent::Started(*op));

        let step = op.step_matrix();
        let interval = op.timing.step_interval();
        let steps = op.timing.steps.get();
        for tick in 1..=steps {
            if !interval.is_zero() {
                thread::sleep(interval);
            }
            // Held across the whole tick so readers never see a half-moved world.
            self.shared.world.write().transform(&step);
            log::trace!("step {tick}/{steps} of {op}");
            self.shared.notify(AnimationEvent::Tick { step: tick, of: steps });
        }

        *self.shared.status.write() = Status::Complete(*op);
        self.shared.notify(AnimationEvent::Finished(*op));
        log::info!("finished: {op}");
    }
}
