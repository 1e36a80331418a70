/// Per-frame scene snapshots and the frame pump
use std::ops::ControlFlow;

use crate::depth::paint_order;
use crate::geometry::{Object, WorldSpace};

/// An object as it stood when the frame was captured
#[derive(Debug, Clone, PartialEq)]
pub struct FrameObject {
    pub name: String,
    pub depth: f64,
    pub object: Object,
}

/// Everything a renderer needs for one frame, in draw order
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Back to front
    pub objects: Vec<FrameObject>,
    /// Description of the current or last operation
    pub status: String,
}

impl Frame {
    /// Copy `world` in paint order.
    pub fn capture(world: &WorldSpace, status: String) -> Self {
        let objects = paint_order(world)
            .into_iter()
            .filter_map(|entry| {
                world.get(&entry.name).map(|object| FrameObject {
                    object: object.clone(),
                    name: entry.name,
                    depth: entry.depth,
                })
            })
            .collect();
        Self { objects, status }
    }

    /// Number of points across all objects
    pub fn point_count(&self) -> usize {
        self.objects.iter().map(|o| o.object.points.len()).sum()
    }
}

/// Host facility that decides when the next frame happens
pub trait FrameScheduler {
    /// Block until the next frame is due.
    fn wait_for_frame(&mut self);
}

/// Where frames come from
pub trait FrameSource {
    fn frame(&self) -> Frame;
}

/// Pumps frames from a source to a consumer until the consumer stops
///
/// Each frame is rescheduled only after the consumer has handled the
/// previous one.
pub struct FrameDriver<S> {
    scheduler: S,
    frames: u64,
}

impl<S: FrameScheduler> FrameDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            frames: 0,
        }
    }

    /// Run one frame. The consumer returns `Break` to stop the pump.
    pub fn pump<E, F>(&mut self, source: &impl FrameSource, on_frame: &mut F) -> Result<ControlFlow<()>, E>
    where
        F: FnMut(&Frame) -> Result<ControlFlow<()>, E>,
    {
        self.scheduler.wait_for_frame();
        let frame = source.frame();
        self.frames += 1;
        on_frame(&frame)
    }

    /// Pump frames until the consumer breaks or fails.
    pub fn run<E, F>(&mut self, source: &impl FrameSource, mut on_frame: F) -> Result<(), E>
    where
        F: FnMut(&Frame) -> Result<ControlFlow<()>, E>,
    {
        while self.pump(source, &mut on_frame)?.is_continue() {}
        log::debug!("frame driver stopped after {} frames", self.frames);
        Ok(())
    }

    /// Frames delivered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}
