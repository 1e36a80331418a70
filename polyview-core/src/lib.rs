/// polyview core library - transform engine and animated command pipeline
///
/// Objects are imported into a shared world space and the whole world is
/// rotated, scaled or translated by operations that a background animator
/// applies in small steps. Renderers take paint-ordered frame snapshots.

pub mod animator;
pub mod demo;
pub mod depth;
pub mod engine;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod operation;
pub mod projection;
pub mod script;
pub mod transform;

// Re-export commonly used types
pub use animator::{AnimationEvent, Status};
pub use depth::{paint_order, PaintEntry};
pub use engine::Engine;
pub use error::EngineError;
pub use frame::{Frame, FrameDriver, FrameObject, FrameScheduler, FrameSource};
pub use geometry::{Edge, Object, ObjectTemplate, Point, Rgb, Surface, WorldSpace};
pub use input::KeyMap;
pub use operation::{Operation, OperationKind, Timing};
pub use projection::Viewport;
pub use transform::{Matrix, Transform};
