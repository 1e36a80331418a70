/// Errors raised by the transform engine
use thiserror::Error;

/// Everything that can go wrong while building a world or animating it.
///
/// Object templates and operations are fixed by configuration, so most of
/// these are precondition violations rather than user errors: the import or
/// operation concerned is refused and nothing else is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("object `{0}` has no points")]
    EmptyObject(String),

    #[error("object `{name}` references point {index} but only has {count} points")]
    PointIndexOutOfRange {
        name: String,
        index: usize,
        count: usize,
    },

    #[error("surface {surface} of object `{name}` has fewer than three points")]
    DegenerateSurface { name: String, surface: usize },

    #[error("object `{0}` already exists in world space")]
    DuplicateName(String),

    #[error("operation step count must be at least 1")]
    ZeroSteps,

    #[error("animator has not been started")]
    NotStarted,

    #[error("animator is no longer accepting operations")]
    QueueClosed,

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
