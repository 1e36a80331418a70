/// The built-in demonstration scene
use nalgebra::Vector3;

use crate::error::EngineError;
use crate::geometry::{ObjectTemplate, WorldSpace};
use crate::operation::{Operation, Timing};

/// Two tetrahedra, a triangle and a square pyramid spread around the origin.
pub fn world() -> Result<WorldSpace, EngineError> {
    let tetrahedron = ObjectTemplate::tetrahedron();
    let mut world = WorldSpace::new();
    world.import("ob1", &tetrahedron, Vector3::new(3.0, 3.0, 0.0))?;
    world.import("ob1 copy", &tetrahedron, Vector3::new(-3.0, 3.0, 0.0))?;
    world.import("ob2", &ObjectTemplate::triangle(), Vector3::new(3.0, -3.0, 1.0))?;
    world.import("ob3", &ObjectTemplate::square_pyramid(), Vector3::new(-3.0, 0.0, -1.0))?;
    Ok(world)
}

/// Operations queued at start-up. The second half undoes the first.
pub fn startup(timing: Timing) -> Vec<Operation> {
    [
        Operation::rotate(0.0, 0.0, 90.0),
        Operation::scale(2.0, 2.0, 2.0),
        Operation::translate(-3.0, 0.0, 0.0),
        Operation::rotate(0.0, 360.0, 0.0),
        Operation::scale(0.5, 0.5, 0.5),
        Operation::translate(3.0, 0.0, 0.0),
    ]
    .into_iter()
    .map(|op| op.with_timing(timing))
    .collect()
}
