/// High-level world transforms and how they are split into animation steps
use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use nalgebra::Vector3;

use crate::error::EngineError;
use crate::transform::{Matrix, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Rotate,
    Scale,
    Translate,
}

/// How long an operation animates for and in how many steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub duration: Duration,
    pub steps: NonZeroU32,
}

impl Timing {
    pub fn new(duration: Duration, steps: u32) -> Result<Self, EngineError> {
        let steps = NonZeroU32::new(steps).ok_or(EngineError::ZeroSteps)?;
        Ok(Self { duration, steps })
    }

    /// Applies an operation in a single step with no pause.
    pub fn immediate() -> Self {
        Self {
            duration: Duration::ZERO,
            steps: NonZeroU32::MIN,
        }
    }

    /// Pause before each step.
    pub fn step_interval(&self) -> Duration {
        self.duration / self.steps.get()
    }
}

impl Default for Timing {
    /// One second in sixty steps.
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(1),
            steps: NonZeroU32::new(60).unwrap_or(NonZeroU32::MIN),
        }
    }
}

/// A rotation, scale or translation of the whole world
///
/// `amount` holds degrees for rotations, factors for scales and distances
/// for translations, one per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub amount: Vector3<f64>,
    pub timing: Timing,
}

impl Operation {
    pub fn new(kind: OperationKind, x: f64, y: f64, z: f64) -> Self {
        Self {
            kind,
            amount: Vector3::new(x, y, z),
            timing: Timing::default(),
        }
    }

    pub fn rotate(x: f64, y: f64, z: f64) -> Self {
        Self::new(OperationKind::Rotate, x, y, z)
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::new(OperationKind::Scale, x, y, z)
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self::new(OperationKind::Translate, x, y, z)
    }

    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// The matrix applied on every step.
    ///
    /// Applying it `steps` times performs the whole rotation or translation.
    /// Scale factors are split as `((f - 1) / steps) + 1` per step. Axes
    /// that leave the world unchanged contribute no matrix at all.
    pub fn step_matrix(&self) -> Matrix {
        let steps = f64::from(self.timing.steps.get());
        let (x, y, z) = (self.amount.x, self.amount.y, self.amount.z);
        let mut m = Transform::identity();

        match self.kind {
            OperationKind::Rotate => {
                if x != 0.0 {
                    m = Transform::compose(&Transform::rotate_x(x / steps), &m);
                }
                if y != 0.0 {
                    m = Transform::compose(&Transform::rotate_y(y / steps), &m);
                }
                if z != 0.0 {
                    m = Transform::compose(&Transform::rotate_z(z / steps), &m);
                }
            }
            OperationKind::Scale => {
                let part = |factor: f64| {
                    if factor == 1.0 {
                        1.0
                    } else {
                        (factor - 1.0) / steps + 1.0
                    }
                };
                if self.amount != Vector3::new(1.0, 1.0, 1.0) {
                    m = Transform::compose(&Transform::scale(part(x), part(y), part(z)), &m);
                }
            }
            OperationKind::Translate => {
                if self.amount != Vector3::zeros() {
                    m = Transform::compose(
                        &Transform::translate(x / steps, y / steps, z / steps),
                        &m,
                    );
                }
            }
        }
        m
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            OperationKind::Rotate => "Rotation",
            OperationKind::Scale => "Scale",
            OperationKind::Translate => "Translate (move)",
        };
        write!(
            f,
            "{label}. X: {:.2} Y: {:.2} Z: {:.2}",
            self.amount.x, self.amount.y, self.amount.z
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn run(op: &Operation, p: Point3<f64>) -> Point3<f64> {
        let step = op.step_matrix();
        (0..op.timing.steps.get()).fold(p, |p, _| Transform::apply(&step, &p))
    }

    #[test]
    fn test_zero_steps_rejected() {
        assert_eq!(Timing::new(Duration::from_secs(1), 0), Err(EngineError::ZeroSteps));
    }

    #[test]
    fn test_step_interval() {
        let timing = Timing::new(Duration::from_millis(1000), 4).unwrap();
        assert_eq!(timing.step_interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_full_turn_returns_home() {
        let p = Point3::new(1.5, -2.0, 0.25);
        for steps in [1, 2, 7, 60, 360] {
            let timing = Timing::new(Duration::ZERO, steps).unwrap();
            for op in [
                Operation::rotate(360.0, 0.0, 0.0),
                Operation::rotate(0.0, 360.0, 0.0),
                Operation::rotate(0.0, 0.0, 360.0),
            ] {
                let q = run(&op.with_timing(timing), p);
                assert!((q - p).norm() < 1e-6, "{op} in {steps} steps gave {q}");
            }
        }
    }

    #[test]
    fn test_identity_operations_build_identity() {
        assert_eq!(Operation::scale(1.0, 1.0, 1.0).step_matrix(), Transform::identity());
        assert_eq!(Operation::translate(0.0, 0.0, 0.0).step_matrix(), Transform::identity());
        assert_eq!(Operation::rotate(0.0, 0.0, 0.0).step_matrix(), Transform::identity());
    }

    #[test]
    fn test_scale_splits_factor() {
        let timing = Timing::new(Duration::ZERO, 4).unwrap();
        let m = Operation::scale(3.0, 1.0, 0.5).with_timing(timing).step_matrix();
        assert_eq!(m[(0, 0)], 1.5);
        assert_eq!(m[(1, 1)], 1.0);
        assert_eq!(m[(2, 2)], 0.875);
    }

    #[test]
    fn test_translate_round_trip() {
        let timing = Timing::new(Duration::ZERO, 13).unwrap();
        let p = Point3::new(0.3, 0.6, -0.9);
        let there = run(&Operation::translate(2.5, -1.0, 4.0).with_timing(timing), p);
        let back = run(&Operation::translate(-2.5, 1.0, -4.0).with_timing(timing), there);
        assert!((back - p).norm() < 1e-9);
    }

    #[test]
    fn test_quarter_turn_in_one_step() {
        let op = Operation::rotate(0.0, 0.0, 90.0).with_timing(Timing::immediate());
        let q = run(&op, Point3::new(1.0, 0.0, 0.0));
        assert!((q - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_description() {
        assert_eq!(
            Operation::rotate(0.0, 0.0, 90.0).to_string(),
            "Rotation. X: 0.00 Y: 0.00 Z: 90.00"
        );
        assert_eq!(
            Operation::translate(-3.0, 0.0, 0.0).to_string(),
            "Translate (move). X: -3.00 Y: 0.00 Z: 0.00"
        );
    }
}
