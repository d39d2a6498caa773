#![warn(missing_docs)]
#![doc = "Dead-reckoning engine for a 2D differential-drive robot."]
#![doc = ""]
#![doc = "This crate converts per-wheel encoder ticks into wheel travel, integrates"]
#![doc = "forward kinematics into a pose, injects random wheel slip, rejects motion"]
#![doc = "that would leave the workspace and records the travelled trajectory."]

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, hypot, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod slip;
pub mod trajectory;

pub use command::DriveCommand;
pub use config::{RobotConfig, Workspace};
pub use engine::{OdometryEngine, StepCounts, StepReport};
pub use error::KinematicsError;
pub use slip::{SlipModel, WheelSlip};
pub use trajectory::Trajectory;

/// A position `(x, y)` in workspace coordinates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    /// Workspace x coordinate.
    pub x: f64,
    /// Workspace y coordinate.
    pub y: f64,
}

impl Point2 {
    /// Construct a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: Point2) -> f64 {
        hypot(other.x - self.x, other.y - self.y)
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A 2‑D pose `(x, y, θ)` in workspace units and radians.
///
/// The heading accumulates without wraparound: a robot that pivots twice
/// around reports `θ ≈ 4π`, not `0`. Use [`Pose::wrapped_heading`] when a
/// bounded angle is needed for display.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Workspace x position.
    pub x: f64,
    /// Workspace y position.
    pub y: f64,
    /// Accumulated heading (rad).
    pub theta: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: Workspace x position.
    /// * `y`: Workspace y position.
    /// * `theta`: Heading in radians.
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose { x, y, theta }
    }

    /// The position part of the pose.
    pub const fn position(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    /// End point of a heading indicator of the given length drawn from the
    /// pose position along the current heading.
    pub fn heading_tip(&self, length: f64) -> Point2 {
        Point2::new(self.x + length * cos(self.theta), self.y + length * sin(self.theta))
    }

    /// The heading normalized to `[-PI, PI)`.
    pub fn wrapped_heading(&self) -> f64 {
        Self::normalize_angle(self.theta)
    }

    /// Normalize an angle to be within `[-PI, PI)`.
    ///
    /// Angles at `PI` will be normalized to `-PI`.
    pub fn normalize_angle(angle: f64) -> f64 {
        let a = angle % (2.0 * PI);
        if a >= PI {
            a - 2.0 * PI
        } else if a < -PI {
            a + 2.0 * PI
        } else {
            a
        }
    }

    /// Apply one discrete motion step.
    ///
    /// The heading is updated first and the translation then follows the
    /// post-rotation heading. This is a rotate-then-translate discretization,
    /// not an arc integration, and recorded trajectories depend on it.
    pub fn stepped(&self, motion: BodyMotion) -> Pose {
        let theta = self.theta + motion.delta_theta;
        Pose {
            x: self.x + motion.distance * cos(theta),
            y: self.y + motion.distance * sin(theta),
            theta,
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2}, y: {:.2}, θ: {:.2} rad)", self.x, self.y, self.theta)
    }
}

/// Linear travel of the left and right wheels over one step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelTravel {
    /// Left wheel travel (workspace units, negative when reversing).
    pub left: f64,
    /// Right wheel travel (workspace units, negative when reversing).
    pub right: f64,
}

impl WheelTravel {
    /// Construct wheel travel.
    pub const fn new(left: f64, right: f64) -> Self {
        WheelTravel { left, right }
    }
}

impl fmt::Display for WheelTravel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L: {:.3}, R: {:.3})", self.left, self.right)
    }
}

/// Motion of the robot body over one step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyMotion {
    /// Translation of the reference point between the wheels.
    pub distance: f64,
    /// Heading change (rad), positive when the right wheel travels farther.
    pub delta_theta: f64,
}

impl BodyMotion {
    /// Construct a body motion.
    pub const fn new(distance: f64, delta_theta: f64) -> Self {
        BodyMotion { distance, delta_theta }
    }

    /// Differential-drive forward kinematics.
    ///
    /// # Arguments
    ///
    /// * `travel`: Linear travel of each wheel over the step.
    /// * `wheel_spacing`: Distance between the two drive wheels.
    pub fn from_travel(travel: WheelTravel, wheel_spacing: f64) -> Self {
        BodyMotion {
            distance: (travel.left + travel.right) / 2.0,
            delta_theta: (travel.right - travel.left) / wheel_spacing,
        }
    }
}

impl fmt::Display for BodyMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(d: {:.3}, Δθ: {:.3} rad)", self.distance, self.delta_theta)
    }
}
