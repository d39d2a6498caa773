//! The odometry engine.
//!
//! [`OdometryEngine`] owns the robot configuration, the current pose, the
//! trajectory and the random source used for slip. [`OdometryEngine::advance`]
//! is the only operation that changes state.

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    BodyMotion, DriveCommand, KinematicsError, Pose, RobotConfig, SlipModel, Trajectory, WheelSlip,
};

/// Outcome of one motion step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Pose after the step. Equal to the pose before the step when rejected.
    pub pose: Pose,
    /// `false` when the step would have left the workspace and was discarded.
    pub committed: bool,
    /// Factors applied to the ticks when slip occurred on this step.
    pub slip: Option<WheelSlip>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.committed { "committed" } else { "rejected" };
        write!(f, "{} {}", outcome, self.pose)?;
        if let Some(slip) = self.slip {
            write!(f, " slip {}", slip)?;
        }
        Ok(())
    }
}

/// Accepted and rejected step counters.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepCounts {
    /// Steps that moved the robot.
    pub accepted: u64,
    /// Steps discarded at the workspace boundary.
    pub rejected: u64,
}

impl StepCounts {
    /// All steps taken.
    pub fn total(&self) -> u64 {
        self.accepted + self.rejected
    }
}

/// Dead-reckoning engine for one differential-drive robot.
///
/// The random source `R` drives slip only. Production code uses
/// [`OdometryEngine::new`] (OS-seeded [`StdRng`]); tests inject a seeded or
/// scripted generator through [`OdometryEngine::with_rng`].
///
/// The engine is not synchronized. It belongs to exactly one controlling
/// context, and callers that share it must serialize access themselves.
#[derive(Debug, Clone)]
pub struct OdometryEngine<R = StdRng> {
    config: RobotConfig,
    slip: SlipModel,
    pose: Pose,
    trajectory: Trajectory,
    steps: StepCounts,
    rng: R,
}

impl OdometryEngine<StdRng> {
    /// Construct an engine with the default slip model and an OS-seeded
    /// random source.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidConfig)` if `wheel_spacing` or
    /// `wheel_diameter` is not positive, `encoder_resolution` is zero, or the
    /// workspace is empty.
    pub fn new(config: RobotConfig) -> Result<Self, KinematicsError> {
        Self::with_rng(config, SlipModel::default(), StdRng::from_os_rng())
    }

    /// Construct an engine whose slip draws are reproducible from `seed`.
    ///
    /// # Errors
    ///
    /// Same as [`OdometryEngine::with_rng`].
    pub fn seeded(
        config: RobotConfig,
        slip: SlipModel,
        seed: u64,
    ) -> Result<Self, KinematicsError> {
        Self::with_rng(config, slip, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> OdometryEngine<R> {
    /// Construct an engine with an explicit slip model and random source.
    ///
    /// The robot starts at the workspace center with heading zero, and the
    /// trajectory holds that single position.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidConfig)` if the robot
    /// configuration or the slip model fails validation.
    pub fn with_rng(config: RobotConfig, slip: SlipModel, rng: R) -> Result<Self, KinematicsError> {
        config.validate()?;
        slip.validate()?;

        let start = config.workspace.center();
        let pose = Pose::new(start.x, start.y, 0.0);
        debug!(%config, %slip, %pose, "Odometry engine created");

        Ok(OdometryEngine {
            config,
            slip,
            pose,
            trajectory: Trajectory::new(start),
            steps: StepCounts::default(),
            rng,
        })
    }

    /// Advance the robot by one step of wheel ticks.
    ///
    /// Slip may first shorten the ticks of each wheel. The ticks are then
    /// converted to wheel travel, the heading is rotated and the robot is
    /// translated along the new heading. If the resulting position lies inside
    /// the workspace the pose is committed and appended to the trajectory;
    /// otherwise the whole step, rotation included, is discarded.
    ///
    /// # Arguments
    ///
    /// * `left_ticks`: Left wheel encoder ticks, negative when reversing.
    /// * `right_ticks`: Right wheel encoder ticks, negative when reversing.
    ///
    /// # Returns
    ///
    /// The resulting pose, whether it was committed, and any slip applied.
    pub fn advance(&mut self, left_ticks: f64, right_ticks: f64) -> StepReport {
        let slip = self.slip.sample(&mut self.rng);
        let (left_ticks, right_ticks) = match slip {
            Some(factors) => {
                trace!(%factors, left_ticks, right_ticks, "Wheel slip injected");
                factors.apply(left_ticks, right_ticks)
            }
            None => (left_ticks, right_ticks),
        };

        let travel = self.config.wheel_travel(left_ticks, right_ticks);
        let motion = BodyMotion::from_travel(travel, self.config.wheel_spacing);
        let candidate = self.pose.stepped(motion);

        if !self.config.workspace.contains(candidate.x, candidate.y) {
            self.steps.rejected += 1;
            debug!(
                candidate_x = candidate.x,
                candidate_y = candidate.y,
                pose = %self.pose,
                "Step rejected at workspace boundary"
            );
            return StepReport {
                pose: self.pose,
                committed: false,
                slip,
            };
        }

        self.pose = candidate;
        self.trajectory.push(candidate.position());
        self.steps.accepted += 1;
        debug!(%travel, %motion, pose = %self.pose, "Step committed");

        StepReport {
            pose: candidate,
            committed: true,
            slip,
        }
    }

    /// Advance by the tick pair of a named command.
    pub fn drive(&mut self, command: DriveCommand) -> StepReport {
        let (left_ticks, right_ticks) = command.ticks();
        self.advance(left_ticks, right_ticks)
    }
}

impl<R> OdometryEngine<R> {
    /// Current pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Every position the robot has occupied, starting position first.
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Robot geometry and workspace.
    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Active slip model.
    pub fn slip_model(&self) -> &SlipModel {
        &self.slip
    }

    /// Accepted and rejected step counts.
    pub fn steps(&self) -> StepCounts {
        self.steps
    }
}
