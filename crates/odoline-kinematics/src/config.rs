//! Robot geometry, encoder calibration and the workspace the robot drives in.

use core::f64::consts::PI;
use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{KinematicsError, Point2, WheelTravel};

/// Axis-aligned rectangle `[0, width) × [0, height)`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Workspace {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

impl Workspace {
    /// Construct a workspace. Dimensions are checked by [`RobotConfig::validate`].
    pub const fn new(width: f64, height: f64) -> Self {
        Workspace { width, height }
    }

    /// Whether `(x, y)` lies inside the half-open rectangle.
    ///
    /// NaN coordinates are never contained.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (0.0..self.width).contains(&x) && (0.0..self.height).contains(&y)
    }

    /// Center of the rectangle, where every robot starts.
    pub fn center(&self) -> Point2 {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0} × {:.0}", self.width, self.height)
    }
}

/// Geometry and calibration of a differential-drive robot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotConfig {
    /// Distance between the two drive wheels.
    pub wheel_spacing: f64,
    /// Drive wheel diameter.
    pub wheel_diameter: f64,
    /// Encoder ticks per full wheel revolution.
    pub encoder_resolution: u32,
    /// Rectangle the robot position must stay within.
    pub workspace: Workspace,
}

impl RobotConfig {
    /// Construct a robot configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidConfig)` if any length is not a
    /// positive finite number or `encoder_resolution` is zero.
    pub fn new(
        wheel_spacing: f64,
        wheel_diameter: f64,
        encoder_resolution: u32,
        workspace: Workspace,
    ) -> Result<Self, KinematicsError> {
        let config = RobotConfig {
            wheel_spacing,
            wheel_diameter,
            encoder_resolution,
            workspace,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter. Configurations built as struct literals or
    /// deserialized from settings are validated again by the engine.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        if !is_positive(self.wheel_spacing) {
            return Err(KinematicsError::InvalidConfig("wheel_spacing must be positive"));
        }
        if !is_positive(self.wheel_diameter) {
            return Err(KinematicsError::InvalidConfig("wheel_diameter must be positive"));
        }
        if self.encoder_resolution == 0 {
            return Err(KinematicsError::InvalidConfig("encoder_resolution must be positive"));
        }
        if !is_positive(self.workspace.width) {
            return Err(KinematicsError::InvalidConfig("workspace width must be positive"));
        }
        if !is_positive(self.workspace.height) {
            return Err(KinematicsError::InvalidConfig("workspace height must be positive"));
        }
        Ok(())
    }

    /// Distance covered by one full wheel revolution.
    pub fn wheel_circumference(&self) -> f64 {
        self.wheel_diameter * PI
    }

    /// Linear travel for a tick count. One encoder cycle is one circumference;
    /// negative ticks map to reverse travel.
    pub fn ticks_to_distance(&self, ticks: f64) -> f64 {
        (ticks / f64::from(self.encoder_resolution)) * self.wheel_circumference()
    }

    /// Linear travel of both wheels for a pair of tick counts.
    pub fn wheel_travel(&self, left_ticks: f64, right_ticks: f64) -> WheelTravel {
        WheelTravel::new(self.ticks_to_distance(left_ticks), self.ticks_to_distance(right_ticks))
    }
}

impl fmt::Display for RobotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RobotConfig (spacing: {:.2}, diameter: {:.2}, resolution: {} ticks/rev, \
             workspace: {})",
            self.wheel_spacing, self.wheel_diameter, self.encoder_resolution, self.workspace
        )
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
