//! Named drive commands and the tick pairs they stand for.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One discrete movement command.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveCommand {
    /// Both wheels forward.
    Forward,
    /// Both wheels backward.
    Backward,
    /// Turn on the spot, left wheel back and right wheel forward.
    PivotLeft,
    /// Turn on the spot, left wheel forward and right wheel back.
    PivotRight,
    /// Forward with the left wheel doing most of the travel.
    CurveLeft,
    /// Forward with the right wheel doing most of the travel.
    CurveRight,
}

impl DriveCommand {
    /// Ticks per full-speed wheel command.
    pub const FULL_TICKS: f64 = 10.0;
    /// Ticks for the slow wheel of a curve.
    pub const CURVE_TICKS: f64 = 3.0;

    /// Every command, in a stable order.
    pub const ALL: [DriveCommand; 6] = [
        DriveCommand::Forward,
        DriveCommand::Backward,
        DriveCommand::PivotLeft,
        DriveCommand::PivotRight,
        DriveCommand::CurveLeft,
        DriveCommand::CurveRight,
    ];

    /// `(left_ticks, right_ticks)` for this command.
    pub const fn ticks(self) -> (f64, f64) {
        const FULL: f64 = DriveCommand::FULL_TICKS;
        const CURVE: f64 = DriveCommand::CURVE_TICKS;
        match self {
            DriveCommand::Forward => (FULL, FULL),
            DriveCommand::Backward => (-FULL, -FULL),
            DriveCommand::PivotLeft => (-FULL, FULL),
            DriveCommand::PivotRight => (FULL, -FULL),
            DriveCommand::CurveLeft => (FULL, CURVE),
            DriveCommand::CurveRight => (CURVE, FULL),
        }
    }
}

impl fmt::Display for DriveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriveCommand::Forward => "forward",
            DriveCommand::Backward => "backward",
            DriveCommand::PivotLeft => "pivot-left",
            DriveCommand::PivotRight => "pivot-right",
            DriveCommand::CurveLeft => "curve-left",
            DriveCommand::CurveRight => "curve-right",
        };
        f.pad(name)
    }
}
