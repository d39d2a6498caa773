//! Non-systematic error model.
//!
//! Wheel slip is modelled as an occasional loss of travel: with a fixed
//! probability per motion step, each wheel's tick count is scaled by its own
//! uniform draw from `[min_factor, max_factor)`. Factors never exceed one, so
//! slip shortens travel and never lengthens it.

use core::fmt;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::KinematicsError;

/// Parameters of the slip model.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlipModel {
    /// Chance per step that slip occurs, in `[0, 1]`.
    pub probability: f64,
    /// Inclusive lower bound of the per-wheel scale factor.
    pub min_factor: f64,
    /// Exclusive upper bound of the per-wheel scale factor.
    pub max_factor: f64,
}

impl SlipModel {
    /// Default chance of slip per step.
    pub const DEFAULT_PROBABILITY: f64 = 0.1;
    /// Default lower bound of the scale factor.
    pub const DEFAULT_MIN_FACTOR: f64 = 0.9;
    /// Default upper bound of the scale factor.
    pub const DEFAULT_MAX_FACTOR: f64 = 1.0;

    /// Construct a slip model.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidConfig)` if the parameters fail
    /// [`SlipModel::validate`].
    pub fn new(
        probability: f64,
        min_factor: f64,
        max_factor: f64,
    ) -> Result<Self, KinematicsError> {
        let model = SlipModel {
            probability,
            min_factor,
            max_factor,
        };
        model.validate()?;
        Ok(model)
    }

    /// A model that never slips. The engine becomes a pure function of its
    /// pose and input.
    pub const fn disabled() -> Self {
        SlipModel {
            probability: 0.0,
            min_factor: Self::DEFAULT_MIN_FACTOR,
            max_factor: Self::DEFAULT_MAX_FACTOR,
        }
    }

    /// Requires `0 <= probability <= 1` and `0 <= min_factor < max_factor <= 1`.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(KinematicsError::InvalidConfig("slip probability must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.min_factor) || !(0.0..=1.0).contains(&self.max_factor) {
            return Err(KinematicsError::InvalidConfig("slip factors must be within [0, 1]"));
        }
        if self.min_factor >= self.max_factor {
            return Err(KinematicsError::InvalidConfig("slip min_factor must be below max_factor"));
        }
        Ok(())
    }

    /// Whether slip can ever occur.
    pub fn is_enabled(&self) -> bool {
        self.probability > 0.0
    }

    /// Draw the slip for one step.
    ///
    /// Consumes one Bernoulli draw, plus two factor draws only when slip fires.
    /// The model must have passed [`SlipModel::validate`].
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<WheelSlip> {
        if !rng.random_bool(self.probability) {
            return None;
        }
        let left = rng.random_range(self.min_factor..self.max_factor);
        let right = rng.random_range(self.min_factor..self.max_factor);
        Some(WheelSlip { left, right })
    }
}

impl Default for SlipModel {
    fn default() -> Self {
        SlipModel {
            probability: Self::DEFAULT_PROBABILITY,
            min_factor: Self::DEFAULT_MIN_FACTOR,
            max_factor: Self::DEFAULT_MAX_FACTOR,
        }
    }
}

impl fmt::Display for SlipModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SlipModel (p: {:.2}, factor: [{:.2}, {:.2}))",
            self.probability, self.min_factor, self.max_factor
        )
    }
}

/// Scale factors drawn for one slipping step.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSlip {
    /// Factor applied to the left wheel ticks.
    pub left: f64,
    /// Factor applied to the right wheel ticks.
    pub right: f64,
}

impl WheelSlip {
    /// Scale a pair of tick counts.
    pub fn apply(&self, left_ticks: f64, right_ticks: f64) -> (f64, f64) {
        (left_ticks * self.left, right_ticks * self.right)
    }
}

impl fmt::Display for WheelSlip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L×{:.3}, R×{:.3})", self.left, self.right)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{RngCore, SeedableRng};
    const EPSILON: f64 = 1e-9;

    /// Random source that returns the same word forever.
    ///
    /// All-zero words make every Bernoulli draw succeed and every range draw
    /// land on its lower bound; all-one words make every Bernoulli draw with
    /// `p < 1` fail.
    pub(crate) struct ScriptedRng(pub u64);

    impl ScriptedRng {
        pub(crate) fn always_slip() -> Self {
            ScriptedRng(0)
        }

        pub(crate) fn never_slip() -> Self {
            ScriptedRng(u64::MAX)
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }

        fn next_u64(&mut self) -> u64 {
            self.0
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(self.0 as u8);
        }
    }

    #[test]
    fn test_default_model() {
        let model = SlipModel::default();
        assert_eq!(model.probability, 0.1);
        assert_eq!(model.min_factor, 0.9);
        assert_eq!(model.max_factor, 1.0);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_invalid_models() {
        assert!(matches!(SlipModel::new(1.5, 0.9, 1.0), Err(KinematicsError::InvalidConfig(_))));
        assert!(matches!(SlipModel::new(-0.1, 0.9, 1.0), Err(KinematicsError::InvalidConfig(_))));
        assert!(matches!(SlipModel::new(0.1, 0.9, 1.2), Err(KinematicsError::InvalidConfig(_))));
        assert!(matches!(SlipModel::new(0.1, 0.95, 0.9), Err(KinematicsError::InvalidConfig(_))));
        assert!(matches!(SlipModel::new(0.1, 0.9, 0.9), Err(KinematicsError::InvalidConfig(_))));
        assert!(matches!(
            SlipModel::new(f64::NAN, 0.9, 1.0),
            Err(KinematicsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_disabled_never_slips() {
        let model = SlipModel::disabled();
        assert!(!model.is_enabled());
        let mut rng = ScriptedRng::always_slip();
        for _ in 0..100 {
            assert!(model.sample(&mut rng).is_none());
        }
    }

    #[test]
    fn test_scripted_slip_hits_lower_bound() {
        let slip = SlipModel::default().sample(&mut ScriptedRng::always_slip()).unwrap();
        assert!((slip.left - 0.9).abs() < EPSILON);
        assert!((slip.right - 0.9).abs() < EPSILON);
        assert!(SlipModel::default().sample(&mut ScriptedRng::never_slip()).is_none());
    }

    #[test]
    fn test_factors_stay_in_range() {
        let model = SlipModel::new(1.0, 0.9, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let slip = model.sample(&mut rng).unwrap();
            assert!((0.9..1.0).contains(&slip.left));
            assert!((0.9..1.0).contains(&slip.right));
        }
    }

    #[test]
    fn test_wheels_draw_independently() {
        let model = SlipModel::new(1.0, 0.9, 1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let differing = (0..100)
            .filter_map(|_| model.sample(&mut rng))
            .filter(|slip| slip.left != slip.right)
            .count();
        assert!(differing > 90);
    }

    #[test]
    fn test_slip_rate_near_probability() {
        let model = SlipModel::default();
        let mut rng = StdRng::seed_from_u64(42);
        let fired = (0..10_000).filter(|_| model.sample(&mut rng).is_some()).count();
        assert!((800..1_200).contains(&fired), "fired {} times", fired);
    }

    #[test]
    fn test_apply_scales_each_wheel() {
        let slip = WheelSlip { left: 0.9, right: 0.95 };
        let (left, right) = slip.apply(10.0, -10.0);
        assert!((left - 9.0).abs() < EPSILON);
        assert!((right + 9.5).abs() < EPSILON);
    }
}
