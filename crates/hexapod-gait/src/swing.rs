//! Hip-sweep and foot-lift profiles within one leg's gait cycle.
//!
//! During stance the planted foot sweeps linearly from `+amplitude` to
//! `-amplitude`, carrying the body forward. During swing the foot returns
//! linearly to `+amplitude` while lifting along a half-sine that is zero at
//! liftoff and touchdown and peaks mid-swing.
//!
//! Hip sweep is expressed in a side-normalized frame: positive sweep moves a
//! foot toward the head on either side of the body.

use std::f64::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use hexapod_core::types::{LegLengths, LegPhase, Point3D, Side};

/// Hip sweep (degrees) and lift (length units) of one leg at one sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SweepSample {
    pub hip_sweep: f64,
    pub lift: f64,
}

/// Stance sweep at `progress` in [0, 1]: `+amplitude` down to `-amplitude`.
pub fn stance_sweep(progress: f64, amplitude: f64) -> f64 {
    amplitude * (1.0 - 2.0 * progress)
}

/// Swing return at `progress` in [0, 1]: `-amplitude` up to `+amplitude`.
pub fn swing_sweep(progress: f64, amplitude: f64) -> f64 {
    amplitude * (2.0 * progress - 1.0)
}

/// Half-sine lift at `progress` in [0, 1].
pub fn swing_lift(progress: f64, height: f64) -> f64 {
    height * (PI * progress.clamp(0.0, 1.0)).sin()
}

/// Trajectory sample for a leg in `phase` at `progress`.
///
/// `sign` flips the sweep for reversed travel or rotation; lift is unaffected.
pub fn hip_sweep(
    phase: LegPhase,
    progress: f64,
    amplitude: f64,
    height: f64,
    sign: f64,
) -> SweepSample {
    match phase {
        LegPhase::Stance => SweepSample {
            hip_sweep: sign * stance_sweep(progress, amplitude),
            lift: 0.0,
        },
        LegPhase::Swing => SweepSample {
            hip_sweep: sign * swing_sweep(progress, amplitude),
            lift: swing_lift(progress, height),
        },
    }
}

/// Mount-local foot target for a sweep sample.
///
/// The neutral stance foot, `(coxa + femur, 0, -tibia)`, is yawed about the
/// mount's vertical axis by the sweep (negated on the left side, whose local
/// +y points toward the tail) and raised by the lift.
pub fn foot_target(sample: &SweepSample, side: Side, lengths: &LegLengths) -> Point3D {
    let yaw = match side {
        Side::Right => sample.hip_sweep,
        Side::Left => -sample.hip_sweep,
    }
    .to_radians();
    let radius = lengths.coxa + lengths.femur;
    Vector3::new(
        radius * yaw.cos(),
        radius * yaw.sin(),
        sample.lift - lengths.tibia,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stance_sweeps_front_to_back() {
        assert_relative_eq!(stance_sweep(0.0, 12.0), 12.0);
        assert_relative_eq!(stance_sweep(0.5, 12.0), 0.0);
        assert_relative_eq!(stance_sweep(1.0, 12.0), -12.0);
    }

    #[test]
    fn swing_returns_back_to_front() {
        assert_relative_eq!(swing_sweep(0.0, 12.0), -12.0);
        assert_relative_eq!(swing_sweep(1.0, 12.0), 12.0);
    }

    #[test]
    fn lift_is_half_sine() {
        assert_relative_eq!(swing_lift(0.0, 3.0), 0.0);
        assert_relative_eq!(swing_lift(0.5, 3.0), 3.0);
        assert_relative_eq!(swing_lift(1.0, 3.0), 0.0, epsilon = 1e-12);
        assert!(swing_lift(0.25, 3.0) < 3.0);
    }

    #[test]
    fn stance_never_lifts() {
        let s = hip_sweep(LegPhase::Stance, 0.3, 20.0, 5.0, 1.0);
        assert_eq!(s.lift, 0.0);
    }

    #[test]
    fn sign_flips_sweep_only() {
        let fwd = hip_sweep(LegPhase::Swing, 0.3, 20.0, 5.0, 1.0);
        let back = hip_sweep(LegPhase::Swing, 0.3, 20.0, 5.0, -1.0);
        assert_relative_eq!(fwd.hip_sweep, -back.hip_sweep);
        assert_relative_eq!(fwd.lift, back.lift);
    }

    #[test]
    fn foot_target_neutral() {
        let lengths = LegLengths::default();
        let zero = SweepSample {
            hip_sweep: 0.0,
            lift: 0.0,
        };
        let p = foot_target(&zero, Side::Right, &lengths);
        assert_relative_eq!(p, Vector3::new(8.0, 0.0, -7.0));
    }

    #[test]
    fn foot_target_mirrors_left_side() {
        let lengths = LegLengths::default();
        let s = SweepSample {
            hip_sweep: 20.0,
            lift: 1.5,
        };
        let right = foot_target(&s, Side::Right, &lengths);
        let left = foot_target(&s, Side::Left, &lengths);
        assert_relative_eq!(right.x, left.x);
        assert_relative_eq!(right.y, -left.y);
        assert_relative_eq!(right.z, -5.5);
        assert_relative_eq!(right.y.atan2(right.x).to_degrees(), 20.0, epsilon = 1e-12);
    }
}
