//! Analytic inverse kinematics.
//!
//! [`solve_leg`] inverts the three-segment chain in closed form: coxa yaw from
//! the horizontal bearing of the target, then femur and tibia from the law of
//! cosines on the planar two-link arm. The solver keeps the femur-tibia joint
//! above the femur-to-foot line, so the foot hangs below the knee.
//!
//! [`solve_body_ik`] keeps six feet planted at world anchors and solves each
//! leg against the mount frames of the requested body pose.

use std::f64::consts::FRAC_PI_2;

use nalgebra::{Isometry3, Point3};
use tracing::{debug, warn};

use hexapod_core::error::{ensure_finite, HexapodError, IkUnreachable};
use hexapod_core::types::{BodyPose, JointAngles, LegId, LegLengths, Point3D, LEG_COUNT};

use crate::geometry::{body_transform, MountFrame};

/// Distances below this are treated as zero in the planar solve.
const DEGENERATE_EPS: f64 = 1e-12;

/// Result of a single-leg solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegIk {
    pub angles: JointAngles,
    /// Set when the target lay outside the reachable annulus and was clamped.
    pub unreachable: Option<IkUnreachable>,
}

/// Result of a whole-body solve.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyIkSolution {
    /// Body world transform the angles were solved against.
    pub body: Isometry3<f64>,
    pub angles: [JointAngles; LEG_COUNT],
    /// Legs whose anchors were out of reach, in leg order.
    pub unreachable: Vec<IkUnreachable>,
}

impl BodyIkSolution {
    pub fn all_reachable(&self) -> bool {
        self.unreachable.is_empty()
    }
}

/// Wrap an angle in degrees into (-180, 180].
fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Solve joint angles placing the foot of `leg` at `target`, given in the
/// leg's mount-local frame.
///
/// Out-of-reach targets are clamped to the nearest bound of the femur/tibia
/// annulus and reported in [`LegIk::unreachable`].
pub fn solve_leg(leg: LegId, target: &Point3D, lengths: &LegLengths) -> LegIk {
    let femur = lengths.femur;
    let tibia = lengths.tibia;

    let alpha = target.y.atan2(target.x);
    let horizontal_reach = target.x.hypot(target.y) - lengths.coxa;
    let vertical_drop = target.z;
    let planar_distance = horizontal_reach.hypot(vertical_drop);

    let (lo, hi) = (lengths.min_reach(), lengths.max_reach());
    let (distance, unreachable) = if planar_distance > hi {
        (hi, Some(hi))
    } else if planar_distance < lo {
        (lo, Some(lo))
    } else {
        (planar_distance, None)
    };
    let unreachable = unreachable.map(|bound| IkUnreachable {
        leg,
        distance: planar_distance,
        bound,
    });

    // Bearing of the target in the leg plane; straight down when degenerate.
    let bearing = if planar_distance < DEGENERATE_EPS {
        -FRAC_PI_2
    } else {
        vertical_drop.atan2(horizontal_reach)
    };

    let femur_offset = if distance < DEGENERATE_EPS {
        0.0
    } else {
        ((femur * femur + distance * distance - tibia * tibia) / (2.0 * femur * distance))
            .clamp(-1.0, 1.0)
            .acos()
    };
    let knee = ((femur * femur + tibia * tibia - distance * distance) / (2.0 * femur * tibia))
        .clamp(-1.0, 1.0)
        .acos();

    LegIk {
        angles: JointAngles {
            alpha: alpha.to_degrees(),
            beta: wrap_degrees((bearing + femur_offset).to_degrees()),
            gamma: knee.to_degrees() - 90.0,
        },
        unreachable,
    }
}

/// Solve all six legs for a new body pose while the feet stay at `anchors`.
///
/// `pose` is absolute with respect to the neutral stance. The call either
/// produces angles for every leg (clamping unreachable ones) or fails as a
/// whole.
///
/// # Errors
///
/// Returns [`HexapodError::MalformedInput`] if the pose or any anchor is
/// non-finite or the pose exceeds its rotation limits.
pub fn solve_body_ik(
    pose: &BodyPose,
    anchors: &[Point3D; LEG_COUNT],
    mounts: &[MountFrame; LEG_COUNT],
    lengths: &LegLengths,
) -> Result<BodyIkSolution, HexapodError> {
    pose.validate()?;
    for (leg, anchor) in LegId::ALL.iter().zip(anchors) {
        ensure_finite(&format!("anchor of leg {leg}"), anchor.as_slice())?;
    }

    let body = body_transform(pose, lengths);
    let mut angles = [JointAngles::ZERO; LEG_COUNT];
    let mut unreachable = Vec::new();

    for (mount, anchor) in mounts.iter().zip(anchors) {
        let local = mount
            .world_isometry(&body)
            .inverse_transform_point(&Point3::from(*anchor))
            .coords;
        let solved = solve_leg(mount.leg, &local, lengths);
        if let Some(u) = solved.unreachable {
            warn!(
                leg = %u.leg,
                distance = u.distance,
                bound = u.bound,
                "hexapod-ik: anchor out of reach, clamping"
            );
            unreachable.push(u);
        }
        angles[mount.leg.index()] = solved.angles;
    }

    debug!(
        roll = pose.roll,
        pitch = pose.pitch,
        yaw = pose.yaw,
        clamped = unreachable.len(),
        "hexapod-ik: body pose solved"
    );

    Ok(BodyIkSolution {
        body,
        angles,
        unreachable,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{local_chain, solve_forward};
    use crate::geometry::compute_body_outline;
    use approx::assert_relative_eq;
    use hexapod_test_utils::reference_lengths;
    use nalgebra::Vector3;

    fn lengths() -> LegLengths {
        reference_lengths()
    }

    fn leg0() -> LegId {
        LegId::ALL[0]
    }

    #[test]
    fn worked_example() {
        let target = Vector3::new(8.0, 0.0, -2.0);
        let ik = solve_leg(leg0(), &target, &lengths());
        assert!(ik.unreachable.is_none());
        assert_relative_eq!(ik.angles.alpha, 0.0);

        // Law of cosines on (5, 7, sqrt(29)).
        let d = 29.0_f64.sqrt();
        let bearing = (-2.0_f64).atan2(5.0);
        let femur_offset = ((25.0 + 29.0 - 49.0) / (10.0 * d)).acos();
        let knee = ((25.0 + 49.0 - 29.0) / 70.0_f64).acos();
        assert_relative_eq!(
            ik.angles.beta,
            (bearing + femur_offset).to_degrees(),
            epsilon = 1e-12
        );
        assert_relative_eq!(ik.angles.gamma, knee.to_degrees() - 90.0, epsilon = 1e-12);

        let again = solve_leg(leg0(), &target, &lengths());
        assert_eq!(ik.angles.beta.to_bits(), again.angles.beta.to_bits());
        assert_eq!(ik.angles.gamma.to_bits(), again.angles.gamma.to_bits());
    }

    #[test]
    fn foot_hangs_below_knee() {
        let target = Vector3::new(8.0, 0.0, -2.0);
        let ik = solve_leg(leg0(), &target, &lengths());
        let chain = local_chain(&lengths(), &ik.angles);
        assert!(chain.femur_tibia.z > chain.foot_tip.z);
    }

    #[test]
    fn neutral_stance_solves_to_zero() {
        let ik = solve_leg(leg0(), &Vector3::new(8.0, 0.0, -7.0), &lengths());
        assert_relative_eq!(ik.angles.alpha, 0.0, epsilon = 1e-9);
        assert_relative_eq!(ik.angles.beta, 0.0, epsilon = 1e-9);
        assert_relative_eq!(ik.angles.gamma, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn round_trip_through_forward_kinematics() {
        let l = lengths();
        for target in [
            Vector3::new(8.0, 0.0, -2.0),
            Vector3::new(5.0, 4.0, -6.0),
            Vector3::new(-3.0, 7.0, 1.5),
            Vector3::new(9.0, -2.0, -8.5),
        ] {
            let ik = solve_leg(leg0(), &target, &l);
            assert!(ik.unreachable.is_none(), "{target:?} should be reachable");
            let chain = local_chain(&l, &ik.angles);
            assert_relative_eq!(chain.foot_tip, target, epsilon = 1e-9);
        }
    }

    #[test]
    fn too_far_clamps_to_outer_bound() {
        let l = lengths();
        let ik = solve_leg(leg0(), &Vector3::new(20.0, 0.0, -3.0), &l);
        let u = ik.unreachable.expect("target beyond reach");
        assert_relative_eq!(u.bound, 12.0);
        assert!(u.distance > 12.0);

        let chain = local_chain(&l, &ik.angles);
        assert_relative_eq!(
            (chain.foot_tip - chain.coxa_femur).norm(),
            12.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn too_close_clamps_to_inner_bound() {
        let l = lengths();
        let ik = solve_leg(leg0(), &Vector3::new(4.0, 0.0, -0.5), &l);
        let u = ik.unreachable.expect("target inside inner radius");
        assert_relative_eq!(u.bound, 2.0);

        let chain = local_chain(&l, &ik.angles);
        assert_relative_eq!(
            (chain.foot_tip - chain.coxa_femur).norm(),
            2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn degenerate_target_is_finite() {
        let l = LegLengths::new(3.0, 5.0, 5.0).unwrap();
        let ik = solve_leg(leg0(), &Vector3::new(3.0, 0.0, 0.0), &l);
        assert!(ik.angles.beta.is_finite());
        assert!(ik.angles.gamma.is_finite());
    }

    #[test]
    fn wrap_degrees_range() {
        assert_relative_eq!(wrap_degrees(190.0), -170.0);
        assert_relative_eq!(wrap_degrees(-180.0), 180.0);
        assert_relative_eq!(wrap_degrees(45.0), 45.0);
    }

    #[test]
    fn body_ik_neutral_pose_is_identity() {
        let l = lengths();
        let outline = compute_body_outline(4.0, 6.0, 6.0).unwrap();
        let body = body_transform(&BodyPose::NEUTRAL, &l);
        let anchors = outline
            .mounts
            .map(|m| solve_forward(&m, &body, &l, &JointAngles::ZERO).foot_tip);

        let solution = solve_body_ik(&BodyPose::NEUTRAL, &anchors, &outline.mounts, &l).unwrap();
        assert!(solution.all_reachable());
        for angles in solution.angles {
            assert_relative_eq!(angles.alpha, 0.0, epsilon = 1e-9);
            assert_relative_eq!(angles.beta, 0.0, epsilon = 1e-9);
            assert_relative_eq!(angles.gamma, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn body_ik_keeps_feet_planted() {
        let l = lengths();
        let outline = compute_body_outline(4.0, 6.0, 6.0).unwrap();
        let body = body_transform(&BodyPose::NEUTRAL, &l);
        let anchors = outline
            .mounts
            .map(|m| solve_forward(&m, &body, &l, &JointAngles::ZERO).foot_tip);

        let pose = BodyPose::new([8.0, -5.0, 12.0], [0.8, -0.6, 1.0]).unwrap();
        let solution = solve_body_ik(&pose, &anchors, &outline.mounts, &l).unwrap();
        assert!(solution.all_reachable());
        for mount in &outline.mounts {
            let chain = solve_forward(mount, &solution.body, &l, &solution.angles[mount.leg.index()]);
            assert_relative_eq!(chain.foot_tip, anchors[mount.leg.index()], epsilon = 1e-9);
        }
    }

    #[test]
    fn body_ik_reports_unreachable_legs() {
        let l = lengths();
        let outline = compute_body_outline(4.0, 6.0, 6.0).unwrap();
        let body = body_transform(&BodyPose::NEUTRAL, &l);
        let anchors = outline
            .mounts
            .map(|m| solve_forward(&m, &body, &l, &JointAngles::ZERO).foot_tip);

        // Raising the body by a full tibia stretches every leg past its reach.
        let pose = BodyPose::new([0.0; 3], [0.0, 0.0, 10.0]).unwrap();
        let solution = solve_body_ik(&pose, &anchors, &outline.mounts, &l).unwrap();
        assert_eq!(solution.unreachable.len(), LEG_COUNT);
        for u in &solution.unreachable {
            assert_relative_eq!(u.bound, l.max_reach());
        }
    }

    #[test]
    fn body_ik_rejects_malformed_input() {
        let l = lengths();
        let outline = compute_body_outline(4.0, 6.0, 6.0).unwrap();
        let mut anchors = [Vector3::zeros(); LEG_COUNT];
        let nan_pose = BodyPose {
            roll: f64::NAN,
            ..BodyPose::NEUTRAL
        };
        assert!(matches!(
            solve_body_ik(&nan_pose, &anchors, &outline.mounts, &l),
            Err(HexapodError::MalformedInput(_))
        ));

        anchors[4].y = f64::INFINITY;
        assert!(matches!(
            solve_body_ik(&BodyPose::NEUTRAL, &anchors, &outline.mounts, &l),
            Err(HexapodError::MalformedInput(_))
        ));
    }
}
