//! Forward kinematics for one coxa/femur/tibia leg.
//!
//! The chain is evaluated as a product of rigid transforms starting at the
//! leg's world mount frame:
//!
//! ```text
//! mount ─ Rz(alpha) ─ coxa ─ Rp(beta) ─ femur ─ Rp(gamma - 90°) ─ tibia ─ foot
//! ```
//!
//! where `Rp` is the pitch rotation that raises the segment above the
//! mount-local horizontal plane.

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use hexapod_core::types::{JointAngles, LegLengths, Point3D};

use crate::geometry::MountFrame;

/// World positions of one leg's joints, proximal to distal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegChain {
    pub mount: Point3D,
    pub coxa_femur: Point3D,
    pub femur_tibia: Point3D,
    pub foot_tip: Point3D,
}

impl LegChain {
    /// The four joint points in chain order.
    pub fn points(&self) -> [Point3D; 4] {
        [self.mount, self.coxa_femur, self.femur_tibia, self.foot_tip]
    }
}

/// Axis whose positive rotation elevates a segment pointing along local +x.
fn pitch_axis() -> Unit<Vector3<f64>> {
    Unit::new_unchecked(Vector3::new(0.0, -1.0, 0.0))
}

fn rotation(axis: &Unit<Vector3<f64>>, degrees: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::identity(),
        UnitQuaternion::from_axis_angle(axis, degrees.to_radians()),
    )
}

fn segment(length: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(length, 0.0, 0.0),
        UnitQuaternion::identity(),
    )
}

/// Evaluate the chain starting at `base` and return the joint positions in
/// the frame `base` maps into.
fn evaluate(base: Isometry3<f64>, lengths: &LegLengths, angles: &JointAngles) -> LegChain {
    let mut transform = base;
    let mount = transform.translation.vector;

    transform *= rotation(&Vector3::z_axis(), angles.alpha);
    transform *= segment(lengths.coxa);
    let coxa_femur = transform.translation.vector;

    transform *= rotation(&pitch_axis(), angles.beta);
    transform *= segment(lengths.femur);
    let femur_tibia = transform.translation.vector;

    // At gamma = 0 the tibia hangs perpendicular to the femur.
    transform *= rotation(&pitch_axis(), angles.gamma - 90.0);
    transform *= segment(lengths.tibia);
    let foot_tip = transform.translation.vector;

    LegChain {
        mount,
        coxa_femur,
        femur_tibia,
        foot_tip,
    }
}

/// Joint positions in the leg's own mount frame.
pub fn local_chain(lengths: &LegLengths, angles: &JointAngles) -> LegChain {
    evaluate(Isometry3::identity(), lengths, angles)
}

/// Joint positions in the world for a leg mounted at `mount` on a body placed
/// by `body`.
///
/// Never fails; angle validity is enforced by callers.
pub fn solve_forward(
    mount: &MountFrame,
    body: &Isometry3<f64>,
    lengths: &LegLengths,
    angles: &JointAngles,
) -> LegChain {
    evaluate(mount.world_isometry(body), lengths, angles)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
