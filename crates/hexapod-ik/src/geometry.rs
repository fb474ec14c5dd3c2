//! Body outline and leg mount frames derived from the body dimensions.
//!
//! The body frame has x pointing right, y pointing toward the head and z up.
//! Legs mount at the six outline vertices, numbered counter-clockwise from
//! the right-middle vertex.

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use hexapod_core::error::HexapodError;
use hexapod_core::types::{BodyDimensions, BodyPose, LegId, LegLengths, Point3D, LEG_COUNT};

/// Mount yaw of each leg (degrees), measured counter-clockwise from +x.
const MOUNT_YAW_DEG: [f64; LEG_COUNT] = [0.0, 45.0, 135.0, 180.0, 225.0, 315.0];

/// Fixed placement of one leg's coxa joint relative to the body center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountFrame {
    pub leg: LegId,
    /// Mount point in the body frame.
    pub offset: Point3D,
    /// Outward direction of the coxa at alpha = 0, in degrees about +z.
    pub yaw: f64,
}

impl MountFrame {
    /// Transform from the mount-local frame to the body frame.
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.offset),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), self.yaw.to_radians()),
        )
    }

    /// Transform from the mount-local frame to the world frame.
    pub fn world_isometry(&self, body: &Isometry3<f64>) -> Isometry3<f64> {
        body * self.isometry()
    }
}

/// Body geometry for one set of dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyOutline {
    /// Outline vertices in the body frame, one per leg in leg order.
    pub vertices: [Point3D; LEG_COUNT],
    /// Head marker in the body frame.
    pub head: Point3D,
    pub mounts: [MountFrame; LEG_COUNT],
}

impl BodyOutline {
    /// Outline for dimensions that have already passed
    /// [`BodyDimensions::validate`].
    pub fn from_dimensions(dims: &BodyDimensions) -> Self {
        outline(dims.front, dims.middle, dims.side)
    }

    pub fn mount(&self, leg: LegId) -> &MountFrame {
        &self.mounts[leg.index()]
    }

    /// Outline vertices placed in the world by `body`.
    pub fn world_vertices(&self, body: &Isometry3<f64>) -> [Point3D; LEG_COUNT] {
        self.vertices.map(|v| transform_point(body, &v))
    }

    /// Head marker placed in the world by `body`.
    pub fn world_head(&self, body: &Isometry3<f64>) -> Point3D {
        transform_point(body, &self.head)
    }
}

/// Compute the outline, head and mount frames for front `f`, middle `m` and
/// side `s` dimensions.
///
/// # Errors
///
/// Returns [`HexapodError::InvalidDimension`] if any dimension is not a
/// positive finite number.
pub fn compute_body_outline(f: f64, m: f64, s: f64) -> Result<BodyOutline, HexapodError> {
    for (field, value) in [("front", f), ("middle", m), ("side", s)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(HexapodError::InvalidDimension {
                field,
                value,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
    }
    Ok(outline(f, m, s))
}

fn outline(f: f64, m: f64, s: f64) -> BodyOutline {
    let vertices = [
        Vector3::new(m, 0.0, 0.0),
        Vector3::new(f, s, 0.0),
        Vector3::new(-f, s, 0.0),
        Vector3::new(-m, 0.0, 0.0),
        Vector3::new(-f, -s, 0.0),
        Vector3::new(f, -s, 0.0),
    ];
    let mounts = LegId::ALL.map(|leg| MountFrame {
        leg,
        offset: vertices[leg.index()],
        yaw: MOUNT_YAW_DEG[leg.index()],
    });

    BodyOutline {
        vertices,
        head: Vector3::new(0.0, s, 0.0),
        mounts,
    }
}

/// World transform of the body frame for a pose.
///
/// The neutral body center sits `lengths.tibia` above the ground so that the
/// all-zero stance puts every foot at z = 0.
pub fn body_transform(pose: &BodyPose, lengths: &LegLengths) -> Isometry3<f64> {
    let center = Vector3::new(0.0, 0.0, lengths.tibia) + pose.translation();
    Isometry3::from_parts(Translation3::from(center), pose.rotation())
}

pub(crate) fn transform_point(iso: &Isometry3<f64>, p: &Point3D) -> Point3D {
    iso.transform_point(&Point3::from(*p)).coords
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
