//! Value types shared by every hexapod crate.
//!
//! Angles are in degrees at this boundary; lengths are in the same arbitrary
//! length unit as the body dimensions.

use std::fmt;
use std::time::Duration;

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, HexapodError};

/// A 3D position in the world or a local frame.
pub type Point3D = Vector3<f64>;

/// Number of legs on the robot.
pub const LEG_COUNT: usize = 6;

/// Valid range for body dimensions and leg segment lengths.
pub const DIMENSION_MIN: f64 = 1.0;
pub const DIMENSION_MAX: f64 = 20.0;

/// Valid range for each joint angle (degrees).
pub const JOINT_ANGLE_LIMIT_DEG: f64 = 180.0;

/// Valid range for each body rotation component (degrees).
pub const BODY_TILT_LIMIT_DEG: f64 = 30.0;

// ---------------------------------------------------------------------------
// Leg identity
// ---------------------------------------------------------------------------

/// Which side of the longitudinal axis a leg is mounted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Leg identifier, 0..6, counter-clockwise from the right-middle leg.
///
/// | id | position     |
/// |----|--------------|
/// | 0  | right-middle |
/// | 1  | right-front  |
/// | 2  | left-front   |
/// | 3  | left-middle  |
/// | 4  | left-back    |
/// | 5  | right-back   |
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LegId(u8);

impl LegId {
    /// All six legs in id order.
    pub const ALL: [LegId; LEG_COUNT] = [
        LegId(0),
        LegId(1),
        LegId(2),
        LegId(3),
        LegId(4),
        LegId(5),
    ];

    /// Returns `None` if `id >= 6`.
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < LEG_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn side(self) -> Side {
        match self.0 {
            2..=4 => Side::Left,
            _ => Side::Right,
        }
    }

    /// Human-readable mount position.
    pub const fn name(self) -> &'static str {
        match self.0 {
            0 => "right-middle",
            1 => "right-front",
            2 => "left-front",
            3 => "left-middle",
            4 => "left-back",
            _ => "right-back",
        }
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for LegId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("leg id {value} out of range 0..{LEG_COUNT}"))
    }
}

impl From<LegId> for u8 {
    fn from(id: LegId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

fn check_dimension(field: &'static str, value: f64) -> Result<(), HexapodError> {
    if value.is_finite() && (DIMENSION_MIN..=DIMENSION_MAX).contains(&value) {
        Ok(())
    } else {
        Err(HexapodError::InvalidDimension {
            field,
            value,
            min: DIMENSION_MIN,
            max: DIMENSION_MAX,
        })
    }
}

/// Body outline dimensions: front and middle half-widths, side half-length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyDimensions {
    pub front: f64,
    pub middle: f64,
    pub side: f64,
}

impl Default for BodyDimensions {
    fn default() -> Self {
        Self {
            front: 4.0,
            middle: 6.0,
            side: 6.0,
        }
    }
}

impl BodyDimensions {
    pub fn new(front: f64, middle: f64, side: f64) -> Result<Self, HexapodError> {
        let dims = Self {
            front,
            middle,
            side,
        };
        dims.validate()?;
        Ok(dims)
    }

    pub fn validate(&self) -> Result<(), HexapodError> {
        check_dimension("front", self.front)?;
        check_dimension("middle", self.middle)?;
        check_dimension("side", self.side)
    }
}

/// Coxa, femur and tibia lengths, shared by all six legs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegLengths {
    pub coxa: f64,
    pub femur: f64,
    pub tibia: f64,
}

impl Default for LegLengths {
    fn default() -> Self {
        Self {
            coxa: 3.0,
            femur: 5.0,
            tibia: 7.0,
        }
    }
}

impl LegLengths {
    pub fn new(coxa: f64, femur: f64, tibia: f64) -> Result<Self, HexapodError> {
        let lengths = Self { coxa, femur, tibia };
        lengths.validate()?;
        Ok(lengths)
    }

    pub fn validate(&self) -> Result<(), HexapodError> {
        check_dimension("coxa", self.coxa)?;
        check_dimension("femur", self.femur)?;
        check_dimension("tibia", self.tibia)
    }

    /// Smallest planar femur-joint-to-foot distance the femur/tibia pair reaches.
    pub fn min_reach(&self) -> f64 {
        (self.femur - self.tibia).abs()
    }

    /// Largest planar femur-joint-to-foot distance the femur/tibia pair reaches.
    pub fn max_reach(&self) -> f64 {
        self.femur + self.tibia
    }
}

// ---------------------------------------------------------------------------
// Joint angles
// ---------------------------------------------------------------------------

/// One leg's joint angles in degrees.
///
/// `alpha` is coxa yaw, `beta` femur pitch, `gamma` tibia pitch relative to the
/// femur. All zeros is the neutral stance: femur horizontal, tibia vertical.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl JointAngles {
    pub const ZERO: Self = Self {
        alpha: 0.0,
        beta: 0.0,
        gamma: 0.0,
    };

    pub const fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// Finite and each component within ±180°.
    pub fn validate(&self) -> Result<(), HexapodError> {
        ensure_finite("joint angles", &[self.alpha, self.beta, self.gamma])?;
        for (name, v) in [("alpha", self.alpha), ("beta", self.beta), ("gamma", self.gamma)] {
            if v.abs() > JOINT_ANGLE_LIMIT_DEG {
                return Err(HexapodError::MalformedInput(format!(
                    "{name} = {v} outside [-{JOINT_ANGLE_LIMIT_DEG}, {JOINT_ANGLE_LIMIT_DEG}]"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Body pose
// ---------------------------------------------------------------------------

/// Rigid body transform relative to the neutral standing pose.
///
/// Rotation is roll (x), pitch (y), yaw (z) in degrees, applied as
/// `Rz(yaw) * Ry(pitch) * Rx(roll)`. Translation is added to the neutral body
/// center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub tx: f64,
    pub ty: f64,
    pub tz: f64,
}

impl BodyPose {
    pub const NEUTRAL: Self = Self {
        roll: 0.0,
        pitch: 0.0,
        yaw: 0.0,
        tx: 0.0,
        ty: 0.0,
        tz: 0.0,
    };

    pub fn new(rotation: [f64; 3], translation: [f64; 3]) -> Result<Self, HexapodError> {
        let pose = Self {
            roll: rotation[0],
            pitch: rotation[1],
            yaw: rotation[2],
            tx: translation[0],
            ty: translation[1],
            tz: translation[2],
        };
        pose.validate()?;
        Ok(pose)
    }

    /// Build a pose from control-surface values.
    ///
    /// `normalized` translations lie in [-1, 1] and are scaled by the body front
    /// dimension (x), side dimension (y) and tibia length (z).
    pub fn from_normalized(
        rotation: [f64; 3],
        normalized: [f64; 3],
        dims: &BodyDimensions,
        lengths: &LegLengths,
    ) -> Result<Self, HexapodError> {
        ensure_finite("normalized translation", &normalized)?;
        if normalized.iter().any(|v| v.abs() > 1.0) {
            return Err(HexapodError::MalformedInput(format!(
                "normalized translation {normalized:?} outside [-1, 1]"
            )));
        }
        Self::new(
            rotation,
            [
                normalized[0] * dims.front,
                normalized[1] * dims.side,
                normalized[2] * lengths.tibia,
            ],
        )
    }

    pub fn validate(&self) -> Result<(), HexapodError> {
        ensure_finite(
            "body pose",
            &[self.roll, self.pitch, self.yaw, self.tx, self.ty, self.tz],
        )?;
        for (name, v) in [("roll", self.roll), ("pitch", self.pitch), ("yaw", self.yaw)] {
            if v.abs() > BODY_TILT_LIMIT_DEG {
                return Err(HexapodError::MalformedInput(format!(
                    "{name} = {v} outside [-{BODY_TILT_LIMIT_DEG}, {BODY_TILT_LIMIT_DEG}]"
                )));
            }
        }
        Ok(())
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_euler_angles(
            self.roll.to_radians(),
            self.pitch.to_radians(),
            self.yaw.to_radians(),
        )
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.tx, self.ty, self.tz)
    }
}

// ---------------------------------------------------------------------------
// Gait parameters
// ---------------------------------------------------------------------------

/// Supported walking gaits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitType {
    /// Two alternating triads; one always in stance.
    #[default]
    Tripod,
    /// One leg swings at a time; five always in stance.
    Ripple,
}

impl GaitType {
    /// Number of StepNum-long phase windows in one cycle.
    pub const fn phase_groups(self) -> usize {
        match self {
            Self::Tripod => 2,
            Self::Ripple => 6,
        }
    }
}

/// Travel direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Whether a foot is planted or repositioning at a gait sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegPhase {
    Stance,
    Swing,
}

/// Walking gait configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitParameters {
    /// Hip sweep amplitude in degrees.
    pub hip_swing: f64,
    /// Peak foot lift during swing, in length units.
    pub lift_swing: f64,
    /// Samples per phase window.
    pub step_num: u32,
    /// Cycles per unit time; only consumed by the external playback clock.
    pub speed: f64,
    pub gait_type: GaitType,
    pub direction: Direction,
    pub rotate_in_place: bool,
}

impl Default for GaitParameters {
    fn default() -> Self {
        Self {
            hip_swing: 12.0,
            lift_swing: 3.0,
            step_num: 10,
            speed: 10.0,
            gait_type: GaitType::Tripod,
            direction: Direction::Forward,
            rotate_in_place: false,
        }
    }
}

impl GaitParameters {
    pub fn validate(&self, limits: &GaitLimits) -> Result<(), HexapodError> {
        let invalid = |msg: String| Err(HexapodError::InvalidGaitParameters(msg));

        if self.step_num < 1 {
            return invalid("step_num must be >= 1".into());
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return invalid(format!("speed must be > 0, got {}", self.speed));
        }
        if self.speed > limits.max_speed {
            return invalid(format!(
                "speed {} exceeds maximum {}",
                self.speed, limits.max_speed
            ));
        }
        let [lo, hi] = limits.hip_swing;
        if !(lo..=hi).contains(&self.hip_swing) {
            return invalid(format!(
                "hip_swing {} outside [{lo}, {hi}]",
                self.hip_swing
            ));
        }
        let [lo, hi] = limits.lift_swing;
        if !(lo..=hi).contains(&self.lift_swing) {
            return invalid(format!(
                "lift_swing {} outside [{lo}, {hi}]",
                self.lift_swing
            ));
        }
        Ok(())
    }

    /// Total samples in one gait cycle.
    pub fn cycle_len(&self) -> usize {
        self.step_num as usize * self.gait_type.phase_groups()
    }

    /// Period between frames for an external clock driving playback, or
    /// `None` when `speed` is not a positive finite number.
    pub fn frame_interval(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / self.speed).ok()
    }
}

/// Accepted ranges for the gait control surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitLimits {
    /// [min, max] hip sweep amplitude (degrees).
    pub hip_swing: [f64; 2],
    /// [min, max] foot lift (length units).
    pub lift_swing: [f64; 2],
    /// Upper bound on speed; the lower bound is exclusive zero.
    pub max_speed: f64,
}

impl Default for GaitLimits {
    fn default() -> Self {
        Self {
            hip_swing: [10.0, 40.0],
            lift_swing: [1.0, 10.0],
            max_speed: 20.0,
        }
    }
}
