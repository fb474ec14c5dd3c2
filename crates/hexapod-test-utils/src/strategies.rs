//! Proptest strategies over the engine's valid control ranges.

use proptest::prelude::*;

use hexapod_core::types::{
    BodyDimensions, JointAngles, LegLengths, BODY_TILT_LIMIT_DEG, DIMENSION_MAX, DIMENSION_MIN,
    JOINT_ANGLE_LIMIT_DEG,
};

/// Body dimensions anywhere in the accepted range.
pub fn arb_body_dimensions() -> impl Strategy<Value = BodyDimensions> {
    prop::array::uniform3(DIMENSION_MIN..=DIMENSION_MAX).prop_map(|[front, middle, side]| {
        BodyDimensions {
            front,
            middle,
            side,
        }
    })
}

/// Leg segment lengths anywhere in the accepted range.
pub fn arb_leg_lengths() -> impl Strategy<Value = LegLengths> {
    prop::array::uniform3(DIMENSION_MIN..=DIMENSION_MAX)
        .prop_map(|[coxa, femur, tibia]| LegLengths { coxa, femur, tibia })
}

/// Joint angles anywhere in the accepted range.
pub fn arb_joint_angles() -> impl Strategy<Value = JointAngles> {
    prop::array::uniform3(-JOINT_ANGLE_LIMIT_DEG..=JOINT_ANGLE_LIMIT_DEG)
        .prop_map(|[alpha, beta, gamma]| JointAngles { alpha, beta, gamma })
}

/// One body rotation component within the tilt limit.
pub fn arb_tilt() -> impl Strategy<Value = f64> {
    -BODY_TILT_LIMIT_DEG..=BODY_TILT_LIMIT_DEG
}
