//! Property-based tests for the stateful engine.
//!
//! Run with: cargo test -p hexapod-sim -- props

use hexapod_core::types::{BodyPose, Direction, GaitParameters, GaitType};
use hexapod_sim::Hexapod;
use hexapod_test_utils::{arb_body_dimensions, arb_tilt, assert_points_close, max_point_distance};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_gait() -> impl Strategy<Value = GaitParameters> {
    (
        10.0..=40.0f64,
        1.0..=4.0f64,
        1u32..=12,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(hip_swing, lift_swing, step_num, ripple, backward, rotate)| {
            GaitParameters {
                hip_swing,
                lift_swing,
                step_num,
                gait_type: if ripple {
                    GaitType::Ripple
                } else {
                    GaitType::Tripod
                },
                direction: if backward {
                    Direction::Backward
                } else {
                    Direction::Forward
                },
                rotate_in_place: rotate,
                ..GaitParameters::default()
            }
        })
}

// =============================================================================
// Playback
// =============================================================================

proptest! {
    #[test]
    fn props_playback_is_cyclic(params in arb_gait(), t in 0usize..500, laps in 1usize..4) {
        let mut hexapod = Hexapod::default();
        let len = hexapod.generate_walking_sequence(&params).unwrap().len();
        prop_assert_eq!(len, params.cycle_len());

        hexapod.set_pose_from_sequence(t);
        let angles = *hexapod.angles();
        let feet = hexapod.ground_contact_points();
        hexapod.set_pose_from_sequence(t + laps * len);
        prop_assert_eq!(hexapod.angles(), &angles);
        prop_assert_eq!(max_point_distance(&hexapod.ground_contact_points(), &feet), 0.0);
    }

    #[test]
    fn props_step_walks_every_frame_in_order(params in arb_gait()) {
        let mut hexapod = Hexapod::default();
        let len = hexapod.generate_walking_sequence(&params).unwrap().len();
        for expected in (0..len).chain(0..len) {
            prop_assert_eq!(hexapod.step(), Some(expected));
        }
    }
}

// =============================================================================
// Body pose
// =============================================================================

proptest! {
    /// Moderate body poses over the default stance keep every foot planted.
    #[test]
    fn props_body_ik_keeps_feet_planted(
        dims in arb_body_dimensions(),
        roll in arb_tilt(),
        pitch in arb_tilt(),
        yaw in arb_tilt(),
        lift in -0.3..0.3f64,
    ) {
        let mut hexapod = Hexapod::default();
        hexapod.update_dimensions(dims, *hexapod.leg_lengths()).unwrap();
        let planted = hexapod.ground_contact_points();
        let pose = BodyPose::new([roll, pitch, yaw], [0.0, 0.0, lift]).unwrap();
        let report = hexapod.solve_ik(&pose).unwrap();
        if report.all_reachable() {
            assert_points_close(&hexapod.ground_contact_points(), &planted, 1e-6);
        } else {
            for u in &report.unreachable {
                let chain = hexapod.leg_chain(u.leg);
                prop_assert!(((chain.foot_tip - chain.coxa_femur).norm() - u.bound).abs() < 1e-9);
            }
        }
    }
}
