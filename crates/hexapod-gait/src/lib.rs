//! Walking-gait synthesis for a six-legged robot.
//!
//! One gait cycle is generated up front and played back frame by frame:
//!
//! 1. **Gait Schedule**: per-leg phase offsets deciding, for every sample,
//!    whether a leg is in stance or swing (tripod or ripple)
//! 2. **Trajectory profiles**: linear hip sweep during stance, linear hip
//!    return plus half-sine lift during swing
//! 3. **Walking Sequence**: each (hip sweep, lift) sample converted to joint
//!    angles through the analytic leg solver
//!
//! # Architecture
//!
//! ```text
//! GaitParameters ──► GaitSchedule ──► (phase, progress) per leg/sample
//!                                            │
//!                      swing profiles ◄──────┘
//!                            │
//!                 solve_leg ─┴──► WalkingSequence
//! ```

pub mod gait;
pub mod sequence;
pub mod swing;

pub use gait::GaitSchedule;
pub use sequence::{generate_sequence, GaitSample, WalkingSequence};
pub use swing::{foot_target, hip_sweep, stance_sweep, swing_lift, swing_sweep, SweepSample};
