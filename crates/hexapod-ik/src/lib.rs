//! Kinematics for a six-legged robot.
//!
//! Provides the parametric body outline and leg mount frames, forward
//! kinematics for the three-segment legs, and an analytic inverse-kinematics
//! solver for single legs and for whole-body pose changes over planted feet.
//!
//! # Architecture
//!
//! ```text
//! BodyDimensions ──► BodyOutline (mount frames)
//!                          │
//! BodyPose + JointAngles ──┴──► solve_forward ──► LegChain (world points)
//!
//! BodyPose + anchored feet ──► solve_body_ik ──► solve_leg ×6 ──► JointAngles
//! ```

pub mod chain;
pub mod geometry;
pub mod solver;

pub use chain::{local_chain, solve_forward, LegChain};
pub use geometry::{body_transform, compute_body_outline, BodyOutline, MountFrame};
pub use solver::{solve_body_ik, solve_leg, BodyIkSolution, LegIk};
