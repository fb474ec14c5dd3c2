//! Shared test fixtures and utilities for hexapod crates.
//!
//! Provides proptest strategies over the valid control ranges and tolerance
//! helpers for comparing joint chains.

pub mod fixtures;
pub mod strategies;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use fixtures::{assert_points_close, max_point_distance, reference_lengths};
pub use strategies::{arb_body_dimensions, arb_joint_angles, arb_leg_lengths, arb_tilt};
