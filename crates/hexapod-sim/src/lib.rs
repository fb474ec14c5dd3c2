//! Stateful hexapod engine.
//!
//! [`Hexapod`] is the single mutable aggregate a renderer or control surface
//! talks to. It owns the body geometry, the six legs' joint angles and their
//! evaluated world chains, and an optional walking sequence played back by a
//! [`Playback`] cursor. Every mutating call validates first and commits
//! atomically: on error the previous state is left untouched.
//!
//! # Example
//!
//! ```
//! use hexapod_core::types::GaitParameters;
//! use hexapod_sim::Hexapod;
//!
//! let mut hexapod = Hexapod::default();
//! hexapod.generate_walking_sequence(&GaitParameters::default()).unwrap();
//! for _ in 0..hexapod.sequence_len() {
//!     hexapod.step();
//! }
//! assert_eq!(hexapod.cursor(), 0);
//! ```

pub mod hexapod;
pub mod playback;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use hexapod::{Hexapod, IkReport};
pub use playback::Playback;
