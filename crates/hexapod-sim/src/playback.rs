//! Discrete playback cursor over a cyclic walking sequence.
//!
//! The cursor holds no clock. An external collaborator decides when to
//! advance it, typically every [`GaitParameters::frame_interval`].
//!
//! [`GaitParameters::frame_interval`]: hexapod_core::types::GaitParameters::frame_interval

use serde::{Deserialize, Serialize};

/// Index of the next frame to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playback {
    cursor: usize,
}

impl Playback {
    pub const fn new() -> Self {
        Self { cursor: 0 }
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor to `t` wrapped into a sequence of `len` frames.
    pub fn seek(&mut self, t: usize, len: usize) {
        self.cursor = wrap_index(t, len);
    }

    /// Return the frame to apply now and advance by one, wrapping at `len`.
    pub fn advance(&mut self, len: usize) -> usize {
        let current = wrap_index(self.cursor, len);
        self.cursor = wrap_index(current + 1, len);
        current
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// `t` modulo `len`, or 0 for an empty sequence.
pub fn wrap_index(t: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        t % len
    }
}
