//! Gait schedule for six-legged walking.
//!
//! A cycle is `step_num × phase_groups` samples long. Every leg spends
//! `step_num` samples in swing and the rest of the cycle in stance; gaits
//! differ only in where each leg's stance window starts:
//! - Tripod: legs {0, 2, 4} start stance at 0, legs {1, 3, 5} at `step_num`
//! - Ripple: legs swing one at a time, in the order 5, 2, 0, 4, 1, 3

use hexapod_core::types::{GaitType, LegId, LegPhase, LEG_COUNT};

/// Ripple swing slot per leg: slot `k` swings during
/// `[k * step_num, (k + 1) * step_num)`.
///
/// Each side swings back to front, the two sides interleaved half a cycle
/// apart.
const RIPPLE_SWING_SLOT: [usize; LEG_COUNT] = [2, 4, 1, 5, 3, 0];

/// Per-leg stance/swing timing over one discrete gait cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GaitSchedule {
    gait_type: GaitType,
    /// Sample at which each leg's stance window opens.
    stance_starts: [usize; LEG_COUNT],
    stance_len: usize,
    swing_len: usize,
}

impl GaitSchedule {
    /// Build the schedule for `gait_type` with `step_num` samples per phase
    /// window.
    ///
    /// # Panics
    ///
    /// Panics if `step_num == 0`; gait parameters are validated before this.
    pub fn new(gait_type: GaitType, step_num: usize) -> Self {
        assert!(step_num > 0, "step_num must be >= 1");
        let groups = gait_type.phase_groups();
        let cycle_len = step_num * groups;

        let stance_starts = match gait_type {
            GaitType::Tripod => {
                LegId::ALL.map(|leg| if leg.index() % 2 == 0 { 0 } else { step_num })
            }
            GaitType::Ripple => LegId::ALL
                .map(|leg| ((RIPPLE_SWING_SLOT[leg.index()] + 1) * step_num) % cycle_len),
        };

        Self {
            gait_type,
            stance_starts,
            stance_len: step_num * (groups - 1),
            swing_len: step_num,
        }
    }

    pub const fn gait_type(&self) -> GaitType {
        self.gait_type
    }

    /// Samples per gait cycle.
    pub const fn cycle_len(&self) -> usize {
        self.stance_len + self.swing_len
    }

    pub const fn stance_len(&self) -> usize {
        self.stance_len
    }

    pub const fn swing_len(&self) -> usize {
        self.swing_len
    }

    /// Fraction of the cycle each leg spends in stance.
    pub fn duty_factor(&self) -> f64 {
        self.stance_len as f64 / self.cycle_len() as f64
    }

    pub fn stance_start(&self, leg: LegId) -> usize {
        self.stance_starts[leg.index()]
    }

    /// Position of `sample` within `leg`'s own cycle, counted from the start
    /// of its stance window.
    pub fn local_index(&self, leg: LegId, sample: usize) -> usize {
        let n = self.cycle_len();
        (sample % n + n - self.stance_starts[leg.index()]) % n
    }

    pub fn phase(&self, leg: LegId, sample: usize) -> LegPhase {
        if self.local_index(leg, sample) < self.stance_len {
            LegPhase::Stance
        } else {
            LegPhase::Swing
        }
    }

    /// Phase of `leg` at `sample` and the normalized progress through that
    /// sub-phase.
    ///
    /// Stance progress lies in [0, 1). Swing samples sit strictly inside
    /// (0, 1) at `(k + 1) / (swing_len + 1)`, so every swing sample is
    /// airborne and a single-sample swing lands on the lift peak.
    pub fn progress(&self, leg: LegId, sample: usize) -> (LegPhase, f64) {
        let j = self.local_index(leg, sample);
        if j < self.stance_len {
            (LegPhase::Stance, j as f64 / self.stance_len as f64)
        } else {
            let k = j - self.stance_len;
            (
                LegPhase::Swing,
                (k + 1) as f64 / (self.swing_len + 1) as f64,
            )
        }
    }

    /// Contact flags for every sample of the cycle: `contacts[sample][leg]`.
    pub fn contact_sequence(&self) -> Vec<[bool; LEG_COUNT]> {
        (0..self.cycle_len())
            .map(|sample| LegId::ALL.map(|leg| self.phase(leg, sample) == LegPhase::Stance))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stance_count(contacts: &[bool; LEG_COUNT]) -> usize {
        contacts.iter().filter(|&&c| c).count()
    }

    #[test]
    fn tripod_lengths() {
        let s = GaitSchedule::new(GaitType::Tripod, 10);
        assert_eq!(s.cycle_len(), 20);
        assert_eq!(s.stance_len(), 10);
        assert_eq!(s.swing_len(), 10);
        assert_relative_eq!(s.duty_factor(), 0.5);
    }

    #[test]
    fn ripple_lengths() {
        let s = GaitSchedule::new(GaitType::Ripple, 4);
        assert_eq!(s.cycle_len(), 24);
        assert_eq!(s.stance_len(), 20);
        assert_eq!(s.swing_len(), 4);
        assert_relative_eq!(s.duty_factor(), 5.0 / 6.0);
    }

    #[test]
    fn tripod_groups_alternate() {
        let s = GaitSchedule::new(GaitType::Tripod, 10);
        for sample in 0..20 {
            for leg in LegId::ALL {
                let even_group = leg.index() % 2 == 0;
                let first_half = sample < 10;
                let expected = if even_group == first_half {
                    LegPhase::Stance
                } else {
                    LegPhase::Swing
                };
                assert_eq!(s.phase(leg, sample), expected, "leg {leg} sample {sample}");
            }
        }
    }

    #[test]
    fn tripod_three_in_stance_everywhere() {
        let s = GaitSchedule::new(GaitType::Tripod, 7);
        for contacts in s.contact_sequence() {
            assert_eq!(stance_count(&contacts), 3);
        }
    }

    #[test]
    fn ripple_one_in_swing_everywhere() {
        let s = GaitSchedule::new(GaitType::Ripple, 3);
        let contacts = s.contact_sequence();
        assert_eq!(contacts.len(), 18);
        for c in &contacts {
            assert_eq!(stance_count(c), 5);
        }
    }

    #[test]
    fn ripple_swing_order() {
        let n = 5;
        let s = GaitSchedule::new(GaitType::Ripple, n);
        let order: Vec<usize> = (0..6)
            .map(|slot| {
                LegId::ALL
                    .iter()
                    .find(|&&leg| s.phase(leg, slot * n) == LegPhase::Swing)
                    .unwrap()
                    .index()
            })
            .collect();
        assert_eq!(order, vec![5, 2, 0, 4, 1, 3]);
    }

    #[test]
    fn progress_resets_each_sub_phase() {
        let s = GaitSchedule::new(GaitType::Tripod, 4);
        let leg = LegId::ALL[0];
        assert_eq!(s.progress(leg, 0), (LegPhase::Stance, 0.0));
        assert_eq!(s.progress(leg, 2), (LegPhase::Stance, 0.5));
        assert_eq!(s.progress(leg, 4), (LegPhase::Swing, 0.2));
        assert_eq!(s.progress(leg, 7), (LegPhase::Swing, 0.8));
        // Wraps cyclically.
        assert_eq!(s.progress(leg, 8), (LegPhase::Stance, 0.0));
    }

    #[test]
    fn single_step_tripod_is_valid() {
        let s = GaitSchedule::new(GaitType::Tripod, 1);
        assert_eq!(s.cycle_len(), 2);
        assert_eq!(s.phase(LegId::ALL[1], 0), LegPhase::Swing);
        assert_eq!(s.phase(LegId::ALL[1], 1), LegPhase::Stance);
    }

    #[test]
    fn swing_progress_stays_inside_the_window() {
        for step_num in 1..=6 {
            let s = GaitSchedule::new(GaitType::Ripple, step_num);
            for leg in LegId::ALL {
                for sample in 0..s.cycle_len() {
                    if let (LegPhase::Swing, v) = s.progress(leg, sample) {
                        assert!(v > 0.0 && v < 1.0, "step_num {step_num} progress {v}");
                    }
                }
            }
        }
        let single = GaitSchedule::new(GaitType::Tripod, 1);
        assert_eq!(single.progress(LegId::ALL[0], 1), (LegPhase::Swing, 0.5));
    }

    #[test]
    #[should_panic(expected = "step_num")]
    fn zero_steps_panics() {
        let _ = GaitSchedule::new(GaitType::Tripod, 0);
    }
}
