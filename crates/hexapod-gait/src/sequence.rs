//! One full gait cycle of joint angles for all six legs.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hexapod_core::error::HexapodError;
use hexapod_core::types::{
    GaitLimits, GaitParameters, JointAngles, LegId, LegLengths, LegPhase, Side, LEG_COUNT,
};
use hexapod_ik::{solve_leg, MountFrame};

use crate::gait::GaitSchedule;
use crate::swing::{foot_target, hip_sweep, SweepSample};

/// One leg's state at one sample of the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaitSample {
    pub angles: JointAngles,
    /// Side-normalized hip sweep in degrees (positive toward the head).
    pub hip_sweep: f64,
    pub lift: f64,
    pub phase: LegPhase,
}

/// A cyclic, phase-aligned sequence of joint angles for every leg.
///
/// All six legs hold exactly [`len`](Self::len) samples; indexing wraps
/// modulo that length. Deserialization rejects empty or ragged legs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SequenceData")]
pub struct WalkingSequence {
    params: GaitParameters,
    legs: [Vec<GaitSample>; LEG_COUNT],
    /// Samples whose foot target was clamped by the leg solver.
    clamped_samples: usize,
}

/// Unchecked wire form of [`WalkingSequence`].
#[derive(Deserialize)]
struct SequenceData {
    params: GaitParameters,
    legs: [Vec<GaitSample>; LEG_COUNT],
    clamped_samples: usize,
}

impl TryFrom<SequenceData> for WalkingSequence {
    type Error = String;

    fn try_from(data: SequenceData) -> Result<Self, Self::Error> {
        let len = data.legs[0].len();
        if len == 0 {
            return Err("walking sequence has no samples".into());
        }
        if let Some(leg) = data.legs.iter().position(|samples| samples.len() != len) {
            return Err(format!(
                "leg {leg} has {} samples, expected {len}",
                data.legs[leg].len()
            ));
        }
        Ok(Self {
            params: data.params,
            legs: data.legs,
            clamped_samples: data.clamped_samples,
        })
    }
}

impl WalkingSequence {
    pub fn params(&self) -> &GaitParameters {
        &self.params
    }

    /// Samples per cycle.
    pub fn len(&self) -> usize {
        self.legs[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clamped_samples(&self) -> usize {
        self.clamped_samples
    }

    /// Every sample of `leg`, in cycle order.
    pub fn leg(&self, leg: LegId) -> &[GaitSample] {
        &self.legs[leg.index()]
    }

    /// Sample of `leg` at index `t` modulo the cycle length.
    pub fn sample(&self, leg: LegId, t: usize) -> &GaitSample {
        let samples = &self.legs[leg.index()];
        &samples[t % samples.len()]
    }

    /// Joint angles of all legs at index `t` modulo the cycle length.
    pub fn frame(&self, t: usize) -> [JointAngles; LEG_COUNT] {
        LegId::ALL.map(|leg| self.sample(leg, t).angles)
    }

    /// Phase of all legs at index `t` modulo the cycle length.
    pub fn phases(&self, t: usize) -> [LegPhase; LEG_COUNT] {
        LegId::ALL.map(|leg| self.sample(leg, t).phase)
    }
}

/// Sweep sign for a leg: reversed for backward travel, and reversed on the
/// left side when rotating in place.
fn sweep_sign(params: &GaitParameters, side: Side) -> f64 {
    let turn = if params.rotate_in_place && side == Side::Left {
        -1.0
    } else {
        1.0
    };
    params.direction.sign() * turn
}

/// Generate one gait cycle for `params`.
///
/// # Errors
///
/// Returns [`HexapodError::InvalidGaitParameters`] if `params` violates
/// `limits`, and [`HexapodError::InvalidDimension`] for invalid `lengths`.
pub fn generate_sequence(
    params: &GaitParameters,
    limits: &GaitLimits,
    lengths: &LegLengths,
    mounts: &[MountFrame; LEG_COUNT],
) -> Result<WalkingSequence, HexapodError> {
    params.validate(limits)?;
    lengths.validate()?;

    let schedule = GaitSchedule::new(params.gait_type, params.step_num as usize);
    let cycle_len = schedule.cycle_len();
    let mut clamped_samples = 0;

    let legs = mounts.map(|mount| {
        let leg = mount.leg;
        let side = leg.side();
        let sign = sweep_sign(params, side);
        (0..cycle_len)
            .map(|t| {
                let (phase, progress) = schedule.progress(leg, t);
                let SweepSample { hip_sweep, lift } =
                    hip_sweep(phase, progress, params.hip_swing, params.lift_swing, sign);
                let target = foot_target(&SweepSample { hip_sweep, lift }, side, lengths);
                let solved = solve_leg(leg, &target, lengths);
                if solved.unreachable.is_some() {
                    clamped_samples += 1;
                }
                GaitSample {
                    angles: solved.angles,
                    hip_sweep,
                    lift,
                    phase,
                }
            })
            .collect::<Vec<_>>()
    });

    if clamped_samples > 0 {
        debug!(
            clamped_samples,
            "hexapod-gait: gait targets clamped to leg reach"
        );
    }
    info!(
        gait = ?params.gait_type,
        direction = ?params.direction,
        rotate = params.rotate_in_place,
        len = cycle_len,
        "hexapod-gait: walking sequence generated"
    );

    Ok(WalkingSequence {
        params: *params,
        legs,
        clamped_samples,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
