//! The [`Hexapod`] aggregate root.

use nalgebra::{Isometry3, Vector3};
use tracing::{debug, info, warn};

use hexapod_core::config::HexapodConfig;
use hexapod_core::error::{HexapodError, IkUnreachable};
use hexapod_core::types::{
    BodyDimensions, BodyPose, GaitLimits, GaitParameters, JointAngles, LegId, LegLengths,
    Point3D, LEG_COUNT,
};
use hexapod_gait::{generate_sequence, WalkingSequence};
use hexapod_ik::{body_transform, solve_body_ik, solve_forward, BodyOutline, LegChain};

use crate::playback::{wrap_index, Playback};

// ---------------------------------------------------------------------------
// IkReport
// ---------------------------------------------------------------------------

/// Outcome of a committed body-pose solve.
#[derive(Clone, Debug, PartialEq)]
pub struct IkReport {
    pub pose: BodyPose,
    /// Legs whose planted foot was out of reach and got clamped.
    pub unreachable: Vec<IkUnreachable>,
}

impl IkReport {
    pub fn all_reachable(&self) -> bool {
        self.unreachable.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Hexapod
// ---------------------------------------------------------------------------

/// Body geometry, leg state and gait playback for one robot.
#[derive(Clone, Debug)]
pub struct Hexapod {
    dimensions: BodyDimensions,
    lengths: LegLengths,
    limits: GaitLimits,
    pose: BodyPose,
    outline: BodyOutline,
    angles: [JointAngles; LEG_COUNT],

    // Derived from the fields above by `refresh`.
    body: Isometry3<f64>,
    chains: [LegChain; LEG_COUNT],

    sequence: Option<WalkingSequence>,
    playback: Playback,
}

impl Default for Hexapod {
    fn default() -> Self {
        Self::assemble(
            BodyDimensions::default(),
            LegLengths::default(),
            GaitLimits::default(),
        )
    }
}

impl Hexapod {
    /// Build a hexapod in the neutral stance.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::InvalidDimension`] if a dimension or segment
    /// length is out of range.
    pub fn new(
        dimensions: BodyDimensions,
        lengths: LegLengths,
        limits: GaitLimits,
    ) -> Result<Self, HexapodError> {
        dimensions.validate()?;
        lengths.validate()?;
        Ok(Self::assemble(dimensions, lengths, limits))
    }

    /// Build from a startup configuration. The configured gait is not
    /// generated; call [`generate_walking_sequence`](Self::generate_walking_sequence).
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::Config`] if the configuration is invalid.
    pub fn from_config(config: &HexapodConfig) -> Result<Self, HexapodError> {
        config.validate()?;
        Ok(Self::assemble(
            config.dimensions,
            config.leg_lengths,
            config.limits,
        ))
    }

    fn assemble(dimensions: BodyDimensions, lengths: LegLengths, limits: GaitLimits) -> Self {
        let outline = BodyOutline::from_dimensions(&dimensions);
        let pose = BodyPose::NEUTRAL;
        let angles = [JointAngles::ZERO; LEG_COUNT];
        let body = body_transform(&pose, &lengths);
        let chains = evaluate_chains(&outline, &body, &lengths, &angles);
        Self {
            dimensions,
            lengths,
            limits,
            pose,
            outline,
            angles,
            body,
            chains,
            sequence: None,
            playback: Playback::new(),
        }
    }

    /// Re-evaluate the body transform and every leg chain.
    fn refresh(&mut self) {
        self.body = body_transform(&self.pose, &self.lengths);
        self.chains = evaluate_chains(&self.outline, &self.body, &self.lengths, &self.angles);
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Replace body dimensions and leg segment lengths.
    ///
    /// Current joint angles are kept and the chains re-evaluated. An existing
    /// walking sequence is regenerated for the new lengths with the cursor
    /// left in place.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::InvalidDimension`] and leaves the hexapod
    /// unchanged if any value is out of range.
    pub fn update_dimensions(
        &mut self,
        dimensions: BodyDimensions,
        lengths: LegLengths,
    ) -> Result<(), HexapodError> {
        if let Err(e) = dimensions.validate().and_then(|()| lengths.validate()) {
            warn!(error = %e, "hexapod-sim: dimension update rejected");
            return Err(e);
        }
        let outline = BodyOutline::from_dimensions(&dimensions);
        let sequence = match &self.sequence {
            Some(seq) => Some(generate_sequence(
                seq.params(),
                &self.limits,
                &lengths,
                &outline.mounts,
            )?),
            None => None,
        };

        self.dimensions = dimensions;
        self.lengths = lengths;
        self.outline = outline;
        self.sequence = sequence;
        self.refresh();
        info!(
            front = dimensions.front,
            middle = dimensions.middle,
            side = dimensions.side,
            coxa = lengths.coxa,
            femur = lengths.femur,
            tibia = lengths.tibia,
            "hexapod-sim: dimensions updated"
        );
        Ok(())
    }

    /// Apply one angle triple to all six legs.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::MalformedInput`] if any angle is non-finite or
    /// outside ±180°.
    pub fn update_leg_pattern(&mut self, angles: JointAngles) -> Result<(), HexapodError> {
        angles.validate()?;
        self.angles = [angles; LEG_COUNT];
        self.refresh();
        debug!(
            alpha = angles.alpha,
            beta = angles.beta,
            gamma = angles.gamma,
            "hexapod-sim: leg pattern applied"
        );
        Ok(())
    }

    /// Move the body to `pose` while the feet stay where they are planted.
    ///
    /// `pose` is absolute with respect to the neutral stance. Unreachable feet
    /// are clamped and listed in the report.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::MalformedInput`] and leaves the hexapod
    /// unchanged if the pose is non-finite or exceeds the rotation limits.
    pub fn solve_ik(&mut self, pose: &BodyPose) -> Result<IkReport, HexapodError> {
        let anchors = self.ground_contact_points();
        let solution = solve_body_ik(pose, &anchors, &self.outline.mounts, &self.lengths)?;

        self.pose = *pose;
        self.angles = solution.angles;
        self.refresh();
        Ok(IkReport {
            pose: *pose,
            unreachable: solution.unreachable,
        })
    }

    /// [`solve_ik`](Self::solve_ik) with translations given in [-1, 1] and
    /// scaled by the body and leg dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::MalformedInput`] for out-of-range or non-finite
    /// input.
    pub fn solve_ik_normalized(
        &mut self,
        rotation: [f64; 3],
        normalized: [f64; 3],
    ) -> Result<IkReport, HexapodError> {
        let pose = BodyPose::from_normalized(rotation, normalized, &self.dimensions, &self.lengths)?;
        self.solve_ik(&pose)
    }

    /// Generate a walking sequence, replacing any existing one, and rewind
    /// playback to frame 0. The body pose is not changed until a frame is
    /// applied.
    ///
    /// # Errors
    ///
    /// Returns [`HexapodError::InvalidGaitParameters`] and leaves the current
    /// sequence in place if `params` violates the gait limits.
    pub fn generate_walking_sequence(
        &mut self,
        params: &GaitParameters,
    ) -> Result<&WalkingSequence, HexapodError> {
        let sequence =
            match generate_sequence(params, &self.limits, &self.lengths, &self.outline.mounts) {
                Ok(sequence) => sequence,
                Err(e) => {
                    warn!(error = %e, "hexapod-sim: gait rejected");
                    return Err(e);
                }
            };
        self.playback.reset();
        Ok(self.sequence.insert(sequence))
    }

    /// Apply frame `t` modulo the sequence length to all legs.
    ///
    /// Gait frames are solved against the neutral stance, so the body returns
    /// to [`BodyPose::NEUTRAL`] and stance feet land on the ground plane.
    /// Returns `false` without changing anything if no sequence exists.
    pub fn set_pose_from_sequence(&mut self, t: usize) -> bool {
        let Some(sequence) = &self.sequence else {
            return false;
        };
        let index = wrap_index(t, sequence.len());
        self.angles = sequence.frame(index);
        self.pose = BodyPose::NEUTRAL;
        self.refresh();
        debug!(t, index, "hexapod-sim: gait frame applied");
        true
    }

    /// Apply the frame under the cursor and advance the cursor.
    ///
    /// Returns the applied frame index, or `None` if no sequence exists.
    pub fn step(&mut self) -> Option<usize> {
        let len = self.sequence.as_ref()?.len();
        let index = self.playback.advance(len);
        self.set_pose_from_sequence(index);
        Some(index)
    }

    /// Restore default dimensions and segment lengths.
    pub fn reset_dimensions(&mut self) {
        let dimensions = BodyDimensions::default();
        let lengths = LegLengths::default();
        if let Err(e) = self.update_dimensions(dimensions, lengths) {
            // Unreachable: defaults always validate.
            warn!(error = %e, "hexapod-sim: dimension reset failed");
        }
    }

    /// Return to the neutral pose with every joint at zero.
    pub fn reset_pose(&mut self) {
        self.pose = BodyPose::NEUTRAL;
        self.angles = [JointAngles::ZERO; LEG_COUNT];
        self.refresh();
        debug!("hexapod-sim: pose reset");
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn dimensions(&self) -> &BodyDimensions {
        &self.dimensions
    }

    pub fn leg_lengths(&self) -> &LegLengths {
        &self.lengths
    }

    pub fn limits(&self) -> &GaitLimits {
        &self.limits
    }

    pub fn pose(&self) -> &BodyPose {
        &self.pose
    }

    /// Body-frame to world transform for the current pose.
    pub fn body_isometry(&self) -> &Isometry3<f64> {
        &self.body
    }

    pub fn outline(&self) -> &BodyOutline {
        &self.outline
    }

    /// Outline vertices in the world.
    pub fn body_vertices(&self) -> [Point3D; LEG_COUNT] {
        self.outline.world_vertices(&self.body)
    }

    /// Head marker in the world.
    pub fn head(&self) -> Point3D {
        self.outline.world_head(&self.body)
    }

    pub fn angles(&self) -> &[JointAngles; LEG_COUNT] {
        &self.angles
    }

    pub fn leg_angles(&self, leg: LegId) -> &JointAngles {
        &self.angles[leg.index()]
    }

    /// World joint chains in leg order.
    pub fn leg_chains(&self) -> &[LegChain; LEG_COUNT] {
        &self.chains
    }

    pub fn leg_chain(&self, leg: LegId) -> &LegChain {
        &self.chains[leg.index()]
    }

    /// Current foot tips, one per leg.
    pub fn ground_contact_points(&self) -> [Point3D; LEG_COUNT] {
        self.chains.map(|c| c.foot_tip)
    }

    /// Ground-contact points in counter-clockwise leg order, forming the
    /// support polygon.
    pub fn support_polygon(&self) -> [Point3D; LEG_COUNT] {
        self.ground_contact_points()
    }

    /// Mean of the ground-contact points.
    pub fn support_centroid(&self) -> Point3D {
        let sum: Vector3<f64> = self.ground_contact_points().iter().sum();
        sum / LEG_COUNT as f64
    }

    pub fn sequence(&self) -> Option<&WalkingSequence> {
        self.sequence.as_ref()
    }

    /// Frames in the current sequence, or 0 if none exists.
    pub fn sequence_len(&self) -> usize {
        self.sequence.as_ref().map_or(0, WalkingSequence::len)
    }

    pub fn cursor(&self) -> usize {
        self.playback.cursor()
    }
}

fn evaluate_chains(
    outline: &BodyOutline,
    body: &Isometry3<f64>,
    lengths: &LegLengths,
    angles: &[JointAngles; LEG_COUNT],
) -> [LegChain; LEG_COUNT] {
    LegId::ALL.map(|leg| solve_forward(outline.mount(leg), body, lengths, &angles[leg.index()]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
