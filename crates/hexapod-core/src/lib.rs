// hexapod-core: Types, config and errors for the hexapod kinematics engine.

pub mod config;
pub mod error;
pub mod types;

pub mod prelude {
    pub use crate::config::HexapodConfig;
    pub use crate::error::{ConfigError, HexapodError, IkUnreachable};
    pub use crate::types::{
        BodyDimensions, BodyPose, Direction, GaitLimits, GaitParameters, GaitType, JointAngles,
        LegId, LegLengths, LegPhase, Point3D, Side, LEG_COUNT,
    };
}
