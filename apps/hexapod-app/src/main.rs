//! Hexapod kinematics and gait CLI.
//!
//! Provides three modes of operation:
//! - `info`: Print the configured geometry and gait
//! - `pose`: Shift and tilt the body over planted feet and print the joint angles
//! - `gait`: Generate a walking sequence and print its frames

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hexapod_core::prelude::*;
use hexapod_sim::Hexapod;

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

/// Hexapod kinematics and gait engine.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print body geometry, leg reach and gait settings.
    Info,

    /// Move the body over planted feet and print the solved joint angles.
    Pose(PoseArgs),

    /// Generate a walking sequence and print its frames.
    Gait(GaitArgs),
}

#[derive(Args)]
struct PoseArgs {
    /// Roll in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    roll: f64,

    /// Pitch in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pitch: f64,

    /// Yaw in degrees.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    yaw: f64,

    /// Lateral shift in [-1, 1], scaled by the front dimension.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    tx: f64,

    /// Forward shift in [-1, 1], scaled by the side dimension.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    ty: f64,

    /// Vertical shift in [-1, 1], scaled by the tibia length.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    tz: f64,
}

#[derive(Args)]
struct GaitArgs {
    /// Use the ripple gait instead of the tripod gait.
    #[arg(long)]
    ripple: bool,

    /// Walk backward.
    #[arg(long)]
    backward: bool,

    /// Rotate in place instead of translating.
    #[arg(long)]
    rotate: bool,

    /// Hip sweep amplitude in degrees.
    #[arg(long)]
    hip_swing: Option<f64>,

    /// Peak foot lift.
    #[arg(long)]
    lift_swing: Option<f64>,

    /// Samples per phase window.
    #[arg(long)]
    steps: Option<u32>,

    /// Frames to play back; defaults to one full cycle.
    #[arg(long)]
    frames: Option<usize>,

    /// Print one JSON object per frame.
    #[arg(long)]
    json: bool,
}

impl GaitArgs {
    /// Overlay the command-line flags on the configured gait.
    fn apply(&self, base: GaitParameters) -> GaitParameters {
        let mut params = base;
        if self.ripple {
            params.gait_type = GaitType::Ripple;
        }
        if self.backward {
            params.direction = Direction::Backward;
        }
        if self.rotate {
            params.rotate_in_place = true;
        }
        if let Some(v) = self.hip_swing {
            params.hip_swing = v;
        }
        if let Some(v) = self.lift_swing {
            params.lift_swing = v;
        }
        if let Some(v) = self.steps {
            params.step_num = v;
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Frame output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct LegRecord {
    leg: LegId,
    phase: LegPhase,
    angles: JointAngles,
    foot: Point3D,
}

#[derive(Serialize)]
struct FrameRecord {
    frame: usize,
    index: usize,
    legs: Vec<LegRecord>,
}

fn frame_record(hexapod: &Hexapod, frame: usize, index: usize) -> Option<FrameRecord> {
    let sequence = hexapod.sequence()?;
    let phases = sequence.phases(index);
    let legs = LegId::ALL
        .iter()
        .map(|&leg| LegRecord {
            leg,
            phase: phases[leg.index()],
            angles: *hexapod.leg_angles(leg),
            foot: hexapod.leg_chain(leg).foot_tip,
        })
        .collect();
    Some(FrameRecord { frame, index, legs })
}

fn phase_char(phase: LegPhase) -> char {
    match phase {
        LegPhase::Stance => '_',
        LegPhase::Swing => '^',
    }
}

fn print_angles(hexapod: &Hexapod) {
    for leg in LegId::ALL {
        let a = hexapod.leg_angles(leg);
        let foot = hexapod.leg_chain(leg).foot_tip;
        println!(
            "  {leg} {:<12} alpha={:>8.3} beta={:>8.3} gamma={:>8.3}  foot=({:.3}, {:.3}, {:.3})",
            leg.name(),
            a.alpha,
            a.beta,
            a.gamma,
            foot.x,
            foot.y,
            foot.z
        );
    }
}

// ---------------------------------------------------------------------------
// Mode implementations
// ---------------------------------------------------------------------------

fn load_config(path: Option<&Path>) -> Result<HexapodConfig> {
    match path {
        Some(path) => {
            let config = HexapodConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?;
            info!(path = %path.display(), "hexapod-app: config loaded");
            Ok(config)
        }
        None => Ok(HexapodConfig::default()),
    }
}

fn run_info(config: &HexapodConfig) -> Result<()> {
    let hexapod = Hexapod::from_config(config)?;
    let dims = hexapod.dimensions();
    let lengths = hexapod.leg_lengths();

    println!("hexapod v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!(
        "body:  front={} middle={} side={}",
        dims.front, dims.middle, dims.side
    );
    println!(
        "legs:  coxa={} femur={} tibia={}  reach=[{}, {}]",
        lengths.coxa,
        lengths.femur,
        lengths.tibia,
        lengths.min_reach(),
        lengths.max_reach()
    );
    println!();
    println!("mounts:");
    for mount in &hexapod.outline().mounts {
        println!(
            "  {} {:<12} offset=({:.3}, {:.3}) yaw={:>5.1}",
            mount.leg,
            mount.leg.name(),
            mount.offset.x,
            mount.offset.y,
            mount.yaw
        );
    }
    let head = hexapod.head();
    println!("  head            ({:.3}, {:.3}, {:.3})", head.x, head.y, head.z);
    println!();

    let gait = &config.gait;
    println!(
        "gait:  {:?} {:?} rotate={} hip_swing={} lift_swing={} steps={} speed={}",
        gait.gait_type,
        gait.direction,
        gait.rotate_in_place,
        gait.hip_swing,
        gait.lift_swing,
        gait.step_num,
        gait.speed
    );
    println!(
        "       cycle={} frames, {:?} per frame",
        gait.cycle_len(),
        gait.frame_interval().unwrap_or_default()
    );
    Ok(())
}

fn run_pose(config: &HexapodConfig, args: &PoseArgs) -> Result<()> {
    let mut hexapod = Hexapod::from_config(config)?;
    let report = hexapod.solve_ik_normalized(
        [args.roll, args.pitch, args.yaw],
        [args.tx, args.ty, args.tz],
    )?;
    for u in &report.unreachable {
        warn!(leg = %u.leg, distance = u.distance, bound = u.bound, "hexapod-app: foot clamped");
    }

    let p = &report.pose;
    println!(
        "pose: roll={} pitch={} yaw={} translation=({:.3}, {:.3}, {:.3})",
        p.roll, p.pitch, p.yaw, p.tx, p.ty, p.tz
    );
    print_angles(&hexapod);
    let c = hexapod.support_centroid();
    println!("support centroid: ({:.3}, {:.3}, {:.3})", c.x, c.y, c.z);
    if !report.all_reachable() {
        println!("{} leg(s) clamped to reach", report.unreachable.len());
    }
    Ok(())
}

fn run_gait(config: &HexapodConfig, args: &GaitArgs) -> Result<()> {
    let mut hexapod = Hexapod::from_config(config)?;
    let params = args.apply(config.gait);
    let sequence = hexapod.generate_walking_sequence(&params)?;
    let len = sequence.len();
    let clamped = sequence.clamped_samples();
    if clamped > 0 {
        warn!(clamped, "hexapod-app: gait targets exceed leg reach");
    }
    let frames = args.frames.unwrap_or(len);

    if !args.json {
        println!(
            "{:?} {:?} rotate={} cycle={} frames ({:?} per frame)",
            params.gait_type,
            params.direction,
            params.rotate_in_place,
            len,
            params.frame_interval().unwrap_or_default()
        );
    }

    for frame in 0..frames {
        let Some(index) = hexapod.step() else {
            break;
        };
        let Some(record) = frame_record(&hexapod, frame, index) else {
            break;
        };
        if args.json {
            println!("{}", serde_json::to_string(&record)?);
        } else {
            let phases: String = record.legs.iter().map(|l| phase_char(l.phase)).collect();
            let angles: Vec<String> = record
                .legs
                .iter()
                .map(|l| format!("{:>7.2}", l.angles.alpha))
                .collect();
            println!("{index:>4} [{phases}] alpha {}", angles.join(" "));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hexapod=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Some(Commands::Info) | None => run_info(&config),
        Some(Commands::Pose(args)) => run_pose(&config, &args),
        Some(Commands::Gait(args)) => run_gait(&config, &args),
    }
}
