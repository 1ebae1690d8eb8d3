//! Claw Machine - a 2D arcade claw simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, claw kinematics, choreography)
//! - `machine`: Imperative command surface driven once per frame by the host
//! - `config`: Machine configuration (sizes, speeds, physics tuning)
//! - `spawn`: Ball descriptors and initial ball placement
//! - `appearance`: Presentation defaults for optional ball attributes

pub mod appearance;
pub mod config;
pub mod error;
pub mod machine;
pub mod sim;
pub mod spawn;

pub use appearance::BallStyle;
pub use config::MachineConfig;
pub use error::{ClawError, ConfigError};
pub use machine::{ClawMachine, FrameReport};
pub use spawn::{BallSpec, create_initial_balls};

/// Machine-wide constants
pub mod consts {
    /// Nominal tick rate. Gravity and friction are tuned for this rate;
    /// there is no delta-time scaling.
    pub const NOMINAL_HZ: f64 = 60.0;
    /// Duration of one frame in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / NOMINAL_HZ;

    /// Velocity magnitude below which a grounded ball is snapped to rest
    pub const REST_VELOCITY: f64 = 0.1;

    /// Pointer must be this far from the claw before it retargets
    pub const POINTER_DEADBAND: f64 = 20.0;

    /// Polls without convergence before a move request is reported as stalled
    /// (10 seconds at the nominal rate)
    pub const STALL_WARN_FRAMES: u32 = 600;
}
