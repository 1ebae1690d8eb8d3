//! Claw Machine headless runner
//!
//! Loads an optional JSON config, lets a handful of balls settle, drives the
//! claw over the nearest one and runs a full grab. The final machine state
//! is printed as JSON.

use std::process::ExitCode;

use claw_machine::sim::MachineState;
use claw_machine::{BallSpec, ClawMachine, MachineConfig};

/// Frames allowed for each phase before giving up
const PHASE_FRAME_LIMIT: usize = 10_000;
/// Frames to let the balls fall and settle before grabbing
const SETTLE_FRAMES: usize = 300;

fn demo_specs() -> Vec<BallSpec> {
    vec![
        BallSpec::new("Rust").with_color("red"),
        BallSpec::new("Go").with_color("blue"),
        BallSpec::new("Zig").with_color("slate").with_icon("icons/zig.svg"),
        BallSpec::new("C").with_radius(15.0),
        BallSpec::new("Haskell").with_paragraphs(vec!["Lazy by default".to_string()]),
    ]
}

fn load_config() -> Result<MachineConfig, claw_machine::ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => MachineConfig::load(path),
        None => Ok(MachineConfig::default()),
    }
}

fn seed() -> u64 {
    std::env::var("CLAW_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed)
}

/// Run frames until the machine is idle; false if it never got there
fn run_until_idle(machine: &mut ClawMachine, delivered: &mut Vec<String>) -> bool {
    for _ in 0..PHASE_FRAME_LIMIT {
        let report = machine.frame();
        delivered.extend(report.dropped.into_iter().map(|ball| ball.label));
        if machine.is_idle() {
            return true;
        }
    }
    false
}

/// x of the active ball closest to the claw, if any
fn nearest_ball_x(state: &MachineState) -> Option<f64> {
    let claw_x = state.claw.x;
    state
        .balls
        .iter()
        .map(|ball| ball.pos.x)
        .min_by(|a, b| (a - claw_x).abs().total_cmp(&(b - claw_x).abs()))
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Claw Machine (native) starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut machine = match ClawMachine::new(config, demo_specs(), seed()) {
        Ok(machine) => machine,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut delivered = Vec::new();
    for _ in 0..SETTLE_FRAMES {
        let report = machine.frame();
        delivered.extend(report.dropped.into_iter().map(|ball| ball.label));
    }

    if let Some(x) = nearest_ball_x(machine.state()) {
        let y = machine.claw().y;
        if let Err(e) = machine.move_claw(x, y, 0.0, false) {
            log::warn!("Could not position claw: {e}");
        } else if !run_until_idle(&mut machine, &mut delivered) {
            log::warn!("Claw did not reach x={x:.1}");
        }
    }

    match machine.move_claw_down(None) {
        Ok(()) => {
            if !run_until_idle(&mut machine, &mut delivered) {
                log::warn!("Grab did not finish within {PHASE_FRAME_LIMIT} frames");
            }
        }
        Err(e) => log::warn!("Could not start grab: {e}"),
    }

    log::info!(
        "Done after {} ticks, delivered: {:?}",
        machine.state().time_ticks,
        delivered
    );

    match serde_json::to_string_pretty(machine.state()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize state: {e}");
            ExitCode::FAILURE
        }
    }
}
