//! The claw machine as seen by a host
//!
//! `ClawMachine` owns the simulation state and exposes the imperative
//! commands (moves, the grab routine, manual drive, pointer targeting). The
//! host calls `frame()` once per display frame; everything else only writes
//! targets or schedules work for the next frame.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::MachineConfig;
use crate::consts::POINTER_DEADBAND;
use crate::error::{ClawError, ConfigError};
use crate::sim::{
    Ball, Claw, CollisionGeometry, GrabSequence, GrabStage, MachineState, ManualDrive, MoveId,
    MoveRequest, MoveTarget, SequenceStep, tick,
};
use crate::spawn::{BallSpec, create_initial_balls};

/// What one frame produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameReport {
    /// Balls delivered this frame
    pub dropped: Vec<Ball>,
    /// A move request converged this frame
    pub completed: Option<MoveId>,
    /// Stage of the grab routine after this frame, if one is running
    pub stage: Option<GrabStage>,
}

/// A running claw machine
pub struct ClawMachine {
    config: MachineConfig,
    state: MachineState,
    specs: Vec<BallSpec>,
    rng: Pcg32,
    motion: Option<MoveRequest>,
    sequence: Option<GrabSequence>,
    manual: Option<ManualDrive>,
    allow_user_control: bool,
    next_move_id: MoveId,
}

impl ClawMachine {
    /// Build a machine and place the balls described by `specs`
    pub fn new(config: MachineConfig, specs: Vec<BallSpec>, seed: u64) -> Result<Self, ConfigError> {
        Self::with_dropped(config, specs, Vec::new(), seed)
    }

    /// Build a machine that remembers balls delivered in an earlier session;
    /// their specs are not placed again
    pub fn with_dropped(
        config: MachineConfig,
        specs: Vec<BallSpec>,
        dropped: Vec<Ball>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let balls = create_initial_balls(&specs, &dropped, &config, &mut rng);
        let mut state = MachineState::new(&config, balls);
        state.dropped = dropped;

        log::info!(
            "Claw machine {}x{} ready with {} balls ({} already delivered), seed {}",
            config.width,
            config.height,
            state.balls.len(),
            state.dropped.len(),
            seed
        );

        Ok(Self {
            config,
            state,
            specs,
            rng,
            motion: None,
            sequence: None,
            manual: None,
            allow_user_control: true,
            next_move_id: 1,
        })
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn claw(&self) -> &Claw {
        &self.state.claw
    }

    /// Collision lines for the current claw pose
    pub fn collision_geometry(&self) -> CollisionGeometry {
        CollisionGeometry::build(self.state.claw.pose(), &self.config)
    }

    /// Whether manual input (pointer, drive buttons) may write claw targets
    pub fn user_control_allowed(&self) -> bool {
        self.allow_user_control
    }

    /// No move request or grab routine in flight
    pub fn is_idle(&self) -> bool {
        self.motion.is_none() && self.sequence.is_none()
    }

    /// Current stage of the grab routine
    pub fn grab_stage(&self) -> Option<GrabStage> {
        self.sequence.as_ref().map(GrabSequence::stage)
    }

    /// Move the claw to a target pose
    ///
    /// x and y are clamped into the canvas. User control stays locked until
    /// the pose converges. Only one move may be in flight; a second request
    /// is refused with `ClawError::Busy`.
    pub fn move_claw(
        &mut self,
        x: f64,
        y: f64,
        angle: f64,
        return_on_contact: bool,
    ) -> Result<MoveId, ClawError> {
        if !self.is_idle() {
            log::debug!("Rejected move to ({x:.1}, {y:.1}): claw is busy");
            return Err(ClawError::Busy);
        }

        let mut target = MoveTarget::new(x, y, angle);
        target.return_on_contact = return_on_contact;
        Ok(self.start_move(target))
    }

    /// Run the grab-and-drop routine from the current x position
    ///
    /// `drop_delay_ms` overrides the configured pause over the chute.
    pub fn move_claw_down(&mut self, drop_delay_ms: Option<f64>) -> Result<(), ClawError> {
        if !self.is_idle() || !self.allow_user_control {
            log::debug!("Rejected grab: claw is busy");
            return Err(ClawError::Busy);
        }

        let delay = drop_delay_ms
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(self.config.drop_delay_ms);
        let sequence = GrabSequence::new(delay);
        let first = sequence.first_move(&self.state.claw, &self.config);

        log::info!("Grab started at x={:.1}", self.state.claw.x);
        self.sequence = Some(sequence);
        self.start_move(first);
        Ok(())
    }

    /// Drive the claw right until `stop_moving`
    pub fn move_claw_right(&mut self) -> Result<(), ClawError> {
        self.start_drive(1.0)
    }

    /// Drive the claw left until `stop_moving`
    pub fn move_claw_left(&mut self) -> Result<(), ClawError> {
        self.start_drive(-1.0)
    }

    /// Stop manual drive. Returns whether a drive was active.
    pub fn stop_moving(&mut self) -> bool {
        self.manual.take().is_some()
    }

    /// Follow a pointer at canvas x
    ///
    /// Small offsets inside the deadband are ignored; otherwise the claw
    /// heads for the nearest even coordinate.
    pub fn point_at(&mut self, x: f64) -> Result<(), ClawError> {
        if !self.allow_user_control {
            return Err(ClawError::UserControlLocked);
        }

        if (self.state.claw.x - x).abs() > POINTER_DEADBAND {
            self.state.claw.target_x = (x / 2.0).round() * 2.0;
        }
        Ok(())
    }

    /// Change the claw's per-tick speeds; targets are left alone
    pub fn set_claw_speeds(&mut self, dx: f64, dy: f64, d_angle: f64) -> Result<(), ConfigError> {
        for (name, value) in [("dx", dx), ("dy", dy), ("d_angle", d_angle)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidValue {
                    name,
                    value,
                    expected: "a finite value > 0",
                });
            }
        }

        let claw = &mut self.state.claw;
        claw.dx = dx;
        claw.dy = dy;
        claw.d_angle = d_angle;
        Ok(())
    }

    /// Put every ball that was not delivered back at its starting place and
    /// park the claw. The delivered-ball ledger survives.
    pub fn reset(&mut self) {
        let dropped = std::mem::take(&mut self.state.dropped);
        let balls = create_initial_balls(&self.specs, &dropped, &self.config, &mut self.rng);

        self.state = MachineState::new(&self.config, balls);
        self.state.dropped = dropped;
        self.motion = None;
        self.sequence = None;
        self.manual = None;
        self.allow_user_control = true;

        log::info!(
            "Machine reset: {} balls in play, {} delivered",
            self.state.balls.len(),
            self.state.dropped.len()
        );
    }

    /// Advance the machine by one frame
    pub fn frame(&mut self) -> FrameReport {
        self.fire_manual_drive();

        let outcome = tick(&mut self.state, &self.config);

        let completed = self
            .motion
            .as_mut()
            .and_then(|request| request.poll(&self.state.claw).then_some(request.id));
        if completed.is_some() {
            self.motion = None;
        }

        self.advance_sequence(completed.is_some());
        self.allow_user_control = self.is_idle();

        FrameReport {
            dropped: outcome.dropped,
            completed,
            stage: self.grab_stage(),
        }
    }

    fn start_move(&mut self, target: MoveTarget) -> MoveId {
        let id = self.next_move_id;
        self.next_move_id += 1;

        self.allow_user_control = false;
        self.motion = Some(MoveRequest::start(
            id,
            &mut self.state.claw,
            target,
            &self.config,
        ));
        id
    }

    fn start_drive(&mut self, direction: f64) -> Result<(), ClawError> {
        if !self.allow_user_control {
            return Err(ClawError::UserControlLocked);
        }

        let drive = ManualDrive::new(direction, self.config.manual_drive_interval_ms);
        if let Some(previous) = self.manual.replace(drive) {
            log::debug!(
                "Manual drive {} superseded by {}",
                previous.direction(),
                direction
            );
        }
        Ok(())
    }

    fn fire_manual_drive(&mut self) {
        let Some(drive) = self.manual.as_mut() else {
            return;
        };

        let fired = drive.advance(self.config.frame_ms);
        if !self.allow_user_control {
            return;
        }
        for _ in 0..fired {
            drive.nudge(&mut self.state.claw, self.config.width);
        }
    }

    fn advance_sequence(&mut self, move_completed: bool) {
        let Some(sequence) = self.sequence.as_mut() else {
            return;
        };

        let step = if move_completed {
            sequence.on_move_complete(&self.state, &self.config)
        } else if matches!(sequence.stage(), GrabStage::Hold { .. }) {
            sequence.advance_hold(self.config.frame_ms, &self.config)
        } else {
            SequenceStep::Wait
        };

        match step {
            SequenceStep::Move(target) => {
                self.start_move(target);
            }
            SequenceStep::Wait => {}
            SequenceStep::Finished => {
                log::info!("Grab finished after {} ticks", self.state.time_ticks);
                self.sequence = None;
            }
        }
    }
}
