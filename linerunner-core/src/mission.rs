//! Per-tick coordination
//!
//! One coordinating step per control period, and the single place the
//! shared vehicle state is written: obstacle recovery runs first, then
//! navigation with recovery's verdict, then one commit of the winning
//! command and the state deltas. The ordering that the original relied on
//! scheduler priorities for is program order here.

use crate::checkpoint::Checkpoint;
use crate::collision::ObstacleRecovery;
use crate::effect::Effects;
use crate::line::LineCode;
use crate::navigate::Navigator;
use crate::state::{VehicleState, WheelSpeeds};

/// One tick's sensor readings.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFrame {
    /// Proximity sensor: obstacle in front. A failed read presents as
    /// `false` (fail-open).
    pub obstacle: bool,
    /// Line detector code.
    pub line: LineCode,
    /// Smoothed light level, 0-100.
    pub light_level: u8,
}

/// The committed result of one tick.
#[derive(Debug)]
pub struct TickOutput {
    /// Wheel command exactly as committed; the actuation relay forwards
    /// this verbatim.
    pub wheels: WheelSpeeds,
    /// Side effects for the indicator and horn tasks.
    pub effects: Effects,
}

/// Owns the vehicle state and both decision controllers.
pub struct MissionControl {
    state: VehicleState,
    recovery: ObstacleRecovery,
    navigator: Navigator,
}

impl MissionControl {
    /// All stopped, zero score, waiting at the start line.
    pub const fn new() -> Self {
        Self {
            state: VehicleState::new(),
            recovery: ObstacleRecovery::new(),
            navigator: Navigator::new(),
        }
    }

    /// Run one control tick and commit the result.
    pub fn tick(&mut self, frame: SensorFrame) -> TickOutput {
        let mut effects = Effects::new();

        // Recovery first, so its override can never be stale by the time
        // the command is committed.
        let override_command = self
            .recovery
            .tick(frame.obstacle, frame.line, &mut effects);
        let obstacle_active = override_command.is_some();

        // Navigation always computes - it keeps its lost-line hints fresh -
        // but its command only wins when recovery is idle.
        let intent = self
            .navigator
            .tick(frame.line, frame.light_level, obstacle_active, &mut effects);

        // Commit: the only write site for the shared record.
        self.state.set_obstacle_active(obstacle_active);
        self.state.add_score(intent.score_delta);
        self.state.set_light_detected(intent.light_detected);
        let wheels = override_command.unwrap_or(intent.command);
        self.state.commit_wheels(wheels);

        TickOutput { wheels, effects }
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.navigator.checkpoint()
    }
}

impl Default for MissionControl {
    fn default() -> Self {
        Self::new()
    }
}
