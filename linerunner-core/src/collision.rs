//! Obstacle detection and the escape maneuver
//!
//! Runs ahead of navigation on every control tick. While the proximity
//! sensor reports an obstacle the vehicle holds still; once it clears, a
//! bounded backup / turn / seek sequence hunts for the line again. Every
//! phase has a tick ceiling so the vehicle can never park itself in
//! recovery.
//!
//! Sensor read failures are presented to this controller as "no obstacle"
//! (fail-open): a flaky proximity sensor must not strand the vehicle.

use crate::config::{LOW_SPEED, REVERSE_SPEED};
use crate::effect::{Effect, Effects};
use crate::line::LineCode;
use crate::state::WheelSpeeds;

/// Reverse leg after the obstacle clears (~1 s).
const BACKUP_TICKS: u8 = 10;

/// Stationary pivot leg (~1.5 s).
const TURN_TICKS: u8 = 15;

/// Forward seek gives up and hands back to navigation after this (~2 s).
const SEEK_TIMEOUT_TICKS: u8 = 20;

/// Escape maneuver phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecoveryPhase {
    /// Back away from whatever we nearly hit.
    Backup,
    /// Pivot to point back toward the track.
    Turn,
    /// Creep forward until a detector finds the line.
    Seek,
}

/// Obstacle recovery controller.
///
/// Owns its whole sub-state; the rest of the system only sees the override
/// command returned by [`tick`](Self::tick).
#[derive(Debug)]
pub struct ObstacleRecovery {
    active: bool,
    phase: RecoveryPhase,
    timer: u8,
}

impl ObstacleRecovery {
    pub const fn new() -> Self {
        Self {
            active: false,
            phase: RecoveryPhase::Backup,
            timer: 0,
        }
    }

    /// True while an obstacle is present or the escape maneuver is running.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// One control tick.
    ///
    /// Returns the wheel override while recovery owns the vehicle, `None`
    /// once navigation may drive again. The override on the detection tick
    /// is an unconditional stop, whatever the navigator wanted.
    pub fn tick(
        &mut self,
        obstacle_present: bool,
        line: LineCode,
        effects: &mut Effects,
    ) -> Option<WheelSpeeds> {
        if obstacle_present && !self.active {
            // Rising edge: freeze and alert before anything else moves.
            self.active = true;
            self.phase = RecoveryPhase::Backup;
            self.timer = 0;
            effects.push(Effect::Honk);
            return Some(WheelSpeeds::stop());
        }

        if !self.active {
            return None;
        }

        if obstacle_present {
            // Still blocked: hold position without consuming escape time.
            return Some(WheelSpeeds::stop());
        }

        // Obstacle is gone but the escape maneuver still owns the vehicle.
        self.timer += 1;
        match self.phase {
            RecoveryPhase::Backup => {
                if self.timer > BACKUP_TICKS {
                    self.phase = RecoveryPhase::Turn;
                    self.timer = 0;
                }
                Some(WheelSpeeds::straight(REVERSE_SPEED))
            }
            RecoveryPhase::Turn => {
                if self.timer > TURN_TICKS {
                    self.phase = RecoveryPhase::Seek;
                    self.timer = 0;
                }
                Some(WheelSpeeds::pivot(LOW_SPEED))
            }
            RecoveryPhase::Seek => {
                if !line.is_lost() || self.timer > SEEK_TIMEOUT_TICKS {
                    // Line found (or we give up): hand control back on this
                    // tick so the navigator steers from the fresh reading.
                    self.reset();
                    None
                } else {
                    Some(WheelSpeeds::straight(LOW_SPEED))
                }
            }
        }
    }

    fn reset(&mut self) {
        self.active = false;
        self.phase = RecoveryPhase::Backup;
        self.timer = 0;
    }
}

impl Default for ObstacleRecovery {
    fn default() -> Self {
        Self::new()
    }
}
