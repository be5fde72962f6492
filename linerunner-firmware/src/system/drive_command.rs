//! Wheel Command Module
//!
//! Carries the committed wheel command from the mission control loop to the
//! actuation relay. Uses an embassy-sync Signal so the relay always reads
//! the freshest pair; stale commands are overwritten, never queued.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use linerunner_core::state::WheelSpeeds;

/// Signal for committed wheel commands
pub static DRIVE: Signal<CriticalSectionRawMutex, WheelSpeeds> = Signal::new();

/// Publishes a new wheel command
///
/// Synchronous operation, called once per control tick after the mission
/// commit step.
pub fn update(speeds: WheelSpeeds) {
    DRIVE.signal(speeds);
}

/// Waits for the next wheel command
pub async fn wait() -> WheelSpeeds {
    DRIVE.wait().await
}
