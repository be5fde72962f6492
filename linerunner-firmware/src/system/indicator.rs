//! Mission Indicator Module
//!
//! Command channel for the mission indicator LED. Commands are queued, not
//! latest-value: a blink acknowledgment must not be lost because a steady
//! on/off followed it in the same tick.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Commands for the indicator task
#[derive(Debug, Clone, Copy)]
pub enum IndicatorCommand {
    On,
    Off,
    Toggle,
    /// Blink `n` times as an acknowledgment, then leave the LED off.
    Blink(u8),
}

/// Multi-producer command channel with capacity of 10
pub static INDICATOR_CHANNEL: Channel<CriticalSectionRawMutex, IndicatorCommand, 10> =
    Channel::new();

/// Sends a command to the indicator task
pub async fn send(command: IndicatorCommand) {
    INDICATOR_CHANNEL.sender().send(command).await;
}

/// Receives the next indicator command
pub async fn wait() -> IndicatorCommand {
    INDICATOR_CHANNEL.receiver().receive().await
}
