//! Horn signaling
//!
//! Queues fire-and-forget horn pulses for the horn task. A double honk is
//! two queued pulses; the task spaces them out.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

/// Pending horn pulses
pub static HORN_CHANNEL: Channel<CriticalSectionRawMutex, (), 4> = Channel::new();

/// Queues one horn pulse
pub async fn pulse() {
    HORN_CHANNEL.sender().send(()).await;
}

/// Waits for the next queued pulse
pub async fn wait() {
    HORN_CHANNEL.receiver().receive().await;
}
