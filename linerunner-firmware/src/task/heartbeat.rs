//! Supervisor heartbeat
//!
//! Slow toggle on a dedicated LED so a glance tells whether the executor
//! is alive. Not mission-relevant.

use crate::system::resources::HeartbeatLedResources;
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Ticker};

/// Heartbeat period
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Heartbeat task
#[embassy_executor::task]
pub async fn heartbeat(r: HeartbeatLedResources) {
    let mut led = Output::new(r.led_pin, Level::Low);
    let mut ticker = Ticker::every(HEARTBEAT_INTERVAL);

    loop {
        ticker.next().await;
        led.toggle();
    }
}
