//! Mission indicator LED
//!
//! Drives the indicator from the command channel: steady on/off/toggle for
//! beacon and checkpoint feedback, and counted blink sequences for the
//! scoring acknowledgments.

use crate::system::indicator::{self, IndicatorCommand};
use crate::system::resources::IndicatorLedResources;
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Timer};

/// On/off time of one acknowledgment blink
const BLINK_INTERVAL: Duration = Duration::from_millis(150);

/// Indicator LED task
#[embassy_executor::task]
pub async fn led_indicate(r: IndicatorLedResources) {
    let mut led = Output::new(r.led_pin, Level::Low);

    loop {
        match indicator::wait().await {
            IndicatorCommand::On => led.set_high(),
            IndicatorCommand::Off => led.set_low(),
            IndicatorCommand::Toggle => led.toggle(),
            IndicatorCommand::Blink(times) => {
                for _ in 0..times {
                    led.set_high();
                    Timer::after(BLINK_INTERVAL).await;
                    led.set_low();
                    Timer::after(BLINK_INTERVAL).await;
                }
            }
        }
    }
}
