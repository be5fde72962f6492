//! Horn pulses
//!
//! Consumes queued horn requests and drives the buzzer. The gap after each
//! pulse spaces out back-to-back requests, so a queued double honk is
//! audible as two.

use crate::system::horn;
use crate::system::resources::HornResources;
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Timer};

/// Buzzer on-time per pulse
const PULSE_DURATION: Duration = Duration::from_millis(150);

/// Quiet gap after each pulse
const PULSE_GAP: Duration = Duration::from_millis(200);

/// Horn task
#[embassy_executor::task]
pub async fn horn_sound(r: HornResources) {
    let mut buzzer = Output::new(r.buzzer_pin, Level::Low);

    loop {
        horn::wait().await;
        buzzer.set_high();
        Timer::after(PULSE_DURATION).await;
        buzzer.set_low();
        Timer::after(PULSE_GAP).await;
    }
}
