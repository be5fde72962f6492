//! Robot firmware entry point
//!
//! Initializes the system, spawns the output tasks, and holds the mission
//! until the go button is pressed.

#![no_std]
#![no_main]

use crate::system::horn;
use crate::system::resources::{
    self, AssignedResources, GoButtonResources, HeartbeatLedResources, HornResources,
    IndicatorLedResources, LightSensorResources, LineSensorResources, MotorDriverResources,
    ProximitySensorResources,
};
use crate::task::{
    drive::drive, heartbeat::heartbeat, horn_sound::horn_sound, led_indicate::led_indicate,
    mission_tick::mission_tick,
};
use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// System core modules
mod system;
/// Task implementations
mod task;

/// Go button debounce delay
const DEBOUNCE_DURATION: Duration = Duration::from_millis(30);

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    // Initialize the global ADC instance before spawning any tasks, so the
    // light sensor reads cannot race the peripheral setup.
    resources::init_adc(p.ADC);

    // Split the resources into separate groups, one per task.
    let r = split_resources!(p);

    // Output tasks first: the ready honk and the heartbeat work while the
    // vehicle still waits at the start line.
    spawner.spawn(drive(r.motor_driver)).unwrap();
    spawner.spawn(led_indicate(r.indicator_led)).unwrap();
    spawner.spawn(horn_sound(r.horn)).unwrap();
    spawner.spawn(heartbeat(r.heartbeat_led)).unwrap();

    // Announce readiness, then hold for the go signal.
    horn::pulse().await;
    info!("Waiting for go signal");
    wait_for_go(r.go_button).await;

    info!("Go signal received, mission start");
    spawner
        .spawn(mission_tick(
            r.line_sensor,
            r.proximity_sensor,
            r.light_sensor,
        ))
        .unwrap();
}

/// Blocks until the go button is pressed, with a debounce check.
async fn wait_for_go(r: GoButtonResources) {
    let mut button = Input::new(r.btn_pin, Pull::Down);
    loop {
        button.wait_for_high().await;
        Timer::after(DEBOUNCE_DURATION).await;
        if button.is_high() {
            break;
        }
    }
}
