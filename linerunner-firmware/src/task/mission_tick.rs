//! Mission control loop
//!
//! The one coordinating task: every 100 ms it reads all three sensors,
//! runs the mission tick (obstacle recovery, then navigation, then the
//! state commit), publishes the committed wheel command to the actuation
//! relay, and routes the requested side effects to the indicator and horn
//! tasks.
//!
//! # Sensor handling
//! - Line and proximity are digital reads, sampled directly each tick.
//! - The light sensor goes through the mutex-protected global ADC; a
//!   failed read counts as darkness (fail-open), and a median filter
//!   smooths flicker before thresholding.

use crate::system::indicator::IndicatorCommand;
use crate::system::resources::{
    get_adc, LightSensorResources, LineSensorResources, ProximitySensorResources,
};
use crate::system::{drive_command, horn, indicator};
use defmt::info;
use embassy_rp::adc::Channel;
use embassy_rp::gpio::{Input, Pull};
use embassy_time::{Duration, Ticker};
use linerunner_core::config::CONTROL_TICK_MS;
use linerunner_core::effect::Effect;
use linerunner_core::line::LineCode;
use linerunner_core::mission::{MissionControl, SensorFrame};
use moving_median::MovingMedian;

/// Median filter window for the light sensor (odd, small: the beacon dwell
/// time is many ticks long)
const MEDIAN_WINDOW_SIZE: usize = 5;

/// ADC resolution (12-bit = 4096 steps)
const ADC_RANGE: f32 = 4096.0;

/// Mission control task, ticking at the fixed control period
#[embassy_executor::task]
pub async fn mission_tick(
    line: LineSensorResources,
    proximity: ProximitySensorResources,
    light: LightSensorResources,
) {
    // Photodetector boards drive their outputs high on line detection.
    let line_left = Input::new(line.left_pin, Pull::Down);
    let line_middle = Input::new(line.middle_pin, Pull::Down);
    let line_right = Input::new(line.right_pin, Pull::Down);
    let ir = Input::new(proximity.ir_pin, Pull::Down);
    let mut light_channel = Channel::new_pin(light.adc_pin, Pull::None);

    let mut median_filter = MovingMedian::<f32, MEDIAN_WINDOW_SIZE>::new();
    let mut mission = MissionControl::new();
    let mut ticker = Ticker::every(Duration::from_millis(CONTROL_TICK_MS));

    let mut last_checkpoint = mission.checkpoint();
    let mut last_score = mission.state().score();
    let mut last_obstacle = mission.state().obstacle_active();

    info!("Mission control loop started");

    loop {
        ticker.next().await;

        let code = LineCode::from_detectors(
            line_left.is_high(),
            line_middle.is_high(),
            line_right.is_high(),
        );
        let obstacle = ir.is_high();

        // Read the light level, treating a failed conversion as darkness.
        let raw = {
            let mut adc_guard = get_adc().lock().await;
            let adc = adc_guard.as_mut().unwrap();
            f32::from(adc.read(&mut light_channel).await.unwrap_or(0))
        };
        median_filter.add_value(raw);
        let light_level = (median_filter.median() * 100.0 / ADC_RANGE) as u8;

        let output = mission.tick(SensorFrame {
            obstacle,
            line: code,
            light_level,
        });

        // Commit to the actuator relay, then fan out the side effects.
        drive_command::update(output.wheels);

        for effect in output.effects.iter() {
            match effect {
                Effect::Honk => horn::pulse().await,
                Effect::Blink(times) => indicator::send(IndicatorCommand::Blink(*times)).await,
                Effect::IndicatorOn => indicator::send(IndicatorCommand::On).await,
                Effect::IndicatorOff => indicator::send(IndicatorCommand::Off).await,
                Effect::IndicatorToggle => indicator::send(IndicatorCommand::Toggle).await,
            }
        }

        if mission.checkpoint() != last_checkpoint {
            info!(
                "checkpoint {} -> {}",
                last_checkpoint,
                mission.checkpoint()
            );
            last_checkpoint = mission.checkpoint();
        }
        if mission.state().score() != last_score {
            last_score = mission.state().score();
            info!("score: {}", last_score);
        }
        if mission.state().obstacle_active() != last_obstacle {
            last_obstacle = mission.state().obstacle_active();
            info!("obstacle recovery active: {}", last_obstacle);
        }
    }
}
