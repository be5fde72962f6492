//! Hardware Resource Management
//!
//! Manages and allocates hardware resources (pins, peripherals) to the
//! system tasks. Each resource group is owned by exactly one task; the ADC
//! is the only shared peripheral and is protected by a mutex.

use assign_resources::assign_resources;
use embassy_rp::adc::InterruptHandler as AdcInterruptHandler;
use embassy_rp::adc::{Adc, Async as AdcAsync};
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::{self, ADC};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;

/// Global ADC (Analog-to-Digital Converter) instance protected by a mutex.
///
/// Only the mission control loop reads it today (light sensor), but going
/// through the mutex keeps the access pattern uniform should another
/// analog channel appear.
static ADC: Mutex<CriticalSectionRawMutex, Option<Adc<'static, AdcAsync>>> = Mutex::new(None);

/// Initializes the ADC peripheral.
///
/// This should only be called once during system initialization in main.rs,
/// before any tasks are spawned.
pub fn init_adc(adc: ADC) {
    let adc = Adc::new(adc, Irqs, embassy_rp::adc::Config::default());
    critical_section::with(|_| {
        *ADC.try_lock().unwrap() = Some(adc);
    });
}

/// Returns a reference to the protected ADC instance.
pub fn get_adc() -> &'static Mutex<CriticalSectionRawMutex, Option<Adc<'static, AdcAsync>>> {
    &ADC
}

assign_resources! {
    /// Three-detector line sensor (left/middle/right photodetectors)
    line_sensor: LineSensorResources {
        left_pin: PIN_10,
        middle_pin: PIN_11,
        right_pin: PIN_12,
    },
    /// IR proximity sensor - digital output, high on obstacle
    proximity_sensor: ProximitySensorResources {
        ir_pin: PIN_26,
    },
    /// Beacon light sensor (photoresistor divider) - analog
    light_sensor: LightSensorResources {
        adc_pin: PIN_29,
    },
    /// Mission indicator LED
    indicator_led: IndicatorLedResources {
        led_pin: PIN_2,
    },
    /// Supervisor heartbeat LED
    heartbeat_led: HeartbeatLedResources {
        led_pin: PIN_3,
    },
    /// Piezo horn
    horn: HornResources {
        buzzer_pin: PIN_4,
    },
    /// Go button, mission start trigger
    go_button: GoButtonResources {
        btn_pin: PIN_16,
    },
    /// TB6612FNG dual motor driver pins and PWM channels
    motor_driver: MotorDriverResources {
        standby_pin: PIN_22,
        // Motor drive PWM
        left_slice: PWM_SLICE6,
        left_pwm_pin: PIN_28,
        left_forward_pin: PIN_21,
        left_backward_pin: PIN_20,
        // Motor drive PWM
        right_slice: PWM_SLICE5,
        right_pwm_pin: PIN_27,
        right_forward_pin: PIN_19,
        right_backward_pin: PIN_18,
    },
}

bind_interrupts!(pub struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});
