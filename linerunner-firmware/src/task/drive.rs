//! Motor actuation relay
//!
//! Forwards committed wheel commands verbatim to the TB6612FNG motor
//! driver. No clamping or filtering happens here - the controllers that
//! produced the command are responsible for its range - and no other task
//! touches the driver, so the actuator has a single writer.

use crate::system::drive_command;
use crate::system::resources::MotorDriverResources;
use defmt::info;
use embassy_rp::gpio;
use embassy_rp::pwm;
use tb6612fng::{DriveCommand, Motor, Tb6612fng};

#[embassy_executor::task]
pub async fn drive(r: MotorDriverResources) {
    // Configure PWM for motor control
    // We use 10kHz frequency as cheaper DC motors often work better at lower frequencies
    let desired_freq_hz = 10_000;
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq(); // 150MHz

    // Calculate minimum divider needed to keep period under 16-bit limit (65535)
    let divider = ((clock_freq_hz / desired_freq_hz) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (desired_freq_hz * divider as u32)) as u16 - 1;

    // Configure PWM
    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = divider.into();
    pwm_config.top = period;

    // Initialize TB6612FNG motor driver pins
    let stby = gpio::Output::new(r.standby_pin, gpio::Level::Low);

    // motor A, here defined to be the left motor
    let left_fwd = gpio::Output::new(r.left_forward_pin, gpio::Level::Low);
    let left_bckw = gpio::Output::new(r.left_backward_pin, gpio::Level::Low);
    let left_pwm = pwm::Pwm::new_output_a(r.left_slice, r.left_pwm_pin, pwm_config.clone());
    let left_motor = Motor::new(left_fwd, left_bckw, left_pwm).unwrap();

    // motor B, here defined to be the right motor
    let right_fwd = gpio::Output::new(r.right_forward_pin, gpio::Level::Low);
    let right_bckw = gpio::Output::new(r.right_backward_pin, gpio::Level::Low);
    let right_pwm = pwm::Pwm::new_output_b(r.right_slice, r.right_pwm_pin, pwm_config.clone());
    let right_motor = Motor::new(right_fwd, right_bckw, right_pwm).unwrap();

    // Create motor driver controller instance and wake it up
    let mut control = Tb6612fng::new(left_motor, right_motor, stby).unwrap();
    control.disable_standby().unwrap();

    info!("Motor relay started");

    loop {
        let speeds = drive_command::wait().await;

        match speeds.left {
            s if s > 0 => control.motor_a.drive(DriveCommand::Forward(s as u8)).unwrap(),
            s if s < 0 => control
                .motor_a
                .drive(DriveCommand::Backward(s.unsigned_abs()))
                .unwrap(),
            _ => control.motor_a.drive(DriveCommand::Stop).unwrap(),
        }

        match speeds.right {
            s if s > 0 => control.motor_b.drive(DriveCommand::Forward(s as u8)).unwrap(),
            s if s < 0 => control
                .motor_b
                .drive(DriveCommand::Backward(s.unsigned_abs()))
                .unwrap(),
            _ => control.motor_b.drive(DriveCommand::Stop).unwrap(),
        }
    }
}
