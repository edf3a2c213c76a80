//! deflect - Servo deflector firmware
//!
//! Main firmware binary for RP2040-based boards. Averages an analog
//! position sensor, decides a target angle with debounce and idle
//! behavior, accepts manual overrides over serial, and drives a hobby
//! servo.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use deflect_core::Controller;
use deflect_drivers::servo::PwmServo;

use crate::sensor::AdcSensor;

mod board;
mod config;
mod sensor;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("deflect firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Configuration was validated by build.rs; a failure here means the
    // generated constants and the core validation disagree
    let controller = match Controller::new(config::CONTROLLER) {
        Ok(controller) => controller,
        Err(e) => defmt::panic!("Invalid controller configuration: {:?}", e),
    };
    info!(
        "Controller: center={} left={} right={} idle={}ms",
        config::CONTROLLER.center(),
        config::CONTROLLER.left(),
        config::CONTROLLER.right(),
        config::CONTROLLER.idle_timeout_ms()
    );

    // Serial console
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = config::SERIAL_BAUD;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized at {} baud", config::SERIAL_BAUD);

    // Servo PWM at 50 Hz
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = board::SERVO_PWM_DIVIDER.into();
    pwm_config.top = board::servo_pwm_top(embassy_rp::clocks::clk_sys_freq());

    let pwm = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_9, pwm_config);
    let (_, servo_out) = pwm.split();
    let Some(servo_out) = servo_out else {
        defmt::panic!("PWM channel B not available");
    };
    let servo = PwmServo::new(servo_out, config::SERVO);

    info!("Servo PWM initialized");

    // Position sensor
    let adc = Adc::new_blocking(p.ADC, embassy_rp::adc::Config::default());
    let channel = Channel::new_pin(p.PIN_26, Pull::None);
    let sensor = AdcSensor::new(adc, channel);

    info!("ADC initialized");

    spawner
        .spawn(tasks::control_task(controller, sensor, servo, rx, tx))
        .unwrap();

    info!("Control task spawned, firmware running");
}
