//! Board wiring
//!
//! Pin assignments are board-specific. Defaults target a Raspberry Pi
//! Pico:
//!
//! | Function | Pin | Peripheral |
//! |---|---|---|
//! | Servo signal | GPIO9 | PWM slice 4, channel B |
//! | Position sensor | GPIO26 | ADC0 |
//! | Serial TX / RX | GPIO0 / GPIO1 | UART0 |

/// PWM frame rate for hobby servos
pub const SERVO_PWM_HZ: u32 = 50;

/// PWM clock divider; keeps the 50 Hz period inside the 16-bit counter
pub const SERVO_PWM_DIVIDER: u8 = 64;

/// RP2040 ADC resolution is 12 bits; sensor bands are 10-bit
pub const ADC_SHIFT: u8 = 2;

/// PWM counter wrap value for the servo frame rate
pub fn servo_pwm_top(clk_sys_hz: u32) -> u16 {
    (clk_sys_hz / (SERVO_PWM_HZ * SERVO_PWM_DIVIDER as u32) - 1) as u16
}
