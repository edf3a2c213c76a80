//! Control loop task
//!
//! Runs the controller superloop: one tick per iteration, then carries
//! out the returned plan by writing each angle and waiting out its hold.
//! The plan's loop delay paces the next iteration.

use defmt::*;
use embassy_rp::pwm::PwmOutput;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{Instant, Timer};

use deflect_core::traits::{DiagnosticSink, ServoActuator};
use deflect_core::{Controller, Diagnostic, ServoMove};
use deflect_drivers::console::{SerialInput, SerialOutput};
use deflect_drivers::servo::PwmServo;

use crate::sensor::AdcSensor;

/// Servo on the board's PWM output
pub type Servo = PwmServo<PwmOutput<'static>>;

/// Forwards diagnostics to the serial console and the defmt log
struct LoggingSink {
    serial: SerialOutput<BufferedUartTx>,
}

impl DiagnosticSink for LoggingSink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        debug!("{}", diagnostic);
        self.serial.emit(diagnostic);
    }
}

/// Control task - owns every peripheral the loop touches
#[embassy_executor::task]
pub async fn control_task(
    mut controller: Controller,
    mut sensor: AdcSensor,
    mut servo: Servo,
    rx: BufferedUartRx,
    tx: BufferedUartTx,
) {
    info!("Control task started");

    let mut input = SerialInput::new(rx);
    let mut sink = LoggingSink {
        serial: SerialOutput::new(tx),
    };

    let first = controller.start(&mut sink);
    perform(&mut servo, first).await;

    let start = Instant::now();
    let mut reported_drops = 0;

    loop {
        let now_ms = start.elapsed().as_millis() as u32;
        let plan = controller.step(now_ms, &mut sensor, &mut input, &mut sink);

        trace!("tick {}ms: {} moves", now_ms, plan.moves.len());

        for servo_move in plan.moves.iter() {
            perform(&mut servo, *servo_move).await;
        }

        let dropped = sink.serial.dropped_lines();
        if dropped != reported_drops {
            warn!("Serial console dropped {} lines", dropped.wrapping_sub(reported_drops));
            reported_drops = dropped;
        }

        Timer::after_millis(plan.loop_delay_ms as u64).await;
    }
}

/// Write one angle and wait out its hold
async fn perform(servo: &mut Servo, servo_move: ServoMove) {
    if let Err(e) = servo.write_angle(servo_move.angle) {
        warn!("Servo write failed: {:?}", e);
    }
    if servo_move.hold_ms > 0 {
        Timer::after_millis(servo_move.hold_ms as u64).await;
    }
}
