//! Controller tick orchestration
//!
//! One call to [`Controller::tick`] is one iteration of the control
//! loop. The stages always run in the same order:
//!
//! 1. sampler, and the sensor policy when a smoothed reading is due
//! 2. idle policy
//! 3. command interpreter
//! 4. final actuator write
//!
//! A serial command therefore always wins over the sensor and idle
//! decisions of the same iteration. The controller never sleeps; it
//! returns a [`TickPlan`] of angles and hold times and leaves waiting to
//! the caller.

use heapless::Vec;

use crate::command::{Command, CommandInterpreter, NamedPosition};
use crate::config::{ConfigError, ControllerConfig};
use crate::decision::{PositionEngine, Side};
use crate::diagnostics::Diagnostic;
use crate::sampler::SensorSampler;
use crate::traits::{AnalogSensor, ByteSource, DiagnosticSink};

/// Most actuator writes in one iteration: two wiggle pulses and the final write
pub const MAX_MOVES_PER_TICK: usize = 3;

/// One actuator write followed by a hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoMove {
    /// Angle to write (degrees)
    pub angle: u8,
    /// Time to wait after the write (ms)
    pub hold_ms: u16,
}

/// Actuator work produced by one iteration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickPlan {
    /// Writes in execution order; the last one is always the target angle
    pub moves: Vec<ServoMove, MAX_MOVES_PER_TICK>,
    /// Delay before the next iteration starts (ms)
    pub loop_delay_ms: u16,
}

impl TickPlan {
    /// Angle of the final write
    pub fn final_angle(&self) -> Option<u8> {
        self.moves.last().map(|m| m.angle)
    }

    /// Total time the plan blocks, including the loop delay
    pub fn duration_ms(&self) -> u32 {
        self.moves.iter().map(|m| m.hold_ms as u32).sum::<u32>() + self.loop_delay_ms as u32
    }
}

/// Complete controller state
pub struct Controller {
    config: ControllerConfig,
    sampler: SensorSampler,
    engine: PositionEngine,
    interpreter: CommandInterpreter,
    /// Echo smoothed readings to the diagnostic sink
    echo: bool,
    /// Position at the previous final write
    prev_pos: u8,
}

impl Controller {
    /// Create a controller resting at center
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            sampler: SensorSampler::new(config.sample_window),
            engine: PositionEngine::new(config),
            interpreter: CommandInterpreter::new(config.max_angle_deg),
            echo: false,
            prev_pos: config.center(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Get the decision engine
    pub fn engine(&self) -> &PositionEngine {
        &self.engine
    }

    /// Current target position
    pub fn position(&self) -> u8 {
        self.engine.position()
    }

    /// Check whether smoothed readings are echoed
    pub fn echo_enabled(&self) -> bool {
        self.echo
    }

    /// Announce readiness and return the initial actuator write
    pub fn start<D: DiagnosticSink>(&mut self, sink: &mut D) -> ServoMove {
        self.prev_pos = self.engine.position();
        sink.emit(&Diagnostic::Ready);
        ServoMove {
            angle: self.engine.output_angle(),
            hold_ms: 0,
        }
    }

    /// Run one iteration, polling the sensor and serial input
    pub fn step<S, B, D>(
        &mut self,
        now_ms: u32,
        sensor: &mut S,
        input: &mut B,
        sink: &mut D,
    ) -> TickPlan
    where
        S: AnalogSensor,
        B: ByteSource,
        D: DiagnosticSink,
    {
        let raw = sensor.read_raw();
        let byte = input.try_read_byte();
        self.tick(now_ms, raw, byte, sink)
    }

    /// Run one iteration with an already-taken sample and input byte
    pub fn tick<D: DiagnosticSink>(
        &mut self,
        now_ms: u32,
        raw_sample: u16,
        input: Option<u8>,
        sink: &mut D,
    ) -> TickPlan {
        let mut moves = Vec::new();

        if let Some(reading) = self.sampler.push(raw_sample) {
            if self.echo {
                sink.emit(&Diagnostic::Sensor { value: reading });
            }
            if let Some(side) = self.engine.on_reading(reading, now_ms) {
                self.report_transition(side, sink);
            }
        }

        if let Some(idle) = self.engine.on_idle(now_ms) {
            for angle in idle.pulses {
                // Two pulses plus the final write fit MAX_MOVES_PER_TICK
                let _ = moves.push(ServoMove {
                    angle,
                    hold_ms: self.config.wiggle_hold_ms,
                });
            }
            if let Some(side) = idle.transition {
                self.report_transition(side, sink);
            }
        }

        if let Some(byte) = input {
            if let Some(command) = self.interpreter.feed(byte) {
                self.apply(command, now_ms, sink);
            }
        }

        let pos = self.engine.position();
        let hold_ms = if pos != self.prev_pos {
            self.config.settle_ms
        } else {
            0
        };
        self.prev_pos = pos;

        // At most two moves precede this one, so it always fits
        let _ = moves.push(ServoMove {
            angle: self.engine.output_angle(),
            hold_ms,
        });

        TickPlan {
            moves,
            loop_delay_ms: self.config.loop_delay_ms,
        }
    }

    fn apply<D: DiagnosticSink>(&mut self, command: Command, now_ms: u32, sink: &mut D) {
        match command {
            Command::Goto(named) => {
                let angle = match named {
                    NamedPosition::Left => self.config.left(),
                    NamedPosition::Center => self.config.center(),
                    NamedPosition::Right => self.config.right(),
                };
                self.engine.override_position(angle, now_ms);
            }
            Command::ToggleEcho => {
                self.echo = !self.echo;
            }
            Command::Absolute { digits, position } => {
                self.engine.override_position(position, now_ms);
                sink.emit(&Diagnostic::DigitEcho { digits, position });
            }
        }
    }

    fn report_transition<D: DiagnosticSink>(&self, side: Side, sink: &mut D) {
        let (total_left, total_right) = self.engine.totals();
        sink.emit(&Diagnostic::Transition {
            side,
            total_left,
            total_right,
        });
    }
}
