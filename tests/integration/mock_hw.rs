//! Mock hardware adapter for integration tests.
//!
//! Inputs are plain fields the test sets before each cycle; every
//! actuator call is recorded so tests can assert on the full command
//! history without a robot.

use std::collections::{HashMap, HashSet};

use whamo::app::events::AppEvent;
use whamo::app::ports::{
    ActuatorPort, AxisId, EventSink, InputPort, ModePort, MotorId, Position, SolenoidId,
};
use whamo::sensors::ButtonId;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    SetDrive { left: f32, right: f32 },
    SetMotor { motor: MotorId, value: f32 },
    SetSolenoid { solenoid: SolenoidId, position: Position },
    StartCompressor,
    RegulatePressure,
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub pressed: HashSet<ButtonId>,
    pub axes: HashMap<AxisId, f32>,
    pub arm_volts: f32,
    pub calls: Vec<ActuatorCall>,
    solenoids: HashMap<SolenoidId, Position>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            axes: HashMap::new(),
            arm_volts: 2.5,
            calls: Vec::new(),
            solenoids: HashMap::new(),
        }
    }

    pub fn press(&mut self, id: ButtonId) {
        self.pressed.insert(id);
    }

    pub fn release(&mut self, id: ButtonId) {
        self.pressed.remove(&id);
    }

    pub fn set_axis(&mut self, axis: AxisId, value: f32) {
        self.axes.insert(axis, value);
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Last value written to `motor`, or 0 before any write / after `all_off`.
    pub fn motor(&self, motor: MotorId) -> f32 {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetMotor { motor: m, value } if *m == motor => Some(*value),
                ActuatorCall::AllOff => Some(0.0),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    pub fn drive(&self) -> (f32, f32) {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::SetDrive { left, right } => Some((*left, *right)),
                ActuatorCall::AllOff => Some((0.0, 0.0)),
                _ => None,
            })
            .unwrap_or((0.0, 0.0))
    }

    pub fn solenoid_commands(&self, solenoid: SolenoidId) -> Vec<Position> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::SetSolenoid { solenoid: s, position } if *s == solenoid => {
                    Some(*position)
                }
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &ActuatorCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl InputPort for MockHardware {
    fn axis(&mut self, axis: AxisId) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }

    fn button(&mut self, id: ButtonId) -> bool {
        self.pressed.contains(&id)
    }

    fn arm_voltage(&mut self) -> f32 {
        self.arm_volts
    }
}

impl ActuatorPort for MockHardware {
    fn set_drive(&mut self, left: f32, right: f32) {
        self.calls.push(ActuatorCall::SetDrive { left, right });
    }

    fn set_motor(&mut self, motor: MotorId, value: f32) {
        self.calls.push(ActuatorCall::SetMotor { motor, value });
    }

    fn set_solenoid(&mut self, solenoid: SolenoidId, position: Position) {
        self.solenoids.insert(solenoid, position);
        self.calls.push(ActuatorCall::SetSolenoid { solenoid, position });
    }

    fn solenoid(&self, solenoid: SolenoidId) -> Position {
        self.solenoids
            .get(&solenoid)
            .copied()
            .unwrap_or(Position::Reverse)
    }

    fn start_compressor(&mut self) {
        self.calls.push(ActuatorCall::StartCompressor);
    }

    fn regulate_pressure(&mut self) {
        self.calls.push(ActuatorCall::RegulatePressure);
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn telemetry(&self) -> Vec<&whamo::app::events::TelemetryData> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Telemetry(t) => Some(t),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── CountdownMode ─────────────────────────────────────────────

/// Operator control for a fixed number of polls.
pub struct CountdownMode {
    pub remaining: u32,
    pub polls: u32,
}

impl CountdownMode {
    pub fn new(cycles: u32) -> Self {
        Self {
            remaining: cycles,
            polls: 0,
        }
    }
}

impl ModePort for CountdownMode {
    fn is_operator_control(&mut self) -> bool {
        self.polls += 1;
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
