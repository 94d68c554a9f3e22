//! Edge detector for buttons and switches.
//!
//! ## Model
//!
//! The main loop samples each tracked input exactly once per control
//! cycle and feeds the raw level to [`EdgeDetector::update`], which
//! compares it with the previous sample:
//!
//! | Previous | Current | Event               |
//! |----------|---------|---------------------|
//! | false    | true    | `SwitchEvent::Closed` |
//! | true     | false   | `SwitchEvent::Opened` |
//! | same     | same    | `SwitchEvent::None`   |
//!
//! An event is reported for exactly one cycle per physical transition.
//! A button held down reports `Closed` once and `None` afterwards.
//!
//! ## Skipped cycles
//!
//! If `update()` is not called during a cycle in which the input went
//! down and back up, that transition pair is never seen.  Callers must
//! sample every cycle.

/// Per-cycle transition event for one button or switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchEvent {
    /// No change since the previous sample.
    #[default]
    None,
    /// The contact closed (false → true).
    Closed,
    /// The contact opened (true → false).
    Opened,
}

impl SwitchEvent {
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }

    pub fn is_opened(self) -> bool {
        self == Self::Opened
    }
}

/// Converts a raw boolean sample stream into discrete transition events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    /// `None` until the first sample has been taken.
    previous: Option<bool>,
}

impl EdgeDetector {
    /// Detector with no prior sample.  The first `update()` only seeds it.
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Detector seeded with an explicit first sample.
    pub const fn with_initial(level: bool) -> Self {
        Self {
            previous: Some(level),
        }
    }

    /// Feed the current raw level.  Call once per control cycle.
    pub fn update(&mut self, level: bool) -> SwitchEvent {
        let event = match self.previous {
            Some(false) if level => SwitchEvent::Closed,
            Some(true) if !level => SwitchEvent::Opened,
            _ => SwitchEvent::None,
        };
        self.previous = Some(level);
        event
    }

    /// Last sampled level, if any sample has been taken.
    pub fn level(&self) -> Option<bool> {
        self.previous
    }

    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }
}
