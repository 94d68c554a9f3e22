//! Input subsystem: the per-cycle [`InputSnapshot`] plus the analog
//! and digital sensor drivers behind the hardware adapter.
//!
//! The snapshot owns one [`EdgeDetector`] per tracked button or switch.
//! [`InputSnapshot::refresh`] is called exactly once at the start of each
//! control cycle; every consumer then reads that cycle's events through
//! [`InputSnapshot::event`].

pub mod limit_switch;
pub mod potentiometer;

use serde::{Deserialize, Serialize};

use crate::app::ports::InputPort;
use crate::drivers::button::{EdgeDetector, SwitchEvent};

/// Logical identity of every button or switch the robot can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    CollectorForward,
    CollectorReverse,
    Shooter,
    Claw1Lock,
    Claw1Unlock,
    Claw2Lock,
    Claw2Unlock,
    Shift,
    /// Disk index switch in the indexer (not an operator button).
    IndexSwitch,
}

impl ButtonId {
    pub const COUNT: usize = 9;

    pub const ALL: [Self; Self::COUNT] = [
        Self::CollectorForward,
        Self::CollectorReverse,
        Self::Shooter,
        Self::Claw1Lock,
        Self::Claw1Unlock,
        Self::Claw2Lock,
        Self::Claw2Unlock,
        Self::Shift,
        Self::IndexSwitch,
    ];
}

// ---------------------------------------------------------------------------
// Tracked-input registration
// ---------------------------------------------------------------------------

/// The explicit list of inputs an [`InputSnapshot`] samples.
///
/// Built once before the loop starts.  Inputs not listed here never
/// produce events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedInputs {
    ids: heapless::Vec<ButtonId, { ButtonId::COUNT }>,
}

impl TrackedInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every known input.
    pub fn all() -> Self {
        let mut tracked = Self::new();
        for id in ButtonId::ALL {
            tracked.enable(id);
        }
        tracked
    }

    /// Register `id`.  Registering twice is a no-op.
    pub fn enable(&mut self, id: ButtonId) {
        if !self.contains(id) {
            // Capacity equals the number of ButtonId variants, so a
            // de-duplicated push cannot overflow.
            let _ = self.ids.push(id);
        }
    }

    /// Builder form of [`enable`](Self::enable).
    #[must_use]
    pub fn with(mut self, id: ButtonId) -> Self {
        self.enable(id);
        self
    }

    pub fn contains(&self, id: ButtonId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ButtonId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ---------------------------------------------------------------------------
// InputSnapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Tracked {
    id: ButtonId,
    detector: EdgeDetector,
    event: SwitchEvent,
}

/// Edge events for every tracked input, valid for the current cycle only.
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    tracked: heapless::Vec<Tracked, { ButtonId::COUNT }>,
    refreshes: u64,
}

impl InputSnapshot {
    pub fn new(inputs: &TrackedInputs) -> Self {
        let mut tracked = heapless::Vec::new();
        for id in inputs.iter() {
            let _ = tracked.push(Tracked {
                id,
                detector: EdgeDetector::new(),
                event: SwitchEvent::None,
            });
        }
        Self {
            tracked,
            refreshes: 0,
        }
    }

    /// Sample every tracked input and update its edge detector.
    ///
    /// The very first refresh only seeds the detectors, so a button held
    /// at start-up does not report `Closed`.
    pub fn refresh(&mut self, io: &mut impl InputPort) {
        for t in &mut self.tracked {
            let level = io.button(t.id);
            t.event = t.detector.update(level);
        }
        self.refreshes += 1;
    }

    /// Event computed by the most recent [`refresh`](Self::refresh).
    /// `SwitchEvent::None` for untracked inputs and before the first refresh.
    pub fn event(&self, id: ButtonId) -> SwitchEvent {
        self.find(id).map_or(SwitchEvent::None, |t| t.event)
    }

    /// Last sampled raw level of a tracked input.
    pub fn level(&self, id: ButtonId) -> Option<bool> {
        self.find(id).and_then(|t| t.detector.level())
    }

    pub fn is_tracked(&self, id: ButtonId) -> bool {
        self.find(id).is_some()
    }

    /// Number of refreshes since construction.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    fn find(&self, id: ButtonId) -> Option<&Tracked> {
        self.tracked.iter().find(|t| t.id == id)
    }
}
