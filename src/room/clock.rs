//! Game clock: Pending → Running → Ended

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    Pending,
    Running,
    Ended,
}

/// What one tick did to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Clock is not counting
    Idle,
    /// Counted down; `checkpoint` marks seconds that should be persisted
    Counted { remaining: u32, checkpoint: bool },
    /// Counted down to zero
    Expired,
}

#[derive(Debug, Clone)]
pub struct RoomClock {
    state: ClockState,
    remaining: u32,
    duration: u32,
    checkpoint_interval: u32,
    /// Set when the room emptied while running
    drained: bool,
}

impl RoomClock {
    pub fn new(duration: u32, checkpoint_interval: u32) -> Self {
        Self {
            state: ClockState::Pending,
            remaining: duration,
            duration,
            checkpoint_interval: checkpoint_interval.max(1),
            drained: false,
        }
    }

    pub fn restore(&mut self, state: ClockState, remaining: u32, drained: bool) {
        self.state = state;
        self.remaining = remaining;
        self.drained = drained;
    }

    /// Pending → Running with a full countdown
    pub fn start(&mut self) -> bool {
        if self.state != ClockState::Pending {
            return false;
        }
        self.state = ClockState::Running;
        self.remaining = self.duration;
        self.drained = false;
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.state != ClockState::Running || self.drained || self.remaining == 0 {
            return TickOutcome::Idle;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            return TickOutcome::Expired;
        }

        TickOutcome::Counted {
            remaining: self.remaining,
            checkpoint: self.remaining % self.checkpoint_interval == 0,
        }
    }

    pub fn end(&mut self) -> bool {
        if self.state == ClockState::Ended {
            return false;
        }
        self.state = ClockState::Ended;
        self.drained = false;
        true
    }

    /// Stop counting without ending the game
    pub fn drain(&mut self) -> bool {
        if self.state != ClockState::Running || self.drained {
            return false;
        }
        self.drained = true;
        true
    }

    /// Clear the drained mark if there is time left to count
    pub fn resume(&mut self) -> bool {
        if self.state != ClockState::Running || self.remaining == 0 {
            return false;
        }
        self.drained = false;
        true
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn is_drained(&self) -> bool {
        self.drained
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds left as shown to clients; `None` before the game starts
    pub fn time_left(&self) -> Option<u32> {
        match self.state {
            ClockState::Pending => None,
            _ => Some(self.remaining),
        }
    }
}
