//! Hover Machine - header reveal for frameless blocks.
//!
//! The header of a frameless block is hidden until the pointer rests near
//! the top edge. Moving into the top margin arms a debounce timer; the header
//! appears only if the pointer is still there when the timer fires.
//!
//! ```text
//!        near top                 deadline reached
//!  Off ────────────▶ Pending ─────────────────────▶ On
//!   ▲                   │                           │
//!   └── away from top ──┘                           │
//!   └────────────────── pointer leaves frame ───────┘
//! ```
//!
//! The machine has no timer of its own. The host passes the current time to
//! [`HoverMachine::pointer_move`] and [`HoverMachine::tick`], and uses
//! [`HoverMachine::next_deadline`] to know when to call `tick` next.
//!
//! # Example
//!
//! ```ignore
//! let hover = HoverMachine::new(15, Duration::from_millis(100));
//! hover.pointer_move(3, now);
//! hover.tick(now + Duration::from_millis(100));
//! assert!(hover.header_visible());
//! ```

use std::cell::Cell;
use std::time::{Duration, Instant};

use spark_signals::{Signal, signal};

use crate::config::BlockConfig;
use crate::input::{FrameBounds, PointerEvent, PointerKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverState {
    Off,
    /// Armed, reveals the header at the deadline.
    Pending { deadline: Instant },
    On,
}

/// Per-frame hover state. Ghost machines never leave their initial state.
pub struct HoverMachine {
    state: Cell<HoverState>,
    margin: u16,
    delay: Duration,
    ghost: bool,
    header: Signal<bool>,
}

impl HoverMachine {
    pub fn new(margin: u16, delay: Duration) -> Self {
        Self {
            state: Cell::new(HoverState::Off),
            margin,
            delay,
            ghost: false,
            header: signal(false),
        }
    }

    pub fn from_config(config: &BlockConfig) -> Self {
        Self::new(config.hover_margin, config.hover_delay())
    }

    /// A machine for ghost rendering: header always visible, input ignored.
    pub fn ghost() -> Self {
        Self {
            state: Cell::new(HoverState::On),
            margin: 0,
            delay: Duration::ZERO,
            ghost: true,
            header: signal(true),
        }
    }

    pub fn state(&self) -> HoverState {
        self.state.get()
    }

    pub fn is_ghost(&self) -> bool {
        self.ghost
    }

    pub fn header_visible(&self) -> bool {
        self.header.get()
    }

    /// Signal backing header visibility, for reactive readers.
    pub fn header_signal(&self) -> Signal<bool> {
        self.header.clone()
    }

    /// Pointer moved inside the frame, `offset_y` rows below its top edge.
    ///
    /// An overdue debounce fires before the move is applied.
    pub fn pointer_move(&self, offset_y: u16, now: Instant) {
        if self.ghost {
            return;
        }
        self.tick(now);
        let near_top = offset_y <= self.margin;
        match (self.state.get(), near_top) {
            (HoverState::Off, true) => {
                self.state.set(HoverState::Pending {
                    deadline: now + self.delay,
                });
            }
            (HoverState::Pending { .. }, false) => {
                self.state.set(HoverState::Off);
            }
            _ => {}
        }
        self.tick(now);
    }

    /// Fire the debounce timer if it is due.
    pub fn tick(&self, now: Instant) {
        if let HoverState::Pending { deadline } = self.state.get() {
            if now >= deadline {
                self.state.set(HoverState::On);
                self.header.set(true);
            }
        }
    }

    /// Pointer left the frame: hide the header and disarm.
    pub fn pointer_leave(&self) {
        if self.ghost {
            return;
        }
        self.state.set(HoverState::Off);
        self.header.set(false);
    }

    /// When the host should call [`tick`](Self::tick) next.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state.get() {
            HoverState::Pending { deadline } => Some(deadline),
            _ => None,
        }
    }

    /// Route a pointer event given the frame's screen bounds.
    pub fn handle_pointer(&self, event: &PointerEvent, bounds: FrameBounds, now: Instant) {
        match event.kind {
            PointerKind::Leave => self.pointer_leave(),
            _ if !bounds.contains(event.x, event.y) => self.pointer_leave(),
            _ => self.pointer_move(event.y - bounds.y, now),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
