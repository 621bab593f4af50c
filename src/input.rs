//! Input - crossterm mouse events as pointer events.
//!
//! The hover machine only cares where the pointer is and whether it left.
//! Terminal focus loss is reported as [`PointerKind::Leave`], since the
//! terminal stops reporting motion once it is unfocused.
//!
//! # API
//!
//! - `convert_mouse_event` - crossterm `MouseEvent` to [`PointerEvent`]
//! - `convert_event` - any crossterm event to an optional [`PointerEvent`]
//! - `FrameBounds::contains` - hit test against a frame rectangle

use crossterm::event::{Event as CrosstermEvent, MouseEvent as CrosstermMouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Down,
    Up,
    Drag,
    Scroll,
    /// Pointer left the terminal (or the frame, when synthesized by a host).
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Column (0-indexed)
    pub x: u16,
    /// Row (0-indexed)
    pub y: u16,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: u16, y: u16) -> Self {
        Self { kind, x, y }
    }

    pub fn moved(x: u16, y: u16) -> Self {
        Self::new(PointerKind::Move, x, y)
    }

    pub fn leave() -> Self {
        Self::new(PointerKind::Leave, 0, 0)
    }
}

/// Screen rectangle occupied by a frame, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameBounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl FrameBounds {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && u32::from(x) < u32::from(self.x) + u32::from(self.width)
            && u32::from(y) < u32::from(self.y) + u32::from(self.height)
    }
}

/// Convert crossterm MouseEvent to a PointerEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> PointerEvent {
    let kind = match event.kind {
        MouseEventKind::Down(_) => PointerKind::Down,
        MouseEventKind::Up(_) => PointerKind::Up,
        MouseEventKind::Drag(_) => PointerKind::Drag,
        MouseEventKind::Moved => PointerKind::Move,
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => PointerKind::Scroll,
    };
    PointerEvent::new(kind, event.column, event.row)
}

/// Pointer-relevant part of a terminal event.
pub fn convert_event(event: CrosstermEvent) -> Option<PointerEvent> {
    match event {
        CrosstermEvent::Mouse(mouse) => Some(convert_mouse_event(mouse)),
        CrosstermEvent::FocusLost => Some(PointerEvent::leave()),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton as CrosstermMouseButton};

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_convert_mouse_move() {
        let event = convert_mouse_event(mouse(MouseEventKind::Moved, 10, 5));
        assert_eq!(event, PointerEvent::moved(10, 5));
    }

    #[test]
    fn test_convert_mouse_buttons() {
        let down = convert_mouse_event(mouse(
            MouseEventKind::Down(CrosstermMouseButton::Left),
            1,
            2,
        ));
        assert_eq!(down.kind, PointerKind::Down);

        let drag = convert_mouse_event(mouse(
            MouseEventKind::Drag(CrosstermMouseButton::Right),
            1,
            2,
        ));
        assert_eq!(drag.kind, PointerKind::Drag);

        let scroll = convert_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(scroll.kind, PointerKind::Scroll);
    }

    #[test]
    fn test_convert_event_focus_lost() {
        assert_eq!(
            convert_event(CrosstermEvent::FocusLost),
            Some(PointerEvent::leave())
        );
        assert_eq!(convert_event(CrosstermEvent::FocusGained), None);
        assert_eq!(convert_event(CrosstermEvent::Resize(80, 24)), None);
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = FrameBounds::new(10, 20, 5, 3);
        assert!(bounds.contains(10, 20));
        assert!(bounds.contains(14, 22));
        assert!(!bounds.contains(15, 22));
        assert!(!bounds.contains(14, 23));
        assert!(!bounds.contains(9, 20));

        let edge = FrameBounds::new(u16::MAX - 1, 0, 10, 1);
        assert!(edge.contains(u16::MAX, 0));
    }
}
