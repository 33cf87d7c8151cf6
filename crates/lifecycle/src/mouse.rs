//! Mouse input handling.
//!
//! Pointer events drive two things in this runtime: clicks, which are
//! hit-tested against the last rendered [`Frame`](crate::Frame) and handed to
//! the element's [`Callback`](crate::Callback), and motion, which selects the
//! element whose hover hint is shown.

/// Mouse event message.
///
/// Note: Mouse events must be enabled using `Program::with_mouse_all_motion()`.
///
/// # Example
///
/// ```rust
/// use lifecycle::MouseMsg;
///
/// let click = MouseMsg::left_click(3, 4);
/// assert!(click.is_click());
/// assert_eq!((click.x, click.y), (3, 4));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseMsg {
    /// X coordinate (column), 0-indexed.
    pub x: u16,
    /// Y coordinate (row), 0-indexed.
    pub y: u16,
    /// Whether Shift was held.
    pub shift: bool,
    /// Whether Alt was held.
    pub alt: bool,
    /// Whether Ctrl was held.
    pub ctrl: bool,
    /// The action that occurred.
    pub action: MouseAction,
    /// The button involved.
    pub button: MouseButton,
}

impl MouseMsg {
    /// A left-button press at the given cell.
    pub fn left_click(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            action: MouseAction::Press,
            button: MouseButton::Left,
            ..Default::default()
        }
    }

    /// A button-less motion event at the given cell.
    pub fn motion(x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            action: MouseAction::Motion,
            button: MouseButton::None,
            ..Default::default()
        }
    }

    /// Check if this is a primary click (left press).
    pub fn is_click(&self) -> bool {
        self.button == MouseButton::Left && self.action == MouseAction::Press
    }
}

/// Mouse action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseAction {
    /// Mouse button pressed.
    #[default]
    Press,
    /// Mouse button released.
    Release,
    /// Mouse moved.
    Motion,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// No button (motion only).
    #[default]
    None,
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// Scroll wheel up.
    WheelUp,
    /// Scroll wheel down.
    WheelDown,
}

/// Convert a crossterm mouse event to our MouseMsg.
///
/// Horizontal scrolling is not distinguished and maps to a button-less press.
pub fn from_crossterm_mouse(event: crossterm::event::MouseEvent) -> MouseMsg {
    use crossterm::event::{MouseButton as CtButton, MouseEventKind};

    let action = match event.kind {
        MouseEventKind::Down(_) => MouseAction::Press,
        MouseEventKind::Up(_) => MouseAction::Release,
        MouseEventKind::Drag(_) | MouseEventKind::Moved => MouseAction::Motion,
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => MouseAction::Press,
    };

    let button = match event.kind {
        MouseEventKind::Down(b) | MouseEventKind::Up(b) | MouseEventKind::Drag(b) => match b {
            CtButton::Left => MouseButton::Left,
            CtButton::Right => MouseButton::Right,
            CtButton::Middle => MouseButton::Middle,
        },
        MouseEventKind::ScrollUp => MouseButton::WheelUp,
        MouseEventKind::ScrollDown => MouseButton::WheelDown,
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight | MouseEventKind::Moved => {
            MouseButton::None
        }
    };

    MouseMsg {
        x: event.column,
        y: event.row,
        shift: event.modifiers.contains(crossterm::event::KeyModifiers::SHIFT),
        alt: event.modifiers.contains(crossterm::event::KeyModifiers::ALT),
        ctrl: event.modifiers.contains(crossterm::event::KeyModifiers::CONTROL),
        action,
        button,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_click() {
        assert!(MouseMsg::left_click(0, 0).is_click());
        assert!(!MouseMsg::motion(0, 0).is_click());

        let release = MouseMsg {
            action: MouseAction::Release,
            ..MouseMsg::left_click(0, 0)
        };
        assert!(!release.is_click());
    }

    #[test]
    fn test_from_crossterm_left_down() {
        use crossterm::event::{KeyModifiers, MouseEvent, MouseEventKind};

        let event = MouseEvent {
            kind: MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: 7,
            row: 2,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(from_crossterm_mouse(event), MouseMsg::left_click(7, 2));
    }
}
