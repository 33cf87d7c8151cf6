//! Keyboard input handling.
//!
//! Key presses arrive from the terminal as crossterm events and are converted
//! into [`KeyMsg`]. Widgets do not receive key messages directly; they
//! subscribe to the [`KeyboardHub`](crate::KeyboardHub), which fans every
//! press out to the registered listeners.

use std::fmt;

/// Keyboard key event message.
///
/// # Example
///
/// ```rust
/// use lifecycle::{KeyMsg, KeyType};
///
/// let plus = KeyMsg::from_char('+');
/// assert_eq!(plus.key_type, KeyType::Runes);
/// assert_eq!(plus.as_char(), Some('+'));
/// assert_eq!(plus.to_string(), "+");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMsg {
    /// The type of key pressed.
    pub key_type: KeyType,
    /// For KeyType::Runes, the characters typed.
    pub runes: Vec<char>,
    /// Whether Alt was held.
    pub alt: bool,
    /// Whether this came from a paste operation.
    pub paste: bool,
}

impl KeyMsg {
    /// Create a new key message from a key type.
    pub fn from_type(key_type: KeyType) -> Self {
        Self {
            key_type,
            runes: Vec::new(),
            alt: false,
            paste: false,
        }
    }

    /// Create a new key message from a character.
    pub fn from_char(c: char) -> Self {
        Self {
            key_type: KeyType::Runes,
            runes: vec![c],
            alt: false,
            paste: false,
        }
    }

    /// Set the alt modifier.
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// The single character this key press typed, if it typed exactly one.
    ///
    /// Pastes and alt-chords never count as a single key press.
    pub fn as_char(&self) -> Option<char> {
        if self.key_type != KeyType::Runes || self.alt || self.paste {
            return None;
        }
        match self.runes.as_slice() {
            [c] => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alt {
            write!(f, "alt+")?;
        }
        if self.key_type == KeyType::Runes {
            if self.paste {
                write!(f, "[")?;
            }
            for c in &self.runes {
                write!(f, "{}", c)?;
            }
            if self.paste {
                write!(f, "]")?;
            }
        } else {
            write!(f, "{}", self.key_type)?;
        }
        Ok(())
    }
}

/// Key type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Regular character(s) input.
    Runes,
    /// Break/Interrupt (Ctrl+C).
    CtrlC,
    /// Enter.
    Enter,
    /// Escape.
    Esc,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Space key.
    Space,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Any other key the runtime does not distinguish.
    Other,
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::Runes => "runes",
            KeyType::CtrlC => "ctrl+c",
            KeyType::Enter => "enter",
            KeyType::Esc => "esc",
            KeyType::Tab => "tab",
            KeyType::Backspace => "backspace",
            KeyType::Space => " ",
            KeyType::Up => "up",
            KeyType::Down => "down",
            KeyType::Left => "left",
            KeyType::Right => "right",
            KeyType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// Convert a crossterm key code and modifiers to a [`KeyMsg`].
pub fn from_crossterm_key(
    code: crossterm::event::KeyCode,
    modifiers: crossterm::event::KeyModifiers,
) -> KeyMsg {
    use crossterm::event::{KeyCode, KeyModifiers};

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    let mut msg = match code {
        KeyCode::Char('c') | KeyCode::Char('C') if ctrl => KeyMsg::from_type(KeyType::CtrlC),
        KeyCode::Char(_) if ctrl => KeyMsg::from_type(KeyType::Other),
        KeyCode::Char(' ') => KeyMsg::from_type(KeyType::Space),
        KeyCode::Char(c) => KeyMsg::from_char(c),
        KeyCode::Enter => KeyMsg::from_type(KeyType::Enter),
        KeyCode::Esc => KeyMsg::from_type(KeyType::Esc),
        KeyCode::Tab => KeyMsg::from_type(KeyType::Tab),
        KeyCode::Backspace => KeyMsg::from_type(KeyType::Backspace),
        KeyCode::Up => KeyMsg::from_type(KeyType::Up),
        KeyCode::Down => KeyMsg::from_type(KeyType::Down),
        KeyCode::Left => KeyMsg::from_type(KeyType::Left),
        KeyCode::Right => KeyMsg::from_type(KeyType::Right),
        _ => KeyMsg::from_type(KeyType::Other),
    };
    msg.alt = alt;
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn test_key_msg_display() {
        assert_eq!(KeyMsg::from_char('+').to_string(), "+");
        assert_eq!(KeyMsg::from_char('a').with_alt().to_string(), "alt+a");
        assert_eq!(KeyMsg::from_type(KeyType::Enter).to_string(), "enter");
    }

    #[test]
    fn test_as_char_only_for_plain_single_runes() {
        assert_eq!(KeyMsg::from_char('-').as_char(), Some('-'));
        assert_eq!(KeyMsg::from_char('-').with_alt().as_char(), None);
        assert_eq!(KeyMsg::from_type(KeyType::Esc).as_char(), None);

        let mut pasted = KeyMsg::from_char('+');
        pasted.paste = true;
        assert_eq!(pasted.as_char(), None);
    }

    #[test]
    fn test_from_crossterm_plus_with_shift() {
        // '+' is typed with shift on most layouts; shift must not hide it.
        let msg = from_crossterm_key(KeyCode::Char('+'), KeyModifiers::SHIFT);
        assert_eq!(msg.as_char(), Some('+'));
    }

    #[test]
    fn test_from_crossterm_ctrl_c() {
        let msg = from_crossterm_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(msg.key_type, KeyType::CtrlC);
    }

    #[test]
    fn test_from_crossterm_special_keys() {
        let msg = from_crossterm_key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(msg.key_type, KeyType::Esc);
        let msg = from_crossterm_key(KeyCode::F(5), KeyModifiers::NONE);
        assert_eq!(msg.key_type, KeyType::Other);
    }
}
