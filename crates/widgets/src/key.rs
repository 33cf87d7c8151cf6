//! Key binding definitions and matching.
//!
//! Bindings are matched against the display form of a [`KeyMsg`]: `"+"`,
//! `"esc"`, `"ctrl+c"`, `"alt+x"`. A pasted `+` displays as `"[+]"` and so never
//! matches a single-key binding.
//!
//! # Example
//!
//! ```rust
//! use lifecycle::KeyMsg;
//! use widgets::key::{Binding, matches};
//!
//! let inc = Binding::new().keys(&["+"]).help("+", "increment");
//! let dec = Binding::new().keys(&["-"]).help("-", "decrement");
//!
//! assert!(matches(KeyMsg::from_char('+'), &[&inc, &dec]));
//! assert!(!matches(KeyMsg::from_char('x'), &[&inc, &dec]));
//! ```

use std::fmt;

use lifecycle::{KeyMsg, Message};

use crate::counter::CounterMsg;

/// Help information for a keybinding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// The key(s) to display in help text.
    pub key: String,
    /// Description of what the binding does.
    pub desc: String,
}

impl Help {
    /// Creates new help information.
    #[must_use]
    pub fn new(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            desc: desc.into(),
        }
    }
}

/// A keybinding with associated help text.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<String>,
    help: Help,
}

impl Binding {
    /// Creates a new empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keys for this binding.
    #[must_use]
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Sets the help text for this binding.
    #[must_use]
    pub fn help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help::new(key, desc);
        self
    }

    /// Returns the keys for this binding.
    #[must_use]
    pub fn get_keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the help information for this binding.
    #[must_use]
    pub fn get_help(&self) -> &Help {
        &self.help
    }

    /// A binding is enabled if it has at least one key.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.keys.is_empty()
    }
}

/// Checks if the given key matches any of the given enabled bindings.
pub fn matches<K: fmt::Display>(key: K, bindings: &[&Binding]) -> bool {
    let key_str = key.to_string();
    bindings
        .iter()
        .filter(|b| b.enabled())
        .any(|b| b.keys.iter().any(|k| *k == key_str))
}

/// Checks if the given key matches a single binding.
pub fn matches_one<K: fmt::Display>(key: K, binding: &Binding) -> bool {
    matches(key, &[binding])
}

/// Keys the counter listens for while mounted.
#[derive(Debug, Clone)]
pub struct CounterKeyMap {
    /// Adds one.
    pub increment: Binding,
    /// Subtracts one.
    pub decrement: Binding,
}

impl Default for CounterKeyMap {
    fn default() -> Self {
        Self {
            increment: Binding::new().keys(&["+"]).help("+", "increment"),
            decrement: Binding::new().keys(&["-"]).help("-", "decrement"),
        }
    }
}

impl CounterKeyMap {
    /// The counter message a key press stands for, if any.
    pub fn action(&self, key: &KeyMsg) -> Option<CounterMsg> {
        if matches_one(key, &self.increment) {
            Some(CounterMsg::Increment)
        } else if matches_one(key, &self.decrement) {
            Some(CounterMsg::Decrement)
        } else {
            None
        }
    }

    /// Keyboard listener body: maps a key press to a message for the counter.
    pub fn listen(&self, key: &KeyMsg) -> Option<Message> {
        self.action(key).map(Message::new)
    }

    /// Short help line, e.g. `"+ increment • - decrement"`.
    pub fn short_help(&self) -> String {
        [&self.increment, &self.decrement]
            .iter()
            .filter(|b| b.enabled())
            .map(|b| format!("{} {}", b.get_help().key, b.get_help().desc))
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifecycle::KeyType;

    #[test]
    fn test_binding_enabled() {
        assert!(Binding::new().keys(&["+"]).enabled());
        assert!(!Binding::new().enabled());
        assert!(!Binding::new().keys(&[]).help("+", "increment").enabled());
    }

    #[test]
    fn test_keyless_binding_is_left_out() {
        let keymap = CounterKeyMap {
            increment: Binding::new().help("+", "increment"),
            ..CounterKeyMap::default()
        };
        assert_eq!(keymap.action(&KeyMsg::from_char('+')), None);
        assert_eq!(keymap.short_help(), "- decrement");
    }

    #[test]
    fn test_matches_special_keys() {
        let quit = Binding::new().keys(&["q", "esc", "ctrl+c"]);
        assert!(matches_one(KeyMsg::from_char('q'), &quit));
        assert!(matches_one(KeyMsg::from_type(KeyType::Esc), &quit));
        assert!(matches_one(KeyMsg::from_type(KeyType::CtrlC), &quit));
        assert!(!matches_one(KeyMsg::from_char('Q'), &quit));
    }

    #[test]
    fn test_counter_keymap_actions() {
        let keymap = CounterKeyMap::default();
        assert_eq!(
            keymap.action(&KeyMsg::from_char('+')),
            Some(CounterMsg::Increment)
        );
        assert_eq!(
            keymap.action(&KeyMsg::from_char('-')),
            Some(CounterMsg::Decrement)
        );
        assert_eq!(keymap.action(&KeyMsg::from_char('=')), None);
        assert_eq!(keymap.action(&KeyMsg::from_char('+').with_alt()), None);
        assert!(keymap.listen(&KeyMsg::from_type(KeyType::Enter)).is_none());
    }

    #[test]
    fn test_pasted_plus_is_ignored() {
        let mut pasted = KeyMsg::from_char('+');
        pasted.paste = true;
        assert_eq!(CounterKeyMap::default().action(&pasted), None);
    }

    #[test]
    fn test_short_help() {
        assert_eq!(
            CounterKeyMap::default().short_help(),
            "+ increment • - decrement"
        );
    }
}
