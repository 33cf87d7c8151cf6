//! Process-wide keyboard listener registry.
//!
//! Every key press read from the terminal is offered to the [`KeyboardHub`].
//! Widgets register listeners while mounted; a listener maps a key press to an
//! optional [`Message`], which the hub posts to the mailbox of the widget that
//! registered it.
//!
//! Registration returns a [`KeySubscription`]. The subscription is the only way
//! to remove the listener: calling [`KeySubscription::unsubscribe`] or simply
//! dropping the handle deregisters it, so a listener can never outlive the
//! widget that owns the handle.
//!
//! # Example
//!
//! ```rust
//! use std::sync::mpsc;
//! use lifecycle::{KeyboardHub, KeyMsg, Message};
//!
//! let hub = KeyboardHub::new();
//! let (tx, rx) = mpsc::channel();
//!
//! let sub = hub.subscribe(tx, |key| (key.as_char() == Some('+')).then(|| Message::new(1i64)));
//! assert_eq!(hub.dispatch(&KeyMsg::from_char('+')), 1);
//! assert_eq!(rx.try_recv().unwrap().downcast::<i64>(), Some(1));
//!
//! sub.unsubscribe();
//! assert_eq!(hub.dispatch(&KeyMsg::from_char('+')), 0);
//! assert_eq!(hub.listener_count(), 0);
//! ```

use std::sync::mpsc::Sender;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::key::KeyMsg;
use crate::message::Message;

type Listener = Box<dyn Fn(&KeyMsg) -> Option<Message> + Send>;

struct Entry {
    id: u64,
    listener: Listener,
    mailbox: Sender<Message>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Shared registry of keyboard listeners.
///
/// Cloning the hub yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    registry: Arc<Mutex<Registry>>,
}

impl KeyboardHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener that posts its messages to `mailbox`.
    pub fn subscribe<F>(&self, mailbox: Sender<Message>, listener: F) -> KeySubscription
    where
        F: Fn(&KeyMsg) -> Option<Message> + Send + 'static,
    {
        let mut registry = self.registry.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push(Entry {
            id,
            listener: Box::new(listener),
            mailbox,
        });
        tracing::trace!(listener = id, "keyboard listener registered");

        KeySubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Offer a key press to every listener.
    ///
    /// Returns the number of messages posted. Listeners whose mailbox has been
    /// closed are skipped.
    pub fn dispatch(&self, key: &KeyMsg) -> usize {
        let registry = self.registry.lock();
        let mut posted = 0;
        for entry in &registry.entries {
            if let Some(msg) = (entry.listener)(key) {
                if entry.mailbox.send(msg).is_ok() {
                    posted += 1;
                } else {
                    tracing::trace!(listener = entry.id, "mailbox closed; message dropped");
                }
            }
        }
        posted
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.lock().entries.len()
    }
}

impl std::fmt::Debug for KeyboardHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardHub")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle to a registered keyboard listener.
///
/// Dropping the handle deregisters the listener.
#[must_use = "dropping a KeySubscription immediately removes the listener"]
#[derive(Debug)]
pub struct KeySubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl KeySubscription {
    /// Identifier of the listener within its hub.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|r| r.lock().entries.iter().any(|e| e.id == self.id))
    }

    /// Deregister the listener.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().entries.retain(|e| e.id != self.id);
            tracing::trace!(listener = self.id, "keyboard listener removed");
        }
    }
}
