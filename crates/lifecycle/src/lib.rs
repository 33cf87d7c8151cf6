#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Lifecycle
//!
//! A small widget runtime built around an explicit component lifecycle.
//!
//! Widgets implement [`Component`]; a [`Host`] drives one component through
//! its phases with caller-invoked transitions:
//!
//! ```text
//! construct -> mount -> (derive -> should_update -> render -> snapshot
//!                        -> commit -> did_update)* -> unmount
//!                   \-> error capture (derive_state_from_error, did_catch)
//! ```
//!
//! Rendering is a pure function from props and state to a display-tree
//! description ([`Node`]). The [`frame`] module turns a committed tree into
//! terminal text, and [`Program`] runs a [`Model`] inside a real terminal.
//!
//! ## Modules
//!
//! - **message** - type-erased messages
//! - **command** - lazy side effects producing messages
//! - **key** / **mouse** - terminal input
//! - **tree** - display-tree description
//! - **frame** - terminal rendering with hit regions and hover hints
//! - **component** - the lifecycle trait and its context
//! - **keyboard** - process-wide key listener registry
//! - **host** - the lifecycle state machine
//! - **program** / **simulator** - terminal and headless drivers

pub mod command;
pub mod component;
pub mod frame;
pub mod host;
pub mod key;
pub mod keyboard;
pub mod message;
pub mod mouse;
pub mod program;
pub mod simulator;
pub mod tree;

pub use command::{Cmd, batch, quit, run_inline};
pub use component::{Component, Context, ErrorInfo, Liveness, RenderError};
pub use frame::{Frame, FrameOptions, HitRegion};
pub use host::{Host, LifecycleError, Phase, RenderStats};
pub use key::{KeyMsg, KeyType};
pub use keyboard::{KeySubscription, KeyboardHub};
pub use message::{InterruptMsg, Message, QuitMsg, WindowSizeMsg};
pub use mouse::{MouseAction, MouseButton, MouseMsg};
pub use program::{Error, Model, Program, ProgramOptions, Result};
pub use tree::{Callback, Color, Element, ElementKind, Node, Style};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::command::{Cmd, batch, quit};
    pub use crate::component::{Component, Context, ErrorInfo, RenderError};
    pub use crate::host::{Host, LifecycleError, Phase};
    pub use crate::key::{KeyMsg, KeyType};
    pub use crate::keyboard::{KeySubscription, KeyboardHub};
    pub use crate::message::Message;
    pub use crate::mouse::MouseMsg;
    pub use crate::tree::{Callback, Element, ElementKind, Node, Style};
}
