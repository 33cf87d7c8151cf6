#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Widgets
//!
//! Widgets built on the [`lifecycle`] runtime:
//! - **button** - stateless clickable control with icon and hover hint
//! - **counter** - counter with remote initial value, keyboard shortcuts and
//!   error capture
//! - **fault** - a child that can be armed to fail while rendering
//! - **count_source** - where the counter's initial value comes from
//! - **key** - key binding definitions and matching
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lifecycle::{Host, KeyboardHub, run_inline};
//! use widgets::{CounterProps, CounterWidget, FixedCountSource};
//!
//! let counter = CounterWidget::new(Arc::new(FixedCountSource::ok(42)));
//! let mut host = Host::new(counter, CounterProps::new("demo"), KeyboardHub::new());
//!
//! let fetch = host.mount().unwrap().unwrap();
//! for msg in run_inline(fetch) {
//!     host.update(msg).unwrap();
//! }
//! assert_eq!(host.state().count, 42);
//! ```

pub mod button;
pub mod count_source;
pub mod counter;
pub mod fault;
pub mod key;

pub use button::{ButtonProps, ButtonVariant, ButtonWidget, Icon};
pub use count_source::{
    CountSource, DEFAULT_ENDPOINT, FALLBACK_COUNT, FetchError, FixedCountSource, HttpCountSource,
    parse_count,
};
pub use counter::{CountFetched, CounterMsg, CounterProps, CounterState, CounterWidget};
pub use fault::FaultProbe;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::button::{ButtonProps, ButtonVariant, ButtonWidget, Icon};
    pub use crate::count_source::{CountSource, FetchError, FixedCountSource, HttpCountSource};
    pub use crate::counter::{CounterMsg, CounterProps, CounterState, CounterWidget};
    pub use crate::fault::FaultProbe;
    pub use crate::key::{Binding, CounterKeyMap, matches};
}
