#![forbid(unsafe_code)]

//! Host driver for the tailterm scrollback engine.
//!
//! `tailterm-console` sits between a host application and
//! [`tailterm-core`](tailterm_core): it binds a viewport to a rendering
//! [`Surface`], forwards writes, scroll gestures, and the execution lock,
//! and turns the viewport's dirty flag into coalesced repaints on a
//! periodic tick.
//!
//! Hosts implement [`Surface`] for their display (a canvas, a TTY region, a
//! widget); [`CaptureSurface`] covers tests and headless use.

pub mod console;
pub mod surface;

pub use console::{Console, DEFAULT_TICK_INTERVAL};
pub use surface::{CaptureSurface, Surface};
