#![forbid(unsafe_code)]

//! Bounded scrollback console engine.
//!
//! `tailterm-core` is the host-agnostic text store at the heart of tailterm.
//! It owns line storage, size accounting, the trimming policy, and the
//! viewport pin model — all without any host I/O dependencies.
//!
//! # Primary responsibilities
//!
//! - **ScrollbackBuffer**: append-only line store with monotone indices,
//!   lossy per-line and whole-buffer caps, and the scroll anchor.
//! - **Viewport**: grid dimensions, dirty/locked state, the wrap-aware
//!   render window, and the scroll-up/scroll-down/lock policy.
//! - **Row**: one wrapped, fixed-width slice of a logical line, the unit a
//!   host paints to its display grid.
//!
//! # Design principles
//!
//! - **No I/O**: all types are pure data + logic; the host supplies text and
//!   paints windows.
//! - **Bounded**: sustained high-volume writes trade history for a capped
//!   footprint and never error.
//! - **Deterministic**: identical call sequences always produce identical
//!   state.

pub mod scrollback;
pub mod viewport;

pub use scrollback::{
    DEFAULT_MAX_LINE_LEN, DEFAULT_TARGET_SIZE, Line, OutOfRangeError, ScrollbackBuffer,
};
pub use viewport::{InvalidDimensionsError, Row, Viewport, ViewportFlags};
