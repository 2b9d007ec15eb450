//! Pointer input: normalized pointer tracking, eased camera sway, and form tilt.

pub mod pointer;

pub use pointer::{PointerController, PointerState, Tilt, TiltTarget};
