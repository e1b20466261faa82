//! Simulation core and presentation helpers for a multi-agent
//! pipe-dodging side-scroller. The core (field, bird, collision, round) is
//! headless; `draw` and the binaries put it on screen or on stdout.

pub mod agent;
pub mod bird;
pub mod collision;
pub mod config;
pub mod draw;
pub mod field;
pub mod round;
pub mod sprite;
