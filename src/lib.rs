//! Time-block scheduling for a team dashboard.
//!
//! The library turns pointer gestures into committed time intervals on two
//! views: a per-day grid of 30 minute slots (one column per person) and a
//! Gantt timeline of task bars. [`engine`] holds the gesture state machines
//! and layout functions, [`model`] the data they operate on.

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod model;
