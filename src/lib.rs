//! Exam room scheduling by recursive backtracking.
//!
//! Every course is placed in exactly one room such that the enrollments sharing a room never
//! exceed its seats. [`find_schedule`] returns the first fitting assignment in a fixed
//! depth-first order; [`find_all_schedules`] returns every one of them in that same order.
//!
//! The search runs over [`ScheduleState`], a persistent value: each commit produces a new
//! state and leaves its parent untouched, so backtracking is just dropping the branch.

pub mod config;
pub mod data;
pub mod error;
pub mod server;
pub mod solver;
pub mod state;

pub use data::{Course, Room};
pub use error::ScheduleError;
pub use solver::{find_all_schedules, find_schedule};
pub use state::ScheduleState;
