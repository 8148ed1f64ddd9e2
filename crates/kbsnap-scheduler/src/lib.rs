//! `kbsnap-scheduler` — in-process recurrence engine for the snapshot job.
//!
//! # Overview
//!
//! The [`engine::SchedulerEngine`] holds a single [`Schedule`], polls once per
//! second, and forwards a [`Trigger`] over an mpsc channel whenever the next
//! computed run time arrives. The consumer (the runner binary) owns the job
//! itself — the engine never executes anything.
//!
//! # Schedule variants
//!
//! | Variant      | Behaviour                                                  |
//! |--------------|------------------------------------------------------------|
//! | `Interval`   | Repeat every N seconds                                     |
//! | `Daily`      | Fire at HH:MM UTC every day                                |
//! | `EveryNDays` | Fire at HH:MM UTC on days of month where `(day-1) % N == 0` |
//!
//! `EveryNDays` reproduces cron `*/N` day-of-month semantics, so `N = 3`
//! fires on the 1st, 4th, 7th, … of each month — including back-to-back runs
//! across a 31st → 1st month boundary, exactly as cron would.

pub mod engine;
pub mod error;
pub mod schedule;
pub mod types;

pub use engine::SchedulerEngine;
pub use error::{Result, SchedulerError};
pub use schedule::compute_next_run;
pub use types::{Schedule, Trigger};
