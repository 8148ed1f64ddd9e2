//! `kbsnap-core` — shared configuration, constants and error type.
//!
//! Every other crate in the workspace depends on this one; it must stay
//! free of I/O beyond reading the config file.

pub mod config;
pub mod error;

pub use config::KbsnapConfig;
pub use error::{KbsnapError, Result};
