//! Follows the game's `EE.log` and extracts mission status from it.
//!
//! Two pieces compose here: [`Follower`] delivers appended log lines one at
//! a time, and [`Classifier`] matches each line against the known patterns,
//! updating the session records or signalling a finished mission. The
//! caller drives them sequentially; no line is read while the previous one
//! is still being classified.

mod classify;
mod follow;

pub use classify::{Classifier, ClassifyError};
pub use follow::Follower;
