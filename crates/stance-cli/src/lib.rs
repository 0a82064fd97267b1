//! Stance CLI support library.
//!
//! Holds the pieces of the `stance` binary that are usable as a library,
//! currently the posture service simulator.

pub mod sim;
