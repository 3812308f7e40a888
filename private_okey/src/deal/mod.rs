//! Dealing.
//!
//! This module implements the two halves of a deal tick:
//! - Detection: comparing a snapshot's remaining-deal counter with the cache
//! - Flight: moving the dealt batch from its pile to a rack over time

pub mod detector;
pub mod flight;

pub use detector::{DealTick, detect};
pub use flight::{Flight, FlightState};
