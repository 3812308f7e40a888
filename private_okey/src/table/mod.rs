//! Table containers.
//!
//! This module implements the persistent parts of the scene:
//! - Scene layout: world transforms of pile areas, racks and the pool root
//! - Pile registry: the 15 face-down draw piles
//! - Rack registry: the per-seat hands filled by dealing

pub mod layout;
pub mod piles;
pub mod racks;

pub use layout::{SceneLayout, Transform, ViewSlot};
pub use piles::{Pile, PileRegistry};
pub use racks::RackRegistry;
