//! Identity resolution for the local player's tiles.
//!
//! Tiles dealt to the local seat land face-down before the server tells us
//! what they are, or after; both orders happen. Arrivals wait in a pending
//! queue, disclosures wait in an early queue, and the two are paired oldest
//! first.

pub mod resolver;

pub use resolver::{IdentityResolver, multiset_difference};
