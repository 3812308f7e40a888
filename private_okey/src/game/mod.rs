//! Okey table vocabulary.
//!
//! This module provides the value types the rest of the engine is built on:
//! - Deck, pile and seat constants
//! - Validated pile and seat identifiers
//! - Server tile identities and the visual keys derived from them
//! - A fixed-size table indexed by pile id

pub mod constants;
pub mod entities;
