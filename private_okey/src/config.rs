//! Engine configuration.
//!
//! Sizes the pools, spaces the scene and times the deal flight. Every field
//! has a default matching the standard Okey table, so a partial document
//! deserializes into a usable config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    game::constants::{
        DECK_SIZE, DEFAULT_DEAL_BATCH, FACE_COPIES, JOKER_COPIES, MAX_FLIGHT_SECONDS,
        MIN_FLIGHT_SECONDS,
    },
    table::SceneLayout,
};

/// Configuration consumed by [`crate::Reconciler`] and the pools it owns.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of tile handles in the token pool
    pub deck_size: usize,
    /// Visuals provisioned per coloured face code
    pub face_copies: usize,
    /// Visuals provisioned for the joker
    pub joker_copies: usize,
    /// Deal batch size used when the source pile's last count is unknown
    pub fallback_batch: usize,
    /// Spacing between piles owned by one seat, and between rack tiles
    pub pile_x_step: f32,
    /// Vertical spacing of tiles stacked in a pile or bundle
    pub tile_y_step: f32,
    /// Duration of one deal flight
    pub deal_fly_seconds: f32,
    /// World transforms of the fixed scene containers
    pub layout: SceneLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deck_size: DECK_SIZE,
            face_copies: FACE_COPIES,
            joker_copies: JOKER_COPIES,
            fallback_batch: DEFAULT_DEAL_BATCH,
            pile_x_step: 0.035,
            tile_y_step: 0.004,
            deal_fly_seconds: 1.0,
            layout: SceneLayout::default(),
        }
    }
}

impl EngineConfig {
    /// Flight duration, clamped to the range the animation accepts.
    pub fn flight_duration(&self) -> Duration {
        let max = Duration::from_secs_f32(MAX_FLIGHT_SECONDS);
        if self.deal_fly_seconds.is_nan() {
            return Duration::from_secs_f32(MIN_FLIGHT_SECONDS);
        }
        Duration::try_from_secs_f32(self.deal_fly_seconds.max(MIN_FLIGHT_SECONDS))
            .map_or(max, |d| d.min(max))
    }

    /// Checks the values that would break pool sizing or geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deck_size == 0 || self.deck_size > usize::from(u16::MAX) {
            return Err(ConfigError::invalid(
                "deck_size",
                format!("Must be between 1 and {}", u16::MAX),
            ));
        }

        if self.fallback_batch == 0 {
            return Err(ConfigError::invalid("fallback_batch", "Must be greater than 0"));
        }

        for (var, value) in [
            ("pile_x_step", self.pile_x_step),
            ("tile_y_step", self.tile_y_step),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(var, "Must be a finite, non-negative number"));
            }
        }

        if !self.deal_fly_seconds.is_finite() {
            return Err(ConfigError::invalid("deal_fly_seconds", "Must be a finite number"));
        }

        if self.deal_fly_seconds > MAX_FLIGHT_SECONDS {
            return Err(ConfigError::invalid(
                "deal_fly_seconds",
                format!("Must be at most {MAX_FLIGHT_SECONDS} seconds"),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl ConfigError {
    fn invalid(var: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}
