//! The deal flight state machine.

use glam::{Quat, Vec3};
use std::time::Duration;

use crate::{
    game::entities::Seat,
    pool::{BundleId, TileHandle},
    table::Transform,
};

/// Where a flight is in its lifecycle. Time is supplied from outside
/// through [`Flight::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlightState {
    Idle,
    Flying { elapsed: Duration },
    Arrived,
}

/// A dealt batch travelling from its pile to a rack as one bundle.
#[derive(Debug)]
pub struct Flight {
    bundle: BundleId,
    tiles: Vec<TileHandle>,
    seat: Seat,
    to_local: bool,
    from: Vec3,
    to: Vec3,
    rotation: Quat,
    duration: Duration,
    state: FlightState,
}

impl Flight {
    /// `tiles` are in delivery order. `to_local` marks a batch dealt to the
    /// local player, whose tiles still need identities on arrival.
    pub fn new(
        bundle: BundleId,
        tiles: Vec<TileHandle>,
        seat: Seat,
        to_local: bool,
        from: Transform,
        to: Vec3,
        duration: Duration,
    ) -> Self {
        Self {
            bundle,
            tiles,
            seat,
            to_local,
            from: from.position,
            to,
            rotation: from.rotation,
            duration,
            state: FlightState::Idle,
        }
    }

    /// Starts the clock. Launching a flight twice has no effect.
    pub fn launch(&mut self) {
        if self.state == FlightState::Idle {
            self.state = FlightState::Flying {
                elapsed: Duration::ZERO,
            };
        }
    }

    /// Moves the clock forward by `dt` and returns the bundle's new position.
    pub fn advance(&mut self, dt: Duration) -> Vec3 {
        if let FlightState::Flying { elapsed } = self.state {
            let elapsed = elapsed + dt;
            self.state = if elapsed >= self.duration {
                FlightState::Arrived
            } else {
                FlightState::Flying { elapsed }
            };
        }
        self.position()
    }

    /// Fraction of the trip covered, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        match self.state {
            FlightState::Idle => 0.0,
            FlightState::Flying { elapsed } if !self.duration.is_zero() => {
                (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
            }
            FlightState::Flying { .. } | FlightState::Arrived => 1.0,
        }
    }

    /// Linear interpolation between source and destination.
    pub fn position(&self) -> Vec3 {
        self.from.lerp(self.to, self.progress())
    }

    /// Orientation carried over from the source pile for the whole trip.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn state(&self) -> FlightState {
        self.state
    }

    pub fn is_arrived(&self) -> bool {
        self.state == FlightState::Arrived
    }

    pub fn bundle(&self) -> BundleId {
        self.bundle
    }

    pub fn tiles(&self) -> &[TileHandle] {
        &self.tiles
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn is_to_local(&self) -> bool {
        self.to_local
    }

    pub fn destination(&self) -> Vec3 {
        self.to
    }

    /// Consumes the flight, handing back its bundle and tiles.
    pub fn into_cargo(self) -> (BundleId, Vec<TileHandle>) {
        (self.bundle, self.tiles)
    }
}
