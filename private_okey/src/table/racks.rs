//! Per-seat hand racks filled by arriving deal flights.

use glam::Vec3;

use crate::{
    game::{constants::SEAT_COUNT, entities::Seat},
    pool::{Parent, TileHandle, TokenPool, VisualPool},
};

/// Append-only tile sequences, one per seat.
///
/// Racks only grow while dealing and are drained as a whole when a new deal
/// begins.
#[derive(Debug)]
pub struct RackRegistry {
    racks: [Vec<TileHandle>; SEAT_COUNT],
    column_step: f32,
}

impl RackRegistry {
    pub fn new(column_step: f32) -> Self {
        Self {
            racks: Default::default(),
            column_step,
        }
    }

    /// Parents `handle` into `seat`'s rack after the tiles already there.
    /// Returns the rack index the tile landed at.
    pub fn append(&mut self, seat: Seat, handle: TileHandle, tokens: &mut TokenPool) -> usize {
        let rack = &mut self.racks[seat.index()];
        let index = rack.len();
        let offset = Vec3::new(index as f32 * self.column_step, 0.0, 0.0);
        tokens.place(handle, Parent::Rack(seat), offset);
        rack.push(handle);
        index
    }

    pub fn tiles(&self, seat: Seat) -> &[TileHandle] {
        &self.racks[seat.index()]
    }

    pub fn len(&self, seat: Seat) -> usize {
        self.racks[seat.index()].len()
    }

    pub fn contains(&self, seat: Seat, handle: TileHandle) -> bool {
        self.racks[seat.index()].contains(&handle)
    }

    /// Tiles held across all racks.
    pub fn total_len(&self) -> usize {
        self.racks.iter().map(Vec::len).sum()
    }

    /// Releases every rack tile to the free pool.
    pub fn drain_all(&mut self, tokens: &mut TokenPool, visuals: &mut VisualPool) -> usize {
        let mut released = 0;
        for rack in &mut self.racks {
            for handle in rack.drain(..) {
                tokens.release(handle, visuals);
                released += 1;
            }
        }
        released
    }
}
