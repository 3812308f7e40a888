//! Scene containers and the seat-relative view mapping.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::game::entities::Seat;

/// Screen position of a seat relative to the local player.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewSlot {
    Main,
    Right,
    Top,
    Left,
}

impl ViewSlot {
    /// The local seat is always `Main`; the other seats follow clockwise.
    pub fn relative(local: Seat, seat: Seat) -> Self {
        match local.distance_to(seat) {
            0 => Self::Main,
            1 => Self::Right,
            2 => Self::Top,
            _ => Self::Left,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Main => 0,
            Self::Right => 1,
            Self::Top => 2,
            Self::Left => 3,
        }
    }
}

/// World position and orientation of a container.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Maps a point local to this container into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// World transforms of the fixed scene containers: one pile area and one
/// rack per view slot, plus the pool root where idle objects are parked.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SceneLayout {
    /// Pile areas in `Main, Right, Top, Left` order.
    pub pile_areas: [Transform; 4],
    /// Racks in `Main, Right, Top, Left` order.
    pub racks: [Transform; 4],
    pub pool_root: Transform,
}

impl SceneLayout {
    pub fn pile_area(&self, slot: ViewSlot) -> Transform {
        self.pile_areas[slot.index()]
    }

    pub fn rack(&self, slot: ViewSlot) -> Transform {
        self.racks[slot.index()]
    }
}

impl Default for SceneLayout {
    fn default() -> Self {
        let facing = |quarter_turns: f32| Quat::from_rotation_y(quarter_turns * FRAC_PI_2);
        Self {
            pile_areas: [
                Transform::new(Vec3::new(-0.25, 0.0, -0.2), facing(0.0)),
                Transform::new(Vec3::new(0.2, 0.0, -0.25), facing(1.0)),
                Transform::new(Vec3::new(0.25, 0.0, 0.2), facing(2.0)),
                Transform::new(Vec3::new(-0.2, 0.0, 0.25), facing(3.0)),
            ],
            racks: [
                Transform::new(Vec3::new(-0.28, 0.02, -0.45), facing(0.0)),
                Transform::new(Vec3::new(0.45, 0.02, -0.28), facing(1.0)),
                Transform::new(Vec3::new(0.28, 0.02, 0.45), facing(2.0)),
                Transform::new(Vec3::new(-0.45, 0.02, 0.28), facing(3.0)),
            ],
            pool_root: Transform::new(Vec3::new(0.0, -1.0, 0.0), Quat::IDENTITY),
        }
    }
}
