//! Common component types used across benchmarks.
//!
//! These components are designed to be representative of real game components
//! in terms of size and initialization cost.

use sable_macros::Component;

/// 3D position component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 3D velocity component (12 bytes).
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 4x4 transformation matrix (64 bytes).
#[derive(Component, Clone, Copy, Debug)]
pub struct Transform {
    pub matrix: [[f32; 4]; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Health component for damageable entities.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Heap-owning component: allocation has to deep-copy the default.
#[derive(Component, Clone, Debug, Default)]
pub struct Inventory {
    pub items: Vec<u32>,
}

/// Zero-sized marker component.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Marker;
