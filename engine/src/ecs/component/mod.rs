//! Component-type registry for the ECS.
//!
//! This module provides the infrastructure for declaring the kinds of data
//! ("component types") that entities may carry, assigning each kind a stable
//! runtime identity, and producing freshly-initialized, type-erased storage
//! for instances of that kind on demand.
//!
//! ## Architecture
//!
//! The registry consists of several key types:
//!
//! - [`Component`]: The trait that all component types must implement
//! - [`Id`]: A unique process-wide identifier for each registered kind
//! - [`Allocator`]: Hands out fresh [`Id`]s, strictly increasing
//! - [`Shape`]: Structural metadata about a kind (layout, drop function, type identity)
//! - [`Descriptor`]: The registered record binding an id, shape, display name,
//!   and default-value initializer for one component kind
//! - [`Instance`]: An owned, type-erased block of memory produced by
//!   [`Descriptor::allocate`], tagged with the originating descriptor's id
//!
//! ## Registration and allocation
//!
//! Registration is a bootstrap-phase concern: each distinct component kind is
//! registered once, which validates any supplied default value and assigns an
//! id. All validation happens there; the allocation path, which runs once per
//! entity per component, stays branch-free and cheap.
//!
//! ## Usage
//!
//! ```ignore
//! use sable_engine::ecs::component::Descriptor;
//! use sable_macros::Component;
//!
//! #[derive(Component, Clone, Copy, Default)]
//! struct Position { x: f32, y: f32 }
//!
//! let position = Descriptor::with_default::<Position>(
//!     Box::new(Position { x: 0.0, y: 0.0 }),
//! )?;
//!
//! // Called by the storage layer whenever a Position is attached to an entity.
//! let instance = position.allocate();
//! ```

mod descriptor;
mod id;
mod instance;
mod shape;

pub use descriptor::{Descriptor, DescriptorError};
pub use id::{Allocator, Id};
pub use instance::Instance;
pub use shape::Shape;

/// A trait representing a component in the ECS (Entity Component System).
///
/// At present this only sets the required trait bounds for a type to be used
/// as a component. The `Send + Sync` bounds are what make descriptors and
/// instances safe to hand across threads once registration has completed.
pub trait Component: 'static + Sized + Send + Sync {}
