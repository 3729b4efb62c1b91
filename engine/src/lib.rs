//! Sable engine library.
//!
//! The entry point into the engine is the [`ecs`] module, which currently
//! hosts the component-type registry: declaring component kinds, assigning
//! them process-wide identities, and materializing type-erased instances.

// Allow the derive macros to refer to `::sable_engine` from within this crate.
extern crate self as sable_engine;

pub mod ecs;
