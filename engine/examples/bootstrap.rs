//! Registers a handful of component kinds the way an application bootstrap
//! phase would, then allocates and inspects a few instances.
//!
//! Run with: `cargo run -p sable_engine --example bootstrap`

use sable_engine::ecs::component::Descriptor;
use sable_macros::Component;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Component, Clone, Copy, Debug, Default)]
struct Health {
    current: f32,
    max: f32,
}

#[derive(Component, Clone, Copy, Debug, Default)]
struct Tag;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Bootstrap: register each component kind once.
    let position = Descriptor::with_default::<Position>(Box::new(Position { x: 0.0, y: 0.0 }))?;
    let mut health = Descriptor::with_default::<Health>(Box::new(Health {
        current: 100.0,
        max: 100.0,
    }))?;
    health.set_name("Hitpoints");
    let tag = Descriptor::new::<Tag>();

    for descriptor in [&position, &health, &tag] {
        println!(
            "registered '{}' (id {:?}, {} bytes)",
            descriptor,
            descriptor.id(),
            descriptor.shape().size()
        );
    }

    // Per-entity path: allocate instances and hand them to storage.
    let mut first = position.allocate();
    *first.downcast_mut::<Position>().unwrap() = Position { x: 5.0, y: 5.0 };

    let second = position.allocate();
    println!(
        "first = {:?}, second = {:?}",
        first.downcast_ref::<Position>().unwrap(),
        second.downcast_ref::<Position>().unwrap()
    );

    let hp = health.allocate();
    println!(
        "{} starts at {:?}",
        health,
        hp.downcast_ref::<Health>().unwrap()
    );

    Ok(())
}
