use std::{
    alloc,
    any::TypeId,
    mem::ManuallyDrop,
    ptr::{self, NonNull},
};

use crate::ecs::component::{Component, Id, Shape};

/// An owned, type-erased block of memory holding one component value.
///
/// Instances are produced by [`Descriptor::allocate`](super::Descriptor::allocate)
/// and are tagged with the originating descriptor's [`Id`], so downstream
/// storage layers can reinterpret the bytes only via the matching descriptor.
/// The caller owns the instance exclusively; dropping it runs the component's
/// drop function and releases the storage.
///
/// # Example
///
/// ```ignore
/// let instance = position.allocate();
/// assert_eq!(instance.component_type(), position.id());
/// let value: &Position = instance.downcast_ref().unwrap();
/// ```
#[derive(Debug, PartialEq)]
pub struct Instance {
    /// Pointer to the value's storage. Dangling (but aligned) for zero-sized
    /// shapes, which never touch the allocator.
    ptr: NonNull<u8>,

    /// The shape of the stored value.
    shape: Shape,

    /// The id of the component kind this instance belongs to.
    component_type: Id,
}

impl Instance {
    /// Allocate storage sized and aligned per `shape`, without initializing it.
    ///
    /// The caller must write a valid value of the shape's type into the
    /// buffer before the instance is used or dropped.
    pub(crate) fn uninit(component_type: Id, shape: Shape) -> Self {
        let ptr = if shape.is_zero_sized() {
            // SAFETY: the alignment of a layout is non-zero, so the pointer is
            // non-null, and it is aligned for the shape by construction.
            unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(shape.align())) }
        } else {
            let raw = unsafe { alloc::alloc(shape.layout()) };
            match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => alloc::handle_alloc_error(shape.layout()),
            }
        };
        Self {
            ptr,
            shape,
            component_type,
        }
    }

    /// Get the id of the component kind this instance belongs to.
    #[inline]
    pub fn component_type(&self) -> Id {
        self.component_type
    }

    /// Get the shape of the stored value.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Get the size of the stored value in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Get a pointer to the raw data.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Get a mutable pointer to the raw data.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Get the value's storage as a NonNull pointer.
    #[inline]
    pub(crate) fn as_non_null(&mut self) -> NonNull<u8> {
        self.ptr
    }

    /// Get a reference to the stored value as component type `C`.
    ///
    /// Returns `None` if `C` is not the type this instance was allocated for.
    #[inline]
    pub fn downcast_ref<C: Component>(&self) -> Option<&C> {
        if TypeId::of::<C>() != self.shape.type_id() {
            return None;
        }
        // SAFETY: the type was verified above, and the buffer holds an
        // initialized value aligned per the shape.
        Some(unsafe { self.ptr.cast::<C>().as_ref() })
    }

    /// Get a mutable reference to the stored value as component type `C`.
    ///
    /// Returns `None` if `C` is not the type this instance was allocated for.
    #[inline]
    pub fn downcast_mut<C: Component>(&mut self) -> Option<&mut C> {
        if TypeId::of::<C>() != self.shape.type_id() {
            return None;
        }
        // SAFETY: the type was verified above, the buffer holds an initialized
        // value aligned per the shape, and `&mut self` prevents aliasing.
        Some(unsafe { self.ptr.cast::<C>().as_mut() })
    }

    /// Consume the instance and move the stored value out.
    ///
    /// Returns the instance unchanged if `C` is not the type this instance
    /// was allocated for.
    pub fn into_value<C: Component>(self) -> Result<C, Self> {
        if TypeId::of::<C>() != self.shape.type_id() {
            return Err(self);
        }
        // Skip Drop: the value is moved out below and the storage is released
        // manually.
        let this = ManuallyDrop::new(self);
        // SAFETY: the type was verified above and the buffer holds an
        // initialized value.
        let value = unsafe { this.ptr.cast::<C>().read() };
        if !this.shape.is_zero_sized() {
            // SAFETY: the buffer was allocated in `uninit` with this layout.
            unsafe { alloc::dealloc(this.ptr.as_ptr(), this.shape.layout()) };
        }
        Ok(value)
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        // SAFETY: the buffer holds an initialized value of the shape's type.
        unsafe { (self.shape.drop_fn())(self.ptr) };
        if !self.shape.is_zero_sized() {
            // SAFETY: the buffer was allocated in `uninit` with this layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr(), self.shape.layout()) };
        }
    }
}

// SAFETY: the stored value's type is bound by `Component: Send + Sync` at
// registration, and the instance owns its allocation exclusively.
unsafe impl Send for Instance {}

// SAFETY: shared access only hands out `&C` where `C: Sync`.
unsafe impl Sync for Instance {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Descriptor;
    use sable_macros::Component;

    #[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Component, Clone, Debug, Default, PartialEq)]
    struct Inventory {
        items: Vec<String>,
    }

    #[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
    struct Tag;

    #[test]
    fn instance_is_tagged_with_the_descriptor_id() {
        // Given
        let position = Descriptor::new::<Position>();

        // When
        let instance = position.allocate();

        // Then
        assert_eq!(instance.component_type(), position.id());
        assert_eq!(instance.size(), std::mem::size_of::<Position>());
    }

    #[test]
    fn downcast_to_the_wrong_type_returns_none() {
        // Given
        let position = Descriptor::new::<Position>();
        let mut instance = position.allocate();

        // Then
        assert!(instance.downcast_ref::<Tag>().is_none());
        assert!(instance.downcast_mut::<Tag>().is_none());
        assert!(instance.downcast_ref::<Position>().is_some());
    }

    #[test]
    fn instances_never_alias() {
        // Given
        let position = Descriptor::with_default::<Position>(Box::new(Position {
            x: 0.0,
            y: 0.0,
        }))
        .unwrap();

        let mut first = position.allocate();
        let second = position.allocate();

        // When - mutate the first instance
        *first.downcast_mut::<Position>().unwrap() = Position { x: 5.0, y: 5.0 };

        // Then - the second instance is unaffected
        assert_eq!(
            second.downcast_ref::<Position>(),
            Some(&Position { x: 0.0, y: 0.0 })
        );
    }

    #[test]
    fn heap_owning_defaults_are_deep_copied() {
        // Given
        let inventory = Descriptor::with_default::<Inventory>(Box::new(Inventory {
            items: vec!["sword".to_string()],
        }))
        .unwrap();

        let mut first = inventory.allocate();
        let second = inventory.allocate();

        // When
        first
            .downcast_mut::<Inventory>()
            .unwrap()
            .items
            .push("shield".to_string());

        // Then
        assert_eq!(first.downcast_ref::<Inventory>().unwrap().items.len(), 2);
        assert_eq!(second.downcast_ref::<Inventory>().unwrap().items.len(), 1);
    }

    #[test]
    fn into_value_moves_the_value_out() {
        // Given
        let position = Descriptor::with_default::<Position>(Box::new(Position {
            x: 1.0,
            y: 2.0,
        }))
        .unwrap();
        let instance = position.allocate();

        // When
        let value = instance.into_value::<Position>();

        // Then
        assert_eq!(value, Ok(Position { x: 1.0, y: 2.0 }));
    }

    #[test]
    fn into_value_with_the_wrong_type_returns_the_instance() {
        // Given
        let position = Descriptor::new::<Position>();
        let instance = position.allocate();

        // When
        let instance = instance.into_value::<Tag>().unwrap_err();

        // Then - the instance is still usable
        assert!(instance.downcast_ref::<Position>().is_some());
    }

    #[test]
    fn zero_sized_instance_is_valid() {
        // Given
        let tag = Descriptor::new::<Tag>();

        // When
        let instance = tag.allocate();

        // Then
        assert_eq!(instance.size(), 0);
        assert_eq!(instance.downcast_ref::<Tag>(), Some(&Tag));
        assert_eq!(instance.into_value::<Tag>(), Ok(Tag));
    }

    #[test]
    fn dropping_an_instance_runs_the_component_drop() {
        // Given
        use std::sync::atomic::{AtomicUsize, Ordering};

        static DROPPED: AtomicUsize = AtomicUsize::new(0);

        struct Probe;
        impl crate::ecs::Component for Probe {}
        impl Clone for Probe {
            fn clone(&self) -> Self {
                Probe
            }
        }
        impl Drop for Probe {
            fn drop(&mut self) {
                DROPPED.fetch_add(1, Ordering::Relaxed);
            }
        }

        let probe = Descriptor::with_default::<Probe>(Box::new(Probe)).unwrap();
        let before = DROPPED.load(Ordering::Relaxed);

        // When
        let instance = probe.allocate();
        drop(instance);

        // Then - the stored value was dropped exactly once
        assert_eq!(DROPPED.load(Ordering::Relaxed), before + 1);
    }

    #[test]
    fn instances_can_move_across_threads() {
        // Given
        let position = Descriptor::with_default::<Position>(Box::new(Position {
            x: 3.0,
            y: 4.0,
        }))
        .unwrap();
        let instance = position.allocate();

        // When
        let value = std::thread::spawn(move || *instance.downcast_ref::<Position>().unwrap())
            .join()
            .unwrap();

        // Then
        assert_eq!(value, Position { x: 3.0, y: 4.0 });
    }
}
