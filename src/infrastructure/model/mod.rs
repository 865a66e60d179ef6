//! Model slot implementations

mod static_slot;

pub use static_slot::StaticModelSlot;
