//! Entity-Component System (ECS) functionality
//!
//! Thin layer over `hecs` holding the transforms that emitters, listeners
//! and occluders are positioned with.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::Transform;
pub use world::World;

// Re-export hecs types that users will need
pub use hecs::Entity;
