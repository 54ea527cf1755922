//! Core scene types shared by the occlusion systems

pub mod bounds;
pub mod entity;

pub use bounds::AABB;
