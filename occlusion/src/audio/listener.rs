//! Audio listener management

use crate::audio::components::AudioListener;
use crate::core::entity::{Entity, Transform, World};
use glam::Vec3;

/// Source of the listener position, queried once per tick
pub trait ListenerProvider {
    /// Listener position in world space, or `None` if there is no listener
    fn listener_position(&self) -> Option<Vec3>;
}

/// A fixed listener position
impl ListenerProvider for Vec3 {
    fn listener_position(&self) -> Option<Vec3> {
        Some(*self)
    }
}

/// The first active [`AudioListener`] entity in the world
impl ListenerProvider for World {
    fn listener_position(&self) -> Option<Vec3> {
        find_active_listener(self).map(|listener| listener.position)
    }
}

/// Audio listener state
#[derive(Debug, Clone, Copy)]
pub struct ListenerState {
    /// Listener entity
    pub entity: Entity,
    /// World position (feet, before height correction)
    pub position: Vec3,
}

/// Find the active audio listener in the world
pub fn find_active_listener(world: &World) -> Option<ListenerState> {
    world
        .query::<(&AudioListener, &Transform)>()
        .iter()
        .find(|(_, (listener, _))| listener.active)
        .map(|(entity, (_, transform))| ListenerState {
            entity,
            position: transform.position,
        })
}
