//! World wrapper providing helper methods for entity management

use hecs::Entity;

/// Wrapper around hecs::World providing additional helper methods
pub struct World {
    inner: hecs::World,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a new entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Get a reference to a component on an entity
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Get a mutable reference to a component on an entity
    pub fn get_mut<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut T, hecs::QueryOneError> {
        self.inner.query_one_mut::<&mut T>(entity)
    }

    /// Query entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query()
    }

    /// Query entities with specific components (mutable)
    pub fn query_mut<Q: hecs::Query>(&mut self) -> hecs::QueryMut<'_, Q> {
        self.inner.query_mut()
    }

    /// Despawn an entity and all its components
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Transform;
    use glam::Vec3;

    #[test]
    fn test_world_spawn() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));
        assert!(world.contains(entity));

        world.despawn(entity).unwrap();
        assert!(!world.contains(entity));
    }

    #[test]
    fn test_get_mut_updates_component() {
        let mut world = World::new();
        let entity = world.spawn((Transform::default(),));

        world.get_mut::<Transform>(entity).unwrap().position = Vec3::X;
        assert_eq!(world.get::<Transform>(entity).unwrap().position, Vec3::X);
    }

    #[test]
    fn test_get_mut_missing_component() {
        let mut world = World::new();
        let entity = world.spawn((5_u32,));

        assert!(matches!(
            world.get_mut::<Transform>(entity),
            Err(hecs::QueryOneError::Unsatisfied)
        ));
    }
}
