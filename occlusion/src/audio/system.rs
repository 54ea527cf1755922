//! Occlusion update systems
//!
//! Each system call is one fixed tick for every emitter in the world. Emitter
//! state lives on the emitter component, so the parallel variant needs no
//! locking beyond what each sink does internally.

use crate::audio::{
    components::OcclusionEmitter,
    driver::TickOutcome,
    listener::ListenerProvider,
    raycast::OccluderSet,
};
use crate::core::entity::{Entity, Transform, World};
use glam::Vec3;
use rayon::prelude::*;
use tracing::{debug, trace};

/// Counts of what happened to emitters during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OcclusionStats {
    /// Emitters whose parameters were updated
    pub applied: usize,
    /// Emitters beyond their effective distance
    pub out_of_range: usize,
    /// Emitters skipped because they are faulted (including new faults)
    pub faulted: usize,
    /// Inactive emitters
    pub inactive: usize,
}

impl OcclusionStats {
    fn record(mut self, outcome: EmitterOutcome) -> Self {
        match outcome {
            EmitterOutcome::Ticked(TickOutcome::Applied(_)) => self.applied += 1,
            EmitterOutcome::Ticked(TickOutcome::OutOfRange { .. }) => self.out_of_range += 1,
            EmitterOutcome::Ticked(TickOutcome::Faulted) | EmitterOutcome::Failed => {
                self.faulted += 1
            }
            EmitterOutcome::Inactive => self.inactive += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            applied: self.applied + other.applied,
            out_of_range: self.out_of_range + other.out_of_range,
            faulted: self.faulted + other.faulted,
            inactive: self.inactive + other.inactive,
        }
    }
}

enum EmitterOutcome {
    Ticked(TickOutcome),
    Failed,
    Inactive,
}

fn tick_emitter(
    entity: Entity,
    position: Vec3,
    emitter: &mut OcclusionEmitter,
    listener_position: Vec3,
    occluders: &OccluderSet,
) -> EmitterOutcome {
    if !emitter.active {
        emitter.state.reset();
        return EmitterOutcome::Inactive;
    }

    match emitter.state.tick(
        &emitter.config,
        position,
        listener_position,
        Some(occluders),
        emitter.sink.as_deref_mut(),
    ) {
        Ok(outcome) => EmitterOutcome::Ticked(outcome),
        Err(err) => {
            debug!(?entity, error = %err, "Emitter faulted");
            EmitterOutcome::Failed
        }
    }
}

/// Run one occlusion tick for every emitter, sequentially
pub fn occlusion_update_system(world: &mut World) -> OcclusionStats {
    let Some(listener_position) = world.listener_position() else {
        trace!("No active audio listener found");
        return OcclusionStats::default();
    };
    let occluders = OccluderSet::from_world(world);

    let stats = world
        .query_mut::<(&Transform, &mut OcclusionEmitter)>()
        .into_iter()
        .map(|(entity, (transform, emitter))| {
            tick_emitter(entity, transform.position, emitter, listener_position, &occluders)
        })
        .fold(OcclusionStats::default(), OcclusionStats::record);

    trace!(?stats, "Occlusion update");
    stats
}

/// Run one occlusion tick for every emitter, spread across the rayon pool
pub fn occlusion_update_system_parallel(world: &mut World) -> OcclusionStats {
    let Some(listener_position) = world.listener_position() else {
        trace!("No active audio listener found");
        return OcclusionStats::default();
    };
    let occluders = OccluderSet::from_world(world);

    let mut emitters: Vec<_> = world
        .query_mut::<(&Transform, &mut OcclusionEmitter)>()
        .into_iter()
        .collect();

    let stats = emitters
        .par_iter_mut()
        .map(|(entity, (transform, emitter))| {
            tick_emitter(*entity, transform.position, emitter, listener_position, &occluders)
        })
        .fold(OcclusionStats::default, OcclusionStats::record)
        .reduce(OcclusionStats::default, OcclusionStats::merge);

    trace!(?stats, "Parallel occlusion update");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::components::{AudioListener, Occluder};
    use crate::audio::sink::VoiceHandle;
    use crate::config::OcclusionConfig;
    use crate::core::AABB;
    use std::sync::Arc;

    fn wall_at(world: &mut World, x: f32) {
        world.spawn((
            AABB::default(),
            Transform::from_position(Vec3::new(x, 1.0, 0.0)).with_scale(Vec3::new(0.2, 4.0, 10.0)),
            Occluder::default(),
        ));
    }

    #[test]
    fn test_no_listener_does_nothing() {
        let mut world = World::new();
        let voice = VoiceHandle::default();
        world.spawn((
            Transform::default(),
            OcclusionEmitter::new(Arc::new(OcclusionConfig::default()), voice.clone()).unwrap(),
        ));

        assert_eq!(occlusion_update_system(&mut world), OcclusionStats::default());
        assert_eq!(voice.params().gain, 1.0);
    }

    #[test]
    fn test_stats_cover_every_emitter() {
        let mut world = World::new();
        let config = Arc::new(OcclusionConfig::default());
        world.spawn((AudioListener::default(), Transform::default()));
        wall_at(&mut world, 5.0);

        world.spawn((
            Transform::from_position(Vec3::new(10.0, 1.0, 0.0)),
            OcclusionEmitter::new(config.clone(), VoiceHandle::default()).unwrap(),
        ));
        world.spawn((
            Transform::from_position(Vec3::new(500.0, 1.0, 0.0)),
            OcclusionEmitter::new(config.clone(), VoiceHandle::default()).unwrap(),
        ));
        world.spawn((
            Transform::from_position(Vec3::new(3.0, 1.0, 0.0)),
            OcclusionEmitter::without_sink(config.clone()).unwrap(),
        ));
        let mut inactive = OcclusionEmitter::new(config, VoiceHandle::default()).unwrap();
        inactive.set_active(false);
        world.spawn((Transform::default(), inactive));

        let expected = OcclusionStats {
            applied: 1,
            out_of_range: 1,
            faulted: 1,
            inactive: 1,
        };
        assert_eq!(occlusion_update_system(&mut world), expected);
        // The faulted emitter stays faulted
        assert_eq!(occlusion_update_system_parallel(&mut world), expected);
    }
}
