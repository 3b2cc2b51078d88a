//! Visual synchronisation — keep sprite colours in sync with game state.
//!
//! Placeholder colours stand in for the tilled-dirt and plants atlases; the
//! shape variant and frame index the atlases will need are already computed
//! on the components.

use bevy::prelude::*;

use super::{crop_stage_color, soil::soil_color, HarvestParticle, SoilSprite};
use crate::shared::*;

/// Darken soil tiles whose cell is currently watered.
pub fn sync_soil_sprites(
    grid: Res<SoilGrid>,
    mut soil_query: Query<(&SoilSprite, &mut Sprite)>,
) {
    for (tile, mut sprite) in soil_query.iter_mut() {
        let watered = grid.tags(tile.x, tile.y).has(TileTag::Watered);
        sprite.color = soil_color(watered);
    }
}

/// Recolour crops by age and slightly enlarge ripe ones so they read at a
/// glance.
pub fn sync_crop_sprites(mut crop_query: Query<(&PlantCrop, &mut Sprite)>) {
    for (plant, mut sprite) in crop_query.iter_mut() {
        sprite.color = crop_stage_color(plant.age, plant.max_age, plant.dead);
        sprite.custom_size = Some(Vec2::splat(if plant.harvestable && !plant.dead {
            TILE_SIZE * 0.95
        } else {
            TILE_SIZE * 0.8
        }));
    }
}

/// Fade and despawn harvest flashes.
pub fn update_particles(
    mut commands: Commands,
    time: Res<Time>,
    mut particles: Query<(Entity, &mut HarvestParticle, &mut Sprite)>,
) {
    for (entity, mut particle, mut sprite) in particles.iter_mut() {
        particle.timer.tick(time.delta());
        if particle.timer.finished() {
            commands.entity(entity).despawn();
        } else {
            let alpha = 0.9 * particle.timer.fraction_remaining();
            sprite.color.set_alpha(alpha);
        }
    }
}
