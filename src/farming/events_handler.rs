//! Day-end processing — the overnight batch.
//!
//! Runs as a single system so nothing can interleave with it: plants grow
//! against the ended day's watered state, then the watering dries out, then
//! a rainy morning re-soaks the field.

use bevy::prelude::*;

use super::{crops, soil, FarmEntities, PLANT_HITBOX};
use crate::shared::*;

pub fn on_day_end(
    mut day_end_events: EventReader<DayEndEvent>,
    mut grid: ResMut<SoilGrid>,
    mut farm_entities: ResMut<FarmEntities>,
    mut commands: Commands,
    mut plants: Query<(Entity, &mut PlantCrop, &mut Transform, Option<&Hitbox>)>,
) {
    for event in day_end_events.read() {
        // 1. Grow every plant while the ended day's watered tags are intact.
        for (entity, mut plant, mut transform, hitbox) in &mut plants {
            let sample_pos = transform.translation.truncate();
            crops::grow(&mut plant, sample_pos, &*grid);

            // Sprouted plants block movement and y-sort against the player.
            if plant.frame() > 0 && hitbox.is_none() {
                commands.entity(entity).insert(Hitbox::new(PLANT_HITBOX));
                transform.translation.z = Z_MAIN;
            }
        }

        // 2. Overnight the watering dries out.
        let cleared = soil::clear_watered(&mut grid);
        soil::despawn_water_sprites(&mut commands, &mut farm_entities);

        // 3. A rainy morning starts with every tilled cell soaked.
        if event.raining {
            for cell in soil::water_all(&mut grid) {
                soil::spawn_water_sprite(&mut commands, &mut farm_entities, cell);
            }
        }

        info!(
            "[Farming] day {} processed — {} cells dried, raining: {}",
            event.day, cleared, event.raining
        );
    }
}
