//! Crop planting and daily growth.

use bevy::prelude::*;

use super::{crop_stage_color, grid_to_world, FarmEntities, PlantTile};
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Plant a seed
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_plant_seed(
    mut plant_events: EventReader<PlantSeedEvent>,
    mut grid: ResMut<SoilGrid>,
    mut farm_entities: ResMut<FarmEntities>,
    mut commands: Commands,
    mut sfx_events: EventWriter<PlaySfxEvent>,
    registry: Res<PlantRegistry>,
) {
    for event in plant_events.read() {
        let (x, y) = SoilGrid::world_to_tile(event.target);
        let tags = grid.tags(x, y);

        // Seeds need worked soil, and one crop per cell.
        if !tags.has(TileTag::Tilled) || tags.has(TileTag::Planted) {
            continue;
        }

        let Some(def) = registry.get(event.kind) else {
            // The registry is validated at startup, so this only trips on a
            // seed kind added without data.
            warn!("no plant definition for {:?}", event.kind);
            continue;
        };

        grid.add_tag(x, y, TileTag::Planted);

        sfx_events.send(PlaySfxEvent {
            sfx_id: "plant".to_string(),
        });

        spawn_plant_entity(&mut commands, &mut farm_entities, (x, y), def);
    }
}

/// Spawn the crop entity anchored to its soil cell, shifted up by the kind's
/// vertical offset so taller plants overhang the tile.
pub fn spawn_plant_entity(
    commands: &mut Commands,
    farm_entities: &mut FarmEntities,
    (x, y): (i32, i32),
    def: &PlantDef,
) {
    let plant = PlantCrop::new(def);
    let mut translation = grid_to_world(x, y, Z_GROUND_PLANT);
    translation.y += def.y_offset;

    let entity = commands
        .spawn((
            Sprite {
                color: crop_stage_color(0.0, plant.max_age, false),
                custom_size: Some(Vec2::splat(TILE_SIZE * 0.8)),
                ..default()
            },
            Transform::from_translation(translation),
            PlantTile { x, y },
            plant,
        ))
        .id();

    farm_entities.plants.insert((x, y), entity);
}

// ─────────────────────────────────────────────────────────────────────────────
// Daily growth
// ─────────────────────────────────────────────────────────────────────────────

/// Advance one plant by one day.
///
/// A watered, living plant gains `growth_rate` age, clamped at `max_age`;
/// reaching `max_age` makes it harvestable and starts counting the days it
/// stands ripe. The rot check runs regardless of watering: three consecutive
/// ripe days force the plant one frame past `max_age` and kill it. Age never
/// leaves `[0, max_age + 1]`.
///
/// `sample_pos` is the world point probed against the watered lookup — the
/// plant's anchor, which always falls inside its soil cell.
pub fn grow(plant: &mut PlantCrop, sample_pos: Vec2, water: &impl WaterLookup) {
    if water.is_watered(sample_pos) && !plant.dead {
        plant.age += plant.growth_rate;

        if plant.age >= plant.max_age {
            plant.age = plant.max_age;
            plant.harvestable = true;
            plant.days_harvestable += 1;
        }
    }

    if plant.days_harvestable == 3 {
        plant.age = plant.max_age + 1.0;
        plant.dead = true;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
