//! Harvest — ripe (or rotted) crops are picked by walking into them.

use bevy::prelude::*;

use super::{FarmEntities, HarvestParticle, PlantTile};
use crate::shared::*;

/// Per-frame collision pass: any plant whose harvestable flag is set and
/// whose rect overlaps the player's hitbox gets picked. Living crops yield
/// one inventory item and a flash; rotted ones are just cleared away.
pub fn plant_collision(
    mut commands: Commands,
    mut grid: ResMut<SoilGrid>,
    mut farm_entities: ResMut<FarmEntities>,
    registry: Res<PlantRegistry>,
    player_query: Query<(&Transform, &Hitbox), With<Player>>,
    plants: Query<(Entity, &PlantCrop, &PlantTile, &Transform)>,
    mut pickup_events: EventWriter<ItemPickupEvent>,
    mut harvested_events: EventWriter<CropHarvestedEvent>,
) {
    let Ok((player_transform, player_hitbox)) = player_query.get_single() else {
        return;
    };
    let player_rect = player_hitbox.rect(player_transform.translation);

    for (entity, plant, tile, transform) in &plants {
        if !plant.harvestable {
            continue;
        }

        let plant_rect =
            Rect::from_center_size(transform.translation.truncate(), Vec2::splat(TILE_SIZE));
        if plant_rect.intersect(player_rect).is_empty() {
            continue;
        }

        grid.remove_tag(tile.x, tile.y, TileTag::Planted);
        farm_entities.plants.remove(&(tile.x, tile.y));
        commands.entity(entity).despawn();

        if plant.dead {
            // Clearing a rotted crop yields nothing.
            continue;
        }

        if let Some(def) = registry.get(plant.kind) {
            pickup_events.send(ItemPickupEvent {
                item_id: def.harvest_id.clone(),
                quantity: 1,
            });
            harvested_events.send(CropHarvestedEvent {
                kind: plant.kind,
                harvest_id: def.harvest_id.clone(),
                x: tile.x,
                y: tile.y,
            });
        }

        spawn_harvest_particle(&mut commands, transform.translation);
    }
}

/// White flash left behind for a fraction of a second where the crop stood.
pub fn spawn_harvest_particle(commands: &mut Commands, translation: Vec3) {
    commands.spawn((
        Sprite {
            color: Color::srgba(1.0, 1.0, 1.0, 0.9),
            custom_size: Some(Vec2::splat(TILE_SIZE * 0.8)),
            ..default()
        },
        Transform::from_translation(translation.with_z(Z_MAIN)),
        HarvestParticle {
            timer: Timer::from_seconds(0.2, TimerMode::Once),
        },
    ));
}
