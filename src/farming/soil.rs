//! Soil tilling and watering.
//!
//! Tilling destroys and regenerates the whole soil-sprite set so every
//! tilled cell's shape variant reflects its current neighbors.

use bevy::prelude::*;
use rand::Rng;

use super::{autotile::classify_cell, grid_to_world, FarmEntities, SoilSprite, WaterSprite};
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Hoe — till a farmable cell
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_hoe_tool_use(
    mut tool_events: EventReader<ToolUseEvent>,
    mut grid: ResMut<SoilGrid>,
    mut farm_entities: ResMut<FarmEntities>,
    mut commands: Commands,
    mut sfx_events: EventWriter<PlaySfxEvent>,
    calendar: Res<Calendar>,
) {
    for event in tool_events.read() {
        if event.tool != ToolKind::Hoe {
            continue;
        }

        let Some((x, y)) = till_at(&mut grid, event.target) else {
            // Missed the farm entirely, or the cell is already worked.
            continue;
        };

        sfx_events.send(PlaySfxEvent {
            sfx_id: "hoe".to_string(),
        });

        rebuild_soil_sprites(&mut commands, &mut farm_entities, &grid);

        // Rain soaks fresh soil straight away.
        if calendar.raining {
            if let Some(cell) = water_cell(&mut grid, x, y) {
                spawn_water_sprite(&mut commands, &mut farm_entities, cell);
            }
        }
    }
}

/// Till the farmable cell under `pos`. Returns the cell on success; `None`
/// when the position misses the grid, the cell is not farmable, or it is
/// already tilled.
pub fn till_at(grid: &mut SoilGrid, pos: Vec2) -> Option<(i32, i32)> {
    let (x, y) = SoilGrid::world_to_tile(pos);
    let tags = grid.tags(x, y);
    if !tags.has(TileTag::Farmable) || tags.has(TileTag::Tilled) {
        return None;
    }
    grid.add_tag(x, y, TileTag::Tilled);
    Some((x, y))
}

// ─────────────────────────────────────────────────────────────────────────────
// Watering Can — water a tilled cell
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_watering_can_tool_use(
    mut tool_events: EventReader<ToolUseEvent>,
    mut grid: ResMut<SoilGrid>,
    mut farm_entities: ResMut<FarmEntities>,
    mut commands: Commands,
    mut sfx_events: EventWriter<PlaySfxEvent>,
) {
    for event in tool_events.read() {
        if event.tool != ToolKind::WateringCan {
            continue;
        }

        let Some(cell) = water_at(&mut grid, event.target) else {
            continue;
        };

        sfx_events.send(PlaySfxEvent {
            sfx_id: "water".to_string(),
        });

        spawn_water_sprite(&mut commands, &mut farm_entities, cell);
    }
}

/// Water the tilled cell under `pos`. Returns the cell whenever the position
/// hits tilled soil — re-watering an already wet cell is a grid-level no-op
/// (the tag set deduplicates), and the sprite spawn deduplicates separately.
pub fn water_at(grid: &mut SoilGrid, pos: Vec2) -> Option<(i32, i32)> {
    let (x, y) = SoilGrid::world_to_tile(pos);
    water_cell(grid, x, y)
}

pub fn water_cell(grid: &mut SoilGrid, x: i32, y: i32) -> Option<(i32, i32)> {
    if !grid.tags(x, y).has(TileTag::Tilled) {
        return None;
    }
    grid.add_tag(x, y, TileTag::Watered);
    Some((x, y))
}

/// Water every tilled cell that is still dry. Returns the newly watered
/// cells in row-major order. Used when a rainy day begins.
pub fn water_all(grid: &mut SoilGrid) -> Vec<(i32, i32)> {
    let dry: Vec<(i32, i32)> = grid
        .iter()
        .filter(|(_, tags)| tags.has(TileTag::Tilled) && !tags.has(TileTag::Watered))
        .map(|(cell, _)| cell)
        .collect();
    for &(x, y) in &dry {
        grid.add_tag(x, y, TileTag::Watered);
    }
    dry
}

/// Clear `Watered` from the whole grid. Returns how many cells were wet.
pub fn clear_watered(grid: &mut SoilGrid) -> usize {
    let wet: Vec<(i32, i32)> = grid
        .iter()
        .filter(|(_, tags)| tags.has(TileTag::Watered))
        .map(|(cell, _)| cell)
        .collect();
    for &(x, y) in &wet {
        grid.remove_tag(x, y, TileTag::Watered);
    }
    wet.len()
}

/// Despawn every water-overlay sprite.
pub fn despawn_water_sprites(commands: &mut Commands, farm_entities: &mut FarmEntities) {
    for (_, entity) in farm_entities.water.drain() {
        commands.entity(entity).despawn();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Spawn the water overlay for a cell, unless the cell already has one.
/// The surface variant is picked at random, purely cosmetic.
pub fn spawn_water_sprite(
    commands: &mut Commands,
    farm_entities: &mut FarmEntities,
    (x, y): (i32, i32),
) {
    if farm_entities.water.contains_key(&(x, y)) {
        return;
    }

    let variant = rand::thread_rng().gen_range(0..WATER_VARIANTS);
    let entity = commands
        .spawn((
            Sprite {
                color: water_color(variant),
                custom_size: Some(Vec2::splat(TILE_SIZE)),
                ..default()
            },
            Transform::from_translation(grid_to_world(x, y, Z_SOIL_WATER)),
            WaterSprite { x, y, variant },
        ))
        .id();
    farm_entities.water.insert((x, y), entity);
}

/// Destroy and regenerate the whole soil-sprite set from grid state,
/// re-deriving every tilled cell's shape variant.
pub fn rebuild_soil_sprites(
    commands: &mut Commands,
    farm_entities: &mut FarmEntities,
    grid: &SoilGrid,
) {
    for (_, entity) in farm_entities.soil.drain() {
        commands.entity(entity).despawn();
    }

    for ((x, y), tags) in grid.iter() {
        if !tags.has(TileTag::Tilled) {
            continue;
        }
        let shape = classify_cell(grid, x, y);
        let entity = commands
            .spawn((
                Sprite {
                    color: soil_color(false),
                    custom_size: Some(Vec2::splat(TILE_SIZE)),
                    ..default()
                },
                Transform::from_translation(grid_to_world(x, y, Z_SOIL)),
                SoilSprite { x, y, shape },
            ))
            .id();
        farm_entities.soil.insert((x, y), entity);
    }
}

/// Placeholder colour per water-surface variant until the soil-water frames
/// are wired up.
pub fn water_color(variant: u32) -> Color {
    let blue = 0.42 + 0.06 * variant as f32;
    Color::srgba(0.18, 0.26, blue, 0.55)
}

/// Placeholder colour until the tilled-dirt atlas is wired up: plain brown,
/// darker when the cell is wet.
pub fn soil_color(watered: bool) -> Color {
    if watered {
        Color::srgb(0.30, 0.22, 0.15)
    } else {
        Color::srgb(0.45, 0.32, 0.20)
    }
}
