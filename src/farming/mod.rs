//! Farming domain — soil tilling, watering, planting, crop growth, harvest.
//!
//! Communicates with other domains exclusively through crate::shared
//! events/resources. The grid-mutating logic lives in free functions so the
//! headless tests can drive it without an `App`; the systems here and in the
//! submodules are thin wrappers that read events and spawn/despawn sprites.

use bevy::prelude::*;

use crate::shared::*;

pub mod autotile;
pub mod crops;
pub mod events_handler;
pub mod harvest;
pub mod render;
pub mod soil;

use autotile::SoilShape;

/// Marker component for tilled-soil sprite entities.
#[derive(Component, Debug, Clone)]
pub struct SoilSprite {
    pub x: i32,
    pub y: i32,
    pub shape: SoilShape,
}

/// Marker component for water-overlay sprite entities.
#[derive(Component, Debug, Clone)]
pub struct WaterSprite {
    pub x: i32,
    pub y: i32,
    /// Which of the water-surface variants this cell shows.
    pub variant: u32,
}

/// Grid cell a plant entity is anchored to.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlantTile {
    pub x: i32,
    pub y: i32,
}

/// Short-lived flash spawned where a crop was picked.
#[derive(Component, Debug)]
pub struct HarvestParticle {
    pub timer: Timer,
}

/// Tracks which soil/water/plant entities exist keyed by grid position.
/// This lets systems find ECS entities for a given cell quickly and is the
/// dedupe guard that keeps watering from stacking overlay sprites.
#[derive(Resource, Default, Debug)]
pub struct FarmEntities {
    pub soil: std::collections::HashMap<(i32, i32), Entity>,
    pub water: std::collections::HashMap<(i32, i32), Entity>,
    pub plants: std::collections::HashMap<(i32, i32), Entity>,
}

/// Collision box for a sprouted plant, trimmed well inside the tile so the
/// player can walk between rows.
pub const PLANT_HITBOX: Vec2 = Vec2::new(6.0, 10.0);

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmEntities>()
            // ------------------------------------------------------------------
            // Player-action responses
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (
                    soil::handle_hoe_tool_use,
                    soil::handle_watering_can_tool_use,
                    crops::handle_plant_seed,
                    harvest::plant_collision,
                )
                    .run_if(in_state(GameState::Playing)),
            )
            // ------------------------------------------------------------------
            // Overnight processing
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                events_handler::on_day_end.run_if(in_state(GameState::Playing)),
            )
            // ------------------------------------------------------------------
            // Visual sync — runs after all state mutations
            // ------------------------------------------------------------------
            .add_systems(
                PostUpdate,
                (
                    render::sync_soil_sprites,
                    render::sync_crop_sprites,
                    render::update_particles,
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared helpers used across submodules
// ─────────────────────────────────────────────────────────────────────────────

/// World-space translation of a grid cell's centre, at layer `z`.
pub fn grid_to_world(x: i32, y: i32, z: f32) -> Vec3 {
    Vec3::new(
        (x as f32 + 0.5) * TILE_SIZE,
        (y as f32 + 0.5) * TILE_SIZE,
        z,
    )
}

/// Placeholder colour for a crop at the given age, until the plants atlas is
/// wired up: pale seedling green ripening toward orange, dried-out brown when
/// dead.
pub fn crop_stage_color(age: f32, max_age: f32, dead: bool) -> Color {
    if dead {
        return Color::srgb(0.35, 0.28, 0.20);
    }
    let progress = if max_age > 0.0 {
        (age / max_age).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let r = 0.5 * (1.0 - progress) + 0.2 * progress;
    let g = 0.65 + 0.15 * progress;
    let b = 0.2 * (1.0 - progress);
    Color::srgb(r, g, b)
}
