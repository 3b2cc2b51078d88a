//! World domain — the static farm map, ground, and fruit trees.

use bevy::prelude::*;

use crate::shared::*;

pub mod maps;
pub mod trees;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), setup_farm)
            .add_systems(
                Update,
                trees::regrow_fruit_on_day_end.run_if(in_state(GameState::Playing)),
            );
    }
}

/// Build the map, seed the soil grid from its farmable layer, and spawn the
/// ground plus the tree line.
fn setup_farm(mut commands: Commands) {
    let map = maps::generate_farm();

    commands.insert_resource(map.seed_grid());

    // Ground backdrop covering the whole map.
    let size = Vec2::new(
        map.width as f32 * TILE_SIZE,
        map.height as f32 * TILE_SIZE,
    );
    commands.spawn((
        Sprite {
            color: Color::srgb(0.35, 0.55, 0.25),
            custom_size: Some(size),
            ..default()
        },
        Transform::from_translation(Vec3::new(size.x / 2.0, size.y / 2.0, Z_GROUND)),
    ));

    for &(x, y) in &map.tree_spots {
        let trunk = Vec3::new(
            (x as f32 + 0.5) * TILE_SIZE,
            (y as f32 + 0.5) * TILE_SIZE,
            Z_MAIN,
        );
        trees::spawn_tree(&mut commands, trunk);
    }

    info!(
        "[World] farm ready: {}x{} tiles, {} trees",
        map.width,
        map.height,
        map.tree_spots.len()
    );

    commands.insert_resource(map);
}
