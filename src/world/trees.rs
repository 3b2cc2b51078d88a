//! Fruit trees — overnight, every tree drops its old fruit and may set new.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

/// Chance per spot that a tree sets fruit there overnight.
const FRUIT_CHANCE: f64 = 0.2;

/// A fruit-bearing tree. `fruit_spots` are offsets from the trunk where
/// fruit can appear.
#[derive(Component, Debug, Clone)]
pub struct Tree {
    pub fruit_spots: Vec<Vec2>,
}

/// One piece of fruit hanging on a tree.
#[derive(Component, Debug, Clone, Default)]
pub struct TreeFruit;

pub fn spawn_tree(commands: &mut Commands, translation: Vec3) {
    commands.spawn((
        Sprite {
            color: Color::srgb(0.18, 0.42, 0.16),
            custom_size: Some(Vec2::new(TILE_SIZE * 2.0, TILE_SIZE * 3.0)),
            ..default()
        },
        Transform::from_translation(translation),
        Tree {
            fruit_spots: vec![
                Vec2::new(-8.0, 12.0),
                Vec2::new(6.0, 18.0),
                Vec2::new(12.0, 8.0),
                Vec2::new(-4.0, 22.0),
            ],
        },
        Hitbox::new(Vec2::new(10.0, 8.0)),
    ));
}

/// Day-end pass: clear all hanging fruit, then let every tree re-set fruit
/// at random spots.
pub fn regrow_fruit_on_day_end(
    mut day_end_events: EventReader<DayEndEvent>,
    mut commands: Commands,
    fruit: Query<Entity, With<TreeFruit>>,
    trees: Query<(&Tree, &Transform)>,
) {
    for _ in day_end_events.read() {
        for entity in &fruit {
            commands.entity(entity).despawn();
        }

        for (tree, transform) in &trees {
            create_fruit(&mut commands, tree, transform.translation);
        }
    }
}

pub fn create_fruit(commands: &mut Commands, tree: &Tree, trunk: Vec3) {
    let mut rng = rand::thread_rng();
    for &spot in &tree.fruit_spots {
        if !rng.gen_bool(FRUIT_CHANCE) {
            continue;
        }
        commands.spawn((
            Sprite {
                color: Color::srgb(0.85, 0.20, 0.18),
                custom_size: Some(Vec2::splat(4.0)),
                ..default()
            },
            Transform::from_translation((trunk.truncate() + spot).extend(Z_MAIN + 0.5)),
            TreeFruit,
        ));
    }
}
