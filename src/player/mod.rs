//! Player adapter — spawns the player, moves it, and turns keyboard input
//! into the farming events. Anything beyond that (animation, camera,
//! stamina) belongs to systems outside this slice.

use bevy::prelude::*;

use crate::shared::*;

const PLAYER_SPEED: f32 = 80.0;
/// Grid cell the player wakes up on (just south of the field).
const PLAYER_START: (i32, i32) = (16, 17);

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), spawn_player)
            .add_systems(
                Update,
                (move_player, use_tool, apply_item_pickups)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn spawn_player(mut commands: Commands) {
    let translation = Vec3::new(
        (PLAYER_START.0 as f32 + 0.5) * TILE_SIZE,
        (PLAYER_START.1 as f32 + 0.5) * TILE_SIZE,
        Z_MAIN,
    );
    commands.spawn((
        Sprite {
            color: Color::srgb(0.90, 0.80, 0.55),
            custom_size: Some(Vec2::new(10.0, 14.0)),
            ..default()
        },
        Transform::from_translation(translation),
        Player,
        Hitbox::new(Vec2::new(8.0, 8.0)),
    ));
}

fn move_player(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut player_query: Query<&mut Transform, With<Player>>,
) {
    let Ok(mut transform) = player_query.get_single_mut() else {
        return;
    };

    let mut direction = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }

    if direction != Vec2::ZERO {
        let delta = direction.normalize() * PLAYER_SPEED * time.delta_secs();
        transform.translation.x += delta.x;
        transform.translation.y += delta.y;
    }
}

/// Tool keys act on the tile under the player's feet:
/// X hoe, C watering can, V corn seed, N tomato seed.
fn use_tool(
    keys: Res<ButtonInput<KeyCode>>,
    player_query: Query<&Transform, With<Player>>,
    mut tool_events: EventWriter<ToolUseEvent>,
    mut plant_events: EventWriter<PlantSeedEvent>,
) {
    let Ok(transform) = player_query.get_single() else {
        return;
    };
    let target = transform.translation.truncate();

    if keys.just_pressed(KeyCode::KeyX) {
        tool_events.send(ToolUseEvent {
            tool: ToolKind::Hoe,
            target,
        });
    }
    if keys.just_pressed(KeyCode::KeyC) {
        tool_events.send(ToolUseEvent {
            tool: ToolKind::WateringCan,
            target,
        });
    }
    if keys.just_pressed(KeyCode::KeyV) {
        plant_events.send(PlantSeedEvent {
            target,
            kind: PlantKind::Corn,
        });
    }
    if keys.just_pressed(KeyCode::KeyN) {
        plant_events.send(PlantSeedEvent {
            target,
            kind: PlantKind::Tomato,
        });
    }
}

/// Bank picked-up items into the inventory.
pub fn apply_item_pickups(
    mut pickup_events: EventReader<ItemPickupEvent>,
    mut inventory: ResMut<Inventory>,
    mut sfx_events: EventWriter<PlaySfxEvent>,
) {
    for event in pickup_events.read() {
        inventory.add(&event.item_id, event.quantity);
        sfx_events.send(PlaySfxEvent {
            sfx_id: "success".to_string(),
        });
        info!(
            "[Player] +{} {} (now {})",
            event.quantity,
            event.item_id,
            inventory.count(&event.item_id)
        );
    }
}
