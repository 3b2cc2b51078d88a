mod calendar;
mod data;
mod farming;
mod player;
mod shared;
mod world;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Sproutvale".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Calendar>()
        .init_resource::<Inventory>()
        .init_resource::<PlantRegistry>()
        // Events
        .add_event::<ToolUseEvent>()
        .add_event::<PlantSeedEvent>()
        .add_event::<SleepEvent>()
        .add_event::<DayEndEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<CropHarvestedEvent>()
        .add_event::<PlaySfxEvent>()
        // Domain plugins
        .add_plugins(calendar::CalendarPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(player::PlayerPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXEL_SCALE))
            .with_translation(Vec3::new(16.0 * TILE_SIZE, 12.0 * TILE_SIZE, 0.0)),
    ));
}
