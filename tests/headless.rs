//! Headless integration tests for Sproutvale.
//!
//! These tests exercise the farming logic without a window or GPU.
//! They use Bevy's `MinimalPlugins` to tick the app, register only the
//! pure-logic systems (skipping all rendering/UI), and verify that the
//! soil/crop loops work correctly.
//!
//! Run with: `cargo test --test headless`

use std::collections::HashSet;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use sproutvale::calendar::{process_day_end, WeatherPolicy};
use sproutvale::data::plants::populate_plants;
use sproutvale::data::DataPlugin;
use sproutvale::farming::autotile::SoilShape;
use sproutvale::farming::{
    crops, events_handler, harvest, soil, FarmEntities, HarvestParticle, PlantTile, SoilSprite,
    WaterSprite,
};
use sproutvale::player::apply_item_pickups;
use sproutvale::shared::*;
use sproutvale::world::trees::{regrow_fruit_on_day_end, Tree, TreeFruit};

// ─────────────────────────────────────────────────────────────────────────────
// Test App Builder
// ─────────────────────────────────────────────────────────────────────────────

/// Builds a minimal Bevy app with all shared resources and events registered
/// but NO rendering, windowing, or asset loading. Systems must be added
/// per-test depending on what's being exercised.
fn build_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(StatesPlugin);

    // ── Game State ───────────────────────────────────────────────────────
    app.init_state::<GameState>();

    // ── Shared Resources (mirrors main.rs) ───────────────────────────────
    app.init_resource::<Calendar>()
        .init_resource::<Inventory>()
        .init_resource::<FarmEntities>();

    let mut registry = PlantRegistry::default();
    populate_plants(&mut registry);
    app.insert_resource(registry);

    app.insert_resource(WeatherPolicy::seeded(0.4, 7));
    app.insert_resource(test_grid());

    // ── Shared Events (mirrors main.rs) ──────────────────────────────────
    app.add_event::<ToolUseEvent>()
        .add_event::<PlantSeedEvent>()
        .add_event::<SleepEvent>()
        .add_event::<DayEndEvent>()
        .add_event::<ItemPickupEvent>()
        .add_event::<CropHarvestedEvent>()
        .add_event::<PlaySfxEvent>();

    app
}

/// 8×8 grid, farmable everywhere except a one-cell border.
fn test_grid() -> SoilGrid {
    let mut grid = SoilGrid::new(8, 8);
    for y in 1..7 {
        for x in 1..7 {
            grid.add_tag(x, y, TileTag::Farmable);
        }
    }
    grid
}

fn tile_center(x: i32, y: i32) -> Vec2 {
    Vec2::new((x as f32 + 0.5) * TILE_SIZE, (y as f32 + 0.5) * TILE_SIZE)
}

fn send_tool(app: &mut App, tool: ToolKind, target: Vec2) {
    app.world_mut().send_event(ToolUseEvent { tool, target });
}

fn send_day_end(app: &mut App, day: u32, raining: bool) {
    app.world_mut().send_event(DayEndEvent { day, raining });
}

fn grid_tags(app: &mut App, x: i32, y: i32) -> TileTags {
    app.world().resource::<SoilGrid>().tags(x, y)
}

// ─────────────────────────────────────────────────────────────────────────────
// Soil grid basics (no app needed)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_out_of_range_access_is_safe() {
    let mut grid = SoilGrid::new(4, 4);
    // Reads outside the grid report the empty tag set.
    assert_eq!(grid.tags(-1, 0), TileTags::default());
    assert_eq!(grid.tags(0, 4), TileTags::default());
    assert_eq!(grid.tags(100, 100), TileTags::default());
    // Writes outside the grid are silent no-ops.
    grid.add_tag(-1, -1, TileTag::Tilled);
    grid.remove_tag(7, 7, TileTag::Tilled);
    assert!(grid.iter().all(|(_, tags)| tags == TileTags::default()));
}

#[test]
fn grid_iteration_is_row_major() {
    let grid = SoilGrid::new(3, 2);
    let cells: Vec<(i32, i32)> = grid.iter().map(|(cell, _)| cell).collect();
    assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
}

#[test]
fn world_to_tile_floors_toward_negative_infinity() {
    assert_eq!(SoilGrid::world_to_tile(Vec2::new(0.0, 0.0)), (0, 0));
    assert_eq!(SoilGrid::world_to_tile(Vec2::new(15.9, 15.9)), (0, 0));
    assert_eq!(SoilGrid::world_to_tile(Vec2::new(16.0, 31.9)), (1, 1));
    assert_eq!(SoilGrid::world_to_tile(Vec2::new(-0.1, -16.1)), (-1, -2));
}

#[test]
fn is_watered_tolerates_positions_off_the_farm() {
    let mut grid = SoilGrid::new(4, 4);
    grid.add_tag(1, 1, TileTag::Farmable);
    grid.add_tag(1, 1, TileTag::Tilled);
    grid.add_tag(1, 1, TileTag::Watered);

    assert!(grid.is_watered(tile_center(1, 1)));
    assert!(!grid.is_watered(tile_center(2, 2)));
    assert!(!grid.is_watered(Vec2::new(-500.0, 40.0)));
    assert!(!grid.is_watered(Vec2::new(1e6, 1e6)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tilling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tilling_a_farmable_cell_spawns_isolated_soil() {
    let mut app = build_test_app();
    app.add_systems(Update, soil::handle_hoe_tool_use);

    send_tool(&mut app, ToolKind::Hoe, tile_center(3, 3));
    app.update();

    assert!(grid_tags(&mut app, 3, 3).has(TileTag::Tilled));
    assert_eq!(app.world().resource::<FarmEntities>().soil.len(), 1);

    let mut query = app.world_mut().query::<&SoilSprite>();
    let sprites: Vec<&SoilSprite> = query.iter(app.world()).collect();
    assert_eq!(sprites.len(), 1);
    assert_eq!((sprites[0].x, sprites[0].y), (3, 3));
    assert_eq!(
        sprites[0].shape,
        SoilShape::Isolated,
        "a lone tilled cell has no tilled neighbors"
    );
}

#[test]
fn tilling_a_non_farmable_cell_is_a_noop() {
    let mut app = build_test_app();
    app.add_systems(Update, soil::handle_hoe_tool_use);

    // (0, 0) is the non-farmable border; (-3, -3) misses the grid entirely.
    send_tool(&mut app, ToolKind::Hoe, tile_center(0, 0));
    send_tool(&mut app, ToolKind::Hoe, tile_center(-3, -3));
    app.update();

    assert!(!grid_tags(&mut app, 0, 0).has(TileTag::Tilled));
    assert!(app.world().resource::<FarmEntities>().soil.is_empty());

    let mut query = app.world_mut().query::<&SoilSprite>();
    assert_eq!(query.iter(app.world()).count(), 0);
}

#[test]
fn tilling_reclassifies_the_neighborhood() {
    let mut app = build_test_app();
    app.add_systems(Update, soil::handle_hoe_tool_use);

    send_tool(&mut app, ToolKind::Hoe, tile_center(3, 3));
    app.update();
    send_tool(&mut app, ToolKind::Hoe, tile_center(4, 3));
    app.update();

    let mut query = app.world_mut().query::<&SoilSprite>();
    let shapes: Vec<((i32, i32), SoilShape)> = query
        .iter(app.world())
        .map(|s| ((s.x, s.y), s.shape))
        .collect();
    assert_eq!(shapes.len(), 2);
    assert!(shapes.contains(&((3, 3), SoilShape::RightOnly)));
    assert!(shapes.contains(&((4, 3), SoilShape::LeftOnly)));
}

#[test]
fn tilling_during_rain_waters_the_fresh_soil() {
    let mut app = build_test_app();
    app.add_systems(Update, soil::handle_hoe_tool_use);
    app.world_mut().resource_mut::<Calendar>().raining = true;

    send_tool(&mut app, ToolKind::Hoe, tile_center(2, 2));
    app.update();

    let tags = grid_tags(&mut app, 2, 2);
    assert!(tags.has(TileTag::Tilled));
    assert!(tags.has(TileTag::Watered));
    assert_eq!(app.world().resource::<FarmEntities>().water.len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Watering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn watering_untilled_ground_is_a_noop() {
    let mut app = build_test_app();
    app.add_systems(Update, soil::handle_watering_can_tool_use);

    send_tool(&mut app, ToolKind::WateringCan, tile_center(3, 3));
    app.update();

    assert!(!grid_tags(&mut app, 3, 3).has(TileTag::Watered));
    assert!(app.world().resource::<FarmEntities>().water.is_empty());

    let mut query = app.world_mut().query::<&WaterSprite>();
    assert_eq!(query.iter(app.world()).count(), 0);
}

#[test]
fn repeated_watering_keeps_a_single_water_sprite() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        (soil::handle_hoe_tool_use, soil::handle_watering_can_tool_use),
    );

    send_tool(&mut app, ToolKind::Hoe, tile_center(3, 3));
    app.update();

    for _ in 0..3 {
        send_tool(&mut app, ToolKind::WateringCan, tile_center(3, 3));
        app.update();
    }

    assert!(grid_tags(&mut app, 3, 3).has(TileTag::Watered));
    assert_eq!(app.world().resource::<FarmEntities>().water.len(), 1);

    let mut query = app.world_mut().query::<&WaterSprite>();
    assert_eq!(
        query.iter(app.world()).count(),
        1,
        "re-watering must not stack overlay sprites"
    );
}

#[test]
fn water_all_soaks_only_dry_tilled_cells() {
    let mut grid = test_grid();
    soil::till_at(&mut grid, tile_center(1, 1));
    soil::till_at(&mut grid, tile_center(2, 1));
    soil::till_at(&mut grid, tile_center(3, 1));
    soil::water_cell(&mut grid, 2, 1);

    let newly = soil::water_all(&mut grid);
    assert_eq!(newly, vec![(1, 1), (3, 1)], "row-major, already-wet skipped");
    for x in 1..=3 {
        assert!(grid.tags(x, 1).has(TileTag::Watered));
    }

    assert!(soil::water_all(&mut grid).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Planting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn planting_twice_creates_exactly_one_plant() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        (soil::handle_hoe_tool_use, crops::handle_plant_seed),
    );

    send_tool(&mut app, ToolKind::Hoe, tile_center(4, 4));
    app.update();

    for _ in 0..2 {
        app.world_mut().send_event(PlantSeedEvent {
            target: tile_center(4, 4),
            kind: PlantKind::Corn,
        });
        app.update();
    }

    assert!(grid_tags(&mut app, 4, 4).has(TileTag::Planted));
    assert_eq!(app.world().resource::<FarmEntities>().plants.len(), 1);

    let mut query = app.world_mut().query::<&PlantCrop>();
    let plants: Vec<&PlantCrop> = query.iter(app.world()).collect();
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0].kind, PlantKind::Corn);
    assert_eq!(plants[0].age, 0.0);
}

#[test]
fn planting_on_untilled_ground_is_a_noop() {
    let mut app = build_test_app();
    app.add_systems(Update, crops::handle_plant_seed);

    app.world_mut().send_event(PlantSeedEvent {
        target: tile_center(4, 4),
        kind: PlantKind::Tomato,
    });
    app.update();

    assert!(!grid_tags(&mut app, 4, 4).has(TileTag::Planted));
    assert!(app.world().resource::<FarmEntities>().plants.is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Day cycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn dry_day_end_is_idempotent_on_watered_state() {
    let mut app = build_test_app();
    app.add_systems(Update, events_handler::on_day_end);

    {
        let mut grid = app.world_mut().resource_mut::<SoilGrid>();
        soil::till_at(&mut grid, tile_center(2, 2));
        soil::till_at(&mut grid, tile_center(3, 2));
        soil::water_cell(&mut grid, 2, 2);
    }

    for day in 2..=3 {
        send_day_end(&mut app, day, false);
        app.update();

        let grid = app.world().resource::<SoilGrid>();
        assert!(
            grid.iter().all(|(_, tags)| !tags.has(TileTag::Watered)),
            "no watered cells after a dry day end"
        );
        assert!(app.world().resource::<FarmEntities>().water.is_empty());
    }
}

#[test]
fn rainy_day_end_is_idempotent_on_watered_state() {
    let mut app = build_test_app();
    app.add_systems(Update, events_handler::on_day_end);

    {
        let mut grid = app.world_mut().resource_mut::<SoilGrid>();
        soil::till_at(&mut grid, tile_center(2, 2));
        soil::till_at(&mut grid, tile_center(3, 2));
        soil::till_at(&mut grid, tile_center(4, 2));
    }

    for day in 2..=3 {
        send_day_end(&mut app, day, true);
        app.update();

        let grid = app.world().resource::<SoilGrid>();
        let tilled: Vec<TileTags> = grid
            .iter()
            .filter(|(_, tags)| tags.has(TileTag::Tilled))
            .map(|(_, tags)| tags)
            .collect();
        assert_eq!(tilled.len(), 3);
        assert!(
            tilled.iter().all(|tags| tags.has(TileTag::Watered)),
            "every tilled cell is watered after a rainy day end"
        );
        assert_eq!(app.world().resource::<FarmEntities>().water.len(), 3);
    }
}

#[test]
fn sleeping_advances_the_calendar_and_reaches_the_field() {
    let mut app = build_test_app();
    app.insert_resource(WeatherPolicy::seeded(1.0, 1)); // force rain
    app.add_systems(
        Update,
        (process_day_end, events_handler::on_day_end).chain(),
    );

    {
        let mut grid = app.world_mut().resource_mut::<SoilGrid>();
        soil::till_at(&mut grid, tile_center(5, 5));
    }

    app.world_mut().send_event(SleepEvent);
    app.update();
    app.update();

    let calendar = app.world().resource::<Calendar>();
    assert_eq!(calendar.day, 2);
    assert!(calendar.raining);
    assert!(
        grid_tags(&mut app, 5, 5).has(TileTag::Watered),
        "the rainy morning soaked the tilled cell"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Full crop lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn corn_lifecycle_grows_ripens_and_rots() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        (
            soil::handle_hoe_tool_use,
            soil::handle_watering_can_tool_use,
            crops::handle_plant_seed,
            events_handler::on_day_end,
        ),
    );

    let target = tile_center(2, 3);
    send_tool(&mut app, ToolKind::Hoe, target);
    app.update();
    app.world_mut().send_event(PlantSeedEvent {
        target,
        kind: PlantKind::Corn,
    });
    app.update();

    // Corn: growth rate 1.0, 6 frames → ripe at age 4.
    for day in 1..=4u32 {
        send_tool(&mut app, ToolKind::WateringCan, target);
        app.update();
        send_day_end(&mut app, day + 1, false);
        app.update();

        let mut query = app.world_mut().query::<&PlantCrop>();
        let plant = query.single(app.world());
        assert!((plant.age - day as f32).abs() < f32::EPSILON);
        assert_eq!(plant.harvestable, day >= 4);
        assert!(plant.age <= plant.max_age + 1.0);
    }

    // Two more watered-but-unharvested days: the ripe counter hits 3.
    for day in 5..=6u32 {
        send_tool(&mut app, ToolKind::WateringCan, target);
        app.update();
        send_day_end(&mut app, day + 1, false);
        app.update();
    }

    let mut query = app.world_mut().query::<&PlantCrop>();
    let plant = query.single(app.world());
    assert!(plant.dead, "3 ripe days without harvest rot the crop");
    assert_eq!(plant.age, plant.max_age + 1.0);
    assert_eq!(plant.days_harvestable, 3);
}

#[test]
fn sprouted_plant_gains_a_hitbox_and_moves_to_the_main_layer() {
    let mut app = build_test_app();
    app.add_systems(
        Update,
        (
            soil::handle_hoe_tool_use,
            soil::handle_watering_can_tool_use,
            crops::handle_plant_seed,
            events_handler::on_day_end,
        ),
    );

    let target = tile_center(5, 5);
    send_tool(&mut app, ToolKind::Hoe, target);
    app.update();
    app.world_mut().send_event(PlantSeedEvent {
        target,
        kind: PlantKind::Corn,
    });
    app.update();

    {
        let mut query = app
            .world_mut()
            .query_filtered::<(&Transform, Option<&Hitbox>), With<PlantCrop>>();
        let (transform, hitbox) = query.single(app.world());
        assert_eq!(transform.translation.z, Z_GROUND_PLANT);
        assert!(hitbox.is_none(), "seedlings don't block movement");
    }

    send_tool(&mut app, ToolKind::WateringCan, target);
    app.update();
    send_day_end(&mut app, 2, false);
    app.update();

    let mut query = app
        .world_mut()
        .query_filtered::<(&Transform, Option<&Hitbox>), With<PlantCrop>>();
    let (transform, hitbox) = query.single(app.world());
    assert_eq!(transform.translation.z, Z_MAIN);
    assert!(hitbox.is_some(), "sprouted plants are collidable");
}

// ─────────────────────────────────────────────────────────────────────────────
// Harvest
// ─────────────────────────────────────────────────────────────────────────────

/// Spawn a plant entity directly in the given state, bypassing the growth
/// loop, and register it like the planting system would.
fn spawn_test_plant(app: &mut App, x: i32, y: i32, ripe: bool, dead: bool) -> Entity {
    let def = app
        .world()
        .resource::<PlantRegistry>()
        .get(PlantKind::Corn)
        .unwrap()
        .clone();

    {
        let mut grid = app.world_mut().resource_mut::<SoilGrid>();
        grid.add_tag(x, y, TileTag::Tilled);
        grid.add_tag(x, y, TileTag::Planted);
    }

    let mut plant = PlantCrop::new(&def);
    if ripe {
        plant.age = plant.max_age;
        plant.harvestable = true;
    }
    if dead {
        plant.age = plant.max_age + 1.0;
        plant.harvestable = true;
        plant.dead = true;
    }

    let entity = app
        .world_mut()
        .spawn((
            plant,
            PlantTile { x, y },
            Transform::from_translation(tile_center(x, y).extend(Z_MAIN)),
        ))
        .id();
    app.world_mut()
        .resource_mut::<FarmEntities>()
        .plants
        .insert((x, y), entity);
    entity
}

fn spawn_test_player(app: &mut App, at: Vec2) {
    app.world_mut().spawn((
        Player,
        Hitbox::new(Vec2::new(8.0, 8.0)),
        Transform::from_translation(at.extend(Z_MAIN)),
    ));
}

#[test]
fn harvesting_a_ripe_plant_grants_one_item() {
    let mut app = build_test_app();
    app.add_systems(Update, (harvest::plant_collision, apply_item_pickups));

    spawn_test_plant(&mut app, 2, 2, true, false);
    spawn_test_player(&mut app, tile_center(2, 2));
    app.update();

    assert!(!grid_tags(&mut app, 2, 2).has(TileTag::Planted));
    assert!(app.world().resource::<FarmEntities>().plants.is_empty());
    assert_eq!(app.world().resource::<Inventory>().count("corn"), 1);

    let mut plants = app.world_mut().query::<&PlantCrop>();
    assert_eq!(plants.iter(app.world()).count(), 0);

    let mut particles = app.world_mut().query::<&HarvestParticle>();
    assert_eq!(particles.iter(app.world()).count(), 1);
}

#[test]
fn harvesting_a_dead_plant_yields_nothing() {
    let mut app = build_test_app();
    app.add_systems(Update, (harvest::plant_collision, apply_item_pickups));

    spawn_test_plant(&mut app, 2, 2, false, true);
    spawn_test_player(&mut app, tile_center(2, 2));
    app.update();

    assert!(!grid_tags(&mut app, 2, 2).has(TileTag::Planted));
    assert_eq!(app.world().resource::<Inventory>().count("corn"), 0);

    let mut plants = app.world_mut().query::<&PlantCrop>();
    assert_eq!(plants.iter(app.world()).count(), 0, "rot is cleared away");

    let mut particles = app.world_mut().query::<&HarvestParticle>();
    assert_eq!(particles.iter(app.world()).count(), 0);
}

#[test]
fn unripe_plants_are_left_standing() {
    let mut app = build_test_app();
    app.add_systems(Update, (harvest::plant_collision, apply_item_pickups));

    spawn_test_plant(&mut app, 2, 2, false, false);
    spawn_test_player(&mut app, tile_center(2, 2));
    app.update();

    assert!(grid_tags(&mut app, 2, 2).has(TileTag::Planted));
    assert_eq!(app.world().resource::<Inventory>().count("corn"), 0);

    let mut plants = app.world_mut().query::<&PlantCrop>();
    assert_eq!(plants.iter(app.world()).count(), 1);
}

#[test]
fn out_of_reach_plants_are_not_harvested() {
    let mut app = build_test_app();
    app.add_systems(Update, (harvest::plant_collision, apply_item_pickups));

    spawn_test_plant(&mut app, 2, 2, true, false);
    spawn_test_player(&mut app, tile_center(6, 6));
    app.update();

    assert!(grid_tags(&mut app, 2, 2).has(TileTag::Planted));
    assert_eq!(app.world().resource::<Inventory>().count("corn"), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Trees
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn day_end_clears_hanging_fruit_before_regrowing() {
    let mut app = build_test_app();
    app.add_systems(Update, regrow_fruit_on_day_end);

    app.world_mut().spawn((
        Tree {
            fruit_spots: vec![Vec2::new(-8.0, 12.0), Vec2::new(6.0, 18.0)],
        },
        Transform::from_translation(tile_center(4, 6).extend(Z_MAIN)),
    ));

    let stale: Vec<Entity> = (0..3)
        .map(|_| {
            app.world_mut()
                .spawn((TreeFruit, Transform::default()))
                .id()
        })
        .collect();

    send_day_end(&mut app, 2, false);
    app.update();

    let mut query = app.world_mut().query_filtered::<Entity, With<TreeFruit>>();
    let alive: HashSet<Entity> = query.iter(app.world()).collect();
    for old in &stale {
        assert!(!alive.contains(old), "yesterday's fruit is gone");
    }
    assert!(alive.len() <= 2, "at most one fruit per spot");
}

// ─────────────────────────────────────────────────────────────────────────────
// Boot smoke
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn boot_reaches_playing_with_valid_data() {
    let mut app = build_test_app();
    app.add_plugins(DataPlugin);

    // First update enters Loading and populates registries; second applies
    // NextState.
    app.update();
    app.update();

    let state = app.world().resource::<State<GameState>>();
    assert_eq!(state.get(), &GameState::Playing);

    let registry = app.world().resource::<PlantRegistry>();
    assert_eq!(registry.plants.len(), PlantKind::ALL.len());
}
