//! Shared components, resources, events, and states for Sproutvale.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR & WEATHER
// ═══════════════════════════════════════════════════════════════════════

/// The in-game day counter plus today's weather flag.
///
/// There is no sub-day clock: time advances only when the player sleeps,
/// one whole day at a time.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    pub day: u32,
    pub raining: bool,
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            day: 1,
            raining: false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Hoe,
    WateringCan,
}

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// Axis-aligned collision box, expressed relative to the entity's transform.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub size: Vec2,
    pub offset: Vec2,
}

impl Hitbox {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
        }
    }

    /// The box in world space for an entity at `translation`.
    pub fn rect(&self, translation: Vec3) -> Rect {
        Rect::from_center_size(translation.truncate() + self.offset, self.size)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ITEMS & INVENTORY
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for every item type in the game.
/// Using string IDs for data-driven flexibility.
pub type ItemId = String;

#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub items: HashMap<ItemId, u32>,
}

impl Inventory {
    pub fn add(&mut self, item_id: &str, quantity: u32) {
        *self.items.entry(item_id.to_string()).or_insert(0) += quantity;
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLANTS
// ═══════════════════════════════════════════════════════════════════════

/// Every seed type the player can plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantKind {
    Corn,
    Tomato,
}

impl PlantKind {
    pub const ALL: [PlantKind; 2] = [PlantKind::Corn, PlantKind::Tomato];
}

/// Static per-kind plant data, populated by the data plugin at startup.
///
/// `frame_count` counts every sprite frame for the kind: the growth frames
/// plus one trailing dead-crop frame. A plant is ripe on frame
/// `frame_count - 2` and shows frame `frame_count - 1` once it has rotted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantDef {
    pub kind: PlantKind,
    pub name: String,
    /// Inventory item granted per harvest.
    pub harvest_id: ItemId,
    pub frame_count: usize,
    /// Age gained per watered day.
    pub growth_rate: f32,
    /// Vertical anchor offset from the soil tile centre, in pixels.
    pub y_offset: f32,
    /// Row in the plants atlas holding this kind's frames.
    pub atlas_row: u32,
}

impl PlantDef {
    /// Age at which the plant is fully grown (index of the ripe frame).
    pub fn max_age(&self) -> f32 {
        (self.frame_count as f32 - 2.0).max(0.0)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PlantRegistry {
    pub plants: HashMap<PlantKind, PlantDef>,
}

impl PlantRegistry {
    pub fn get(&self, kind: PlantKind) -> Option<&PlantDef> {
        self.plants.get(&kind)
    }
}

/// A growing (or rotted) crop occupying one planted soil cell.
///
/// `age` advances by `growth_rate` on each watered day and is clamped to
/// `[0, max_age + 1]`; `floor(age)` selects the sprite frame, so the frame
/// index is always valid.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct PlantCrop {
    pub kind: PlantKind,
    pub age: f32,
    pub max_age: f32,
    pub growth_rate: f32,
    pub harvestable: bool,
    /// Consecutive days spent fully grown without being harvested.
    pub days_harvestable: u8,
    pub dead: bool,
}

impl PlantCrop {
    pub fn new(def: &PlantDef) -> Self {
        Self {
            kind: def.kind,
            age: 0.0,
            max_age: def.max_age(),
            growth_rate: def.growth_rate,
            harvestable: false,
            days_harvestable: 0,
            dead: false,
        }
    }

    /// Sprite frame for the current age.
    pub fn frame(&self) -> usize {
        self.age.floor().max(0.0) as usize
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SOIL GRID
// ═══════════════════════════════════════════════════════════════════════

/// One orthogonal per-cell attribute. The numeric values are bit positions
/// inside [`TileTags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TileTag {
    /// Static, from map data: the cell may be tilled at all.
    Farmable = 1 << 0,
    Tilled = 1 << 1,
    Watered = 1 << 2,
    Planted = 1 << 3,
}

/// The tag set of one grid cell, packed into a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileTags(u8);

impl TileTags {
    pub fn has(self, tag: TileTag) -> bool {
        self.0 & tag as u8 != 0
    }

    pub fn insert(&mut self, tag: TileTag) {
        self.0 |= tag as u8;
    }

    pub fn remove(&mut self, tag: TileTag) {
        self.0 &= !(tag as u8);
    }
}

/// Read-only watered lookup handed to crop growth so plants never hold a
/// mutable alias of the grid.
pub trait WaterLookup {
    fn is_watered(&self, pos: Vec2) -> bool;
}

/// The farm's soil state: a rectangular grid of [`TileTags`], sized from the
/// map at startup and fixed for the process lifetime.
///
/// All accessors treat out-of-range coordinates as "tag absent" so that
/// neighbor checks at the grid edge never need special cases.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct SoilGrid {
    width: i32,
    height: i32,
    /// Row-major: `cells[y * width + x]`.
    cells: Vec<TileTags>,
}

impl SoilGrid {
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![TileTags::default(); len],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// The cell's tag set; the empty set when (x, y) is outside the grid.
    pub fn tags(&self, x: i32, y: i32) -> TileTags {
        if self.in_bounds(x, y) {
            self.cells[self.index(x, y)]
        } else {
            TileTags::default()
        }
    }

    /// No-op when (x, y) is outside the grid.
    pub fn add_tag(&mut self, x: i32, y: i32, tag: TileTag) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx].insert(tag);
        }
    }

    /// No-op when (x, y) is outside the grid.
    pub fn remove_tag(&mut self, x: i32, y: i32, tag: TileTag) {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            self.cells[idx].remove(tag);
        }
    }

    /// All cells in row-major order, bottom row first.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), TileTags)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &tags)| ((i as i32 % width, i as i32 / width), tags))
    }

    /// Convert a world position to the grid cell containing it.
    pub fn world_to_tile(pos: Vec2) -> (i32, i32) {
        (
            (pos.x / TILE_SIZE).floor() as i32,
            (pos.y / TILE_SIZE).floor() as i32,
        )
    }
}

impl WaterLookup for SoilGrid {
    /// False for positions outside the grid or on un-tilled ground.
    fn is_watered(&self, pos: Vec2) -> bool {
        let (x, y) = Self::world_to_tile(pos);
        self.tags(x, y).has(TileTag::Watered)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// Player swings a tool at a world position.
#[derive(Event, Debug, Clone)]
pub struct ToolUseEvent {
    pub tool: ToolKind,
    pub target: Vec2,
}

/// Player sows a seed at a world position.
#[derive(Event, Debug, Clone)]
pub struct PlantSeedEvent {
    pub target: Vec2,
    pub kind: PlantKind,
}

/// Player went to bed; the calendar turns this into a [`DayEndEvent`].
#[derive(Event, Debug, Clone)]
pub struct SleepEvent;

/// One day has ended. `raining` is the weather already rolled for the new
/// day, so day-end handlers don't have to reach back into the calendar.
#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub day: u32,
    pub raining: bool,
}

#[derive(Event, Debug, Clone)]
pub struct ItemPickupEvent {
    pub item_id: ItemId,
    pub quantity: u32,
}

#[derive(Event, Debug, Clone)]
pub struct CropHarvestedEvent {
    pub kind: PlantKind,
    pub harvest_id: ItemId,
    pub x: i32,
    pub y: i32,
}

#[derive(Event, Debug, Clone)]
pub struct PlaySfxEvent {
    pub sfx_id: String,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 16.0;
pub const PIXEL_SCALE: f32 = 3.0; // render scale (16px × 3 = 48px on screen)
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// Number of water-surface sprite variants to choose from when watering.
pub const WATER_VARIANTS: u32 = 3;

// Render layers, back to front. Ripe plants move from GROUND_PLANT up to
// MAIN so they y-sort against the player.
pub const Z_GROUND: f32 = 0.0;
pub const Z_SOIL: f32 = 1.0;
pub const Z_SOIL_WATER: f32 = 2.0;
pub const Z_GROUND_PLANT: f32 = 3.0;
pub const Z_MAIN: f32 = 4.0;
