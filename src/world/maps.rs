//! Map data definitions.
//!
//! The farm is defined in code as a grid-sized farmable mask plus object
//! spawn points, standing in for a map file. The soil grid is seeded from
//! this description once at startup.

use bevy::prelude::*;

use crate::shared::*;

/// Static description of the farm map.
#[derive(Resource, Debug, Clone)]
pub struct MapDef {
    pub width: usize,
    pub height: usize,
    /// Row-major: `farmable[y * width + x]`.
    pub farmable: Vec<bool>,
    /// Grid cells holding a fruit tree.
    pub tree_spots: Vec<(i32, i32)>,
    /// Grid cell the player starts on.
    pub player_start: (i32, i32),
}

impl MapDef {
    pub fn is_farmable(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.farmable[y as usize * self.width + x as usize]
    }

    /// Build the soil grid this map describes: same dimensions, `Farmable`
    /// seeded from the mask, everything else starting empty.
    pub fn seed_grid(&self) -> SoilGrid {
        let mut grid = SoilGrid::new(self.width as i32, self.height as i32);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                if self.is_farmable(x, y) {
                    grid.add_tag(x, y, TileTag::Farmable);
                }
            }
        }
        grid
    }
}

// ---------------------------------------------------------------------------
// Farm map: 32x24 — central tillable field, tree line along the top,
// farmhouse row (never farmable) at the bottom
// ---------------------------------------------------------------------------
pub fn generate_farm() -> MapDef {
    let width = 32usize;
    let height = 24usize;
    let mut farmable = vec![false; width * height];

    // Central field.
    for y in 6..16 {
        for x in 6..26 {
            farmable[y * width + x] = true;
        }
    }

    MapDef {
        width,
        height,
        farmable,
        tree_spots: vec![(8, 19), (15, 20), (23, 19)],
        player_start: (16, 17),
    }
}
