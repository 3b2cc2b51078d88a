//! Data layer — populates the plant registry at startup and validates it.
//!
//! Bad plant data (a kind without a definition, too few sprite frames, a
//! growth rate that can't advance a crop) is a content bug, not a runtime
//! condition: it aborts startup before Playing is ever entered, so the
//! farming systems can assume every `PlantKind` resolves.

use bevy::prelude::*;
use thiserror::Error;

use crate::shared::*;

pub mod plants;

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("no plant definition for {0:?}")]
    MissingPlant(PlantKind),
    #[error("{0:?} needs at least 2 sprite frames (growth + dead), got {1}")]
    TooFewFrames(PlantKind, usize),
    #[error("{0:?} growth rate must be positive, got {1}")]
    BadGrowthRate(PlantKind, f32),
}

/// Check every plant kind has a usable definition.
pub fn validate(registry: &PlantRegistry) -> Result<(), DataError> {
    for kind in PlantKind::ALL {
        let def = registry.get(kind).ok_or(DataError::MissingPlant(kind))?;
        if def.frame_count < 2 {
            return Err(DataError::TooFewFrames(kind, def.frame_count));
        }
        if def.growth_rate <= 0.0 {
            return Err(DataError::BadGrowthRate(kind, def.growth_rate));
        }
    }
    Ok(())
}

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Populate and validate the registries, then enter Playing.
fn load_all_data(
    mut plant_registry: ResMut<PlantRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    plants::populate_plants(&mut plant_registry);

    if let Err(err) = validate(&plant_registry) {
        panic!("plant data failed validation: {err}");
    }

    info!(
        "[Data] plants loaded: {}",
        plant_registry.plants.len()
    );

    next_state.set(GameState::Playing);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
