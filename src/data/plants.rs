use crate::shared::*;

/// Populate the PlantRegistry with every plantable kind.
///
/// `frame_count` is the atlas row length: growth frames plus the trailing
/// dead-crop frame. Corn ripens in 4 watered days; tomato gains 0.7 age a
/// day, so it takes 5.
pub fn populate_plants(registry: &mut PlantRegistry) {
    let plants = [
        PlantDef {
            kind: PlantKind::Corn,
            name: "Corn".to_string(),
            harvest_id: "corn".to_string(),
            frame_count: 6,
            growth_rate: 1.0,
            // Corn grows tall, so it anchors higher above its soil tile.
            y_offset: 16.0,
            atlas_row: 0,
        },
        PlantDef {
            kind: PlantKind::Tomato,
            name: "Tomato".to_string(),
            harvest_id: "tomato".to_string(),
            frame_count: 5,
            growth_rate: 0.7,
            y_offset: 8.0,
            atlas_row: 1,
        },
    ];

    for plant in plants {
        registry.plants.insert(plant.kind, plant);
    }
}
