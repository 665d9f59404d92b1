//! Intrinsic ground risk class table
//!
//! Rows are operational scenarios, columns the UA size / kinetic energy class.
//! `None` cells are outside the specific category.

use sora_core::{CharacteristicColumn, GroundScenario, PopulationDensity};

/// Upper bounds of the first three columns by characteristic dimension, metres
pub const DIMENSION_THRESHOLDS_M: [f64; 3] = [1.0, 3.0, 8.0];

/// Upper bounds of the first three columns by typical kinetic energy, joules
pub const KINETIC_ENERGY_THRESHOLDS_J: [f64; 3] = [700.0, 34_000.0, 1_084_000.0];

const IGRC_TABLE: [[Option<u8>; 4]; 7] = [
    // 1 m      3 m      8 m      >8 m
    [Some(1), Some(2), Some(3), Some(4)],  // controlled ground area
    [Some(2), Some(3), Some(4), Some(5)],  // VLOS sparsely populated
    [Some(3), Some(4), Some(5), Some(6)],  // BVLOS sparsely populated
    [Some(4), Some(5), Some(6), Some(8)],  // VLOS populated
    [Some(5), Some(6), Some(8), Some(10)], // BVLOS populated
    [Some(7), None, None, None],           // VLOS gathering of people
    [Some(8), None, None, None],           // BVLOS gathering of people
];

/// Column for a measurement. A value equal to a threshold falls in the next (higher) column.
pub fn column_for(value: f64, thresholds: &[f64; 3]) -> CharacteristicColumn {
    let idx = thresholds.iter().filter(|t| value >= **t).count();
    CharacteristicColumn::from_index(idx)
}

/// Effective column: the more severe of the dimension and kinetic energy columns
pub fn effective_column(dimension_m: f64, kinetic_energy_j: f64) -> CharacteristicColumn {
    column_for(dimension_m, &DIMENSION_THRESHOLDS_M)
        .max(column_for(kinetic_energy_j, &KINETIC_ENERGY_THRESHOLDS_J))
}

/// Table row for a density category, evaluated on VLOS or BVLOS rows
pub fn scenario_for(density: PopulationDensity, vlos_rows: bool) -> GroundScenario {
    match (density, vlos_rows) {
        (PopulationDensity::ControlledGroundArea, _) => GroundScenario::ControlledGroundArea,
        (PopulationDensity::SparselyPopulated, true) => GroundScenario::VlosSparselyPopulated,
        (PopulationDensity::SparselyPopulated, false) => GroundScenario::BvlosSparselyPopulated,
        (PopulationDensity::Populated, true) => GroundScenario::VlosPopulated,
        (PopulationDensity::Populated, false) => GroundScenario::BvlosPopulated,
        (PopulationDensity::GatheringOfPeople, true) => GroundScenario::VlosGathering,
        (PopulationDensity::GatheringOfPeople, false) => GroundScenario::BvlosGathering,
    }
}

pub fn intrinsic_grc(scenario: GroundScenario, column: CharacteristicColumn) -> Option<u8> {
    IGRC_TABLE[scenario.index()][column.index()]
}

/// Lowest GRC any mitigation can reach in a column (the controlled ground area value)
pub fn column_floor(column: CharacteristicColumn) -> u8 {
    IGRC_TABLE[GroundScenario::ControlledGroundArea.index()][column.index()].unwrap_or(1)
}
