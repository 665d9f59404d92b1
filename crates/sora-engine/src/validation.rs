//! CONOPS completeness checks
//!
//! Unlike the evaluators, which stop at the first missing input, this reports
//! every problem at once so a form can highlight all of them.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sora_core::{OperationSnapshot, OperationType, SoraError};
use sora_tables::mitigation;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<FieldError> for SoraError {
    fn from(e: FieldError) -> Self {
        SoraError::validation(e.field, e.message)
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn present<T>(&mut self, value: &Option<T>, field: &str) {
        if value.is_none() {
            self.push(field, "required field is missing");
        }
    }

    fn positive(&mut self, value: Option<f64>, field: &str) {
        match value {
            None => self.push(field, "required field is missing"),
            Some(v) if !v.is_finite() || v <= 0.0 => self.push(field, format!("must be greater than zero (got {})", v)),
            Some(_) => {}
        }
    }

    fn non_negative(&mut self, value: Option<f64>, field: &str) {
        match value {
            None => self.push(field, "required field is missing"),
            Some(v) if !v.is_finite() || v < 0.0 => self.push(field, format!("must not be negative (got {})", v)),
            Some(_) => {}
        }
    }
}

pub fn validate_snapshot(snapshot: &OperationSnapshot) -> Result<(), Vec<FieldError>> {
    let mut c = Collector::default();

    let drone = &snapshot.drone;
    c.positive(drone.max_characteristic_dimension_m, "drone.max_characteristic_dimension_m");
    c.positive(drone.max_speed_ms, "drone.max_speed_ms");
    c.positive(drone.cruise_speed_ms, "drone.cruise_speed_ms");
    c.positive(drone.mtow_kg, "drone.mtow_kg");
    if let (Some(cruise), Some(max)) = (drone.cruise_speed_ms, drone.max_speed_ms) {
        if cruise > max {
            c.push("drone.cruise_speed_ms", "must not exceed the maximum speed");
        }
    }
    if drone.kinetic_energy_j.is_some() {
        c.non_negative(drone.kinetic_energy_j, "drone.kinetic_energy_j");
    }
    c.present(&drone.class_identification, "drone.class_identification");
    c.present(&drone.uas_type, "drone.uas_type");

    let limits = &drone.environmental_limitations;
    c.non_negative(limits.max_wind_speed_takeoff_ms, "drone.environmental_limitations.max_wind_speed_takeoff_ms");
    c.present(&limits.min_temperature_c, "drone.environmental_limitations.min_temperature_c");
    c.present(&limits.max_temperature_c, "drone.environmental_limitations.max_temperature_c");
    if let (Some(gust), Some(wind)) = (limits.max_gust_speed_ms, limits.max_wind_speed_takeoff_ms) {
        if gust < wind {
            c.push(
                "drone.environmental_limitations.max_gust_speed_ms",
                "must not be lower than the take-off wind limit",
            );
        }
    }
    if let (Some(min), Some(max)) = (limits.min_temperature_c, limits.max_temperature_c) {
        if min >= max {
            c.push(
                "drone.environmental_limitations.min_temperature_c",
                "must be lower than the maximum temperature",
            );
        }
    }
    if limits.visibility_m.is_some() {
        c.positive(limits.visibility_m, "drone.environmental_limitations.visibility_m");
    }

    let operation = &snapshot.operation;
    c.present(&operation.operation_type, "operation.operation_type");
    c.present(&operation.day_night, "operation.day_night");
    c.positive(operation.max_distance_from_pilot_m, "operation.max_distance_from_pilot_m");
    c.non_negative(operation.max_height_m, "operation.max_height_m");
    c.present(&operation.dangerous_goods, "operation.dangerous_goods");
    c.present(&operation.dropping_materials, "operation.dropping_materials");
    if operation.simultaneous_drones == 0 {
        c.push("operation.simultaneous_drones", "at least one aircraft is required");
    }
    if operation.operation_type == Some(OperationType::Evlos) && operation.visual_observers == 0 {
        c.push("operation.visual_observers", "EVLOS requires at least one visual observer");
    }
    c.present(
        &operation.operating_area.population_density,
        "operation.operating_area.population_density",
    );
    if operation.operating_area.geo_file_refs.is_empty() {
        c.push("operation.operating_area.geo_file_refs", "at least one geographic file is required");
    }

    c.present(&snapshot.airspace.airspace_class, "airspace.airspace_class");

    let mut seen = HashSet::new();
    for (i, claim) in snapshot.ground_mitigations.iter().enumerate() {
        let field = format!("ground_mitigations[{}]", i);
        if !seen.insert(claim.mitigation) {
            c.push(field, format!("{} is already claimed", claim.mitigation.id()));
        } else if mitigation::ground_credit(claim.mitigation, claim.robustness).is_none() {
            let levels: Vec<String> = mitigation::covered_levels(claim.mitigation)
                .iter()
                .map(|r| r.to_string())
                .collect();
            c.push(
                field,
                format!(
                    "{} has no {} robustness level (available: {})",
                    claim.mitigation.id(),
                    claim.robustness,
                    levels.join(", ")
                ),
            );
        }
    }

    if c.errors.is_empty() {
        Ok(())
    } else {
        Err(c.errors)
    }
}
