//! Data Model: OperationSnapshot and the enums it is built from
//!
//! A snapshot is the immutable view of the wizard state that one evaluation
//! reads. Fields the evaluators require are `Option`s so that an incomplete
//! form surfaces as a field-identifying validation error instead of a default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable input of a single evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationSnapshot {
    pub drone: DroneParameters,
    pub operation: OperationParameters,
    pub airspace: AirspaceEnvironment,
    /// Ground mitigations claimed by the operator, in claim order
    #[serde(default)]
    pub ground_mitigations: Vec<GroundMitigationClaim>,
    /// Strategic air mitigations claimed by the operator
    #[serde(default)]
    pub strategic_mitigations: Vec<StrategicMitigation>,
    /// Tactical air mitigations claimed by the operator
    #[serde(default)]
    pub tactical_mitigations: Vec<TacticalMitigationClaim>,
}

impl OperationSnapshot {
    pub fn new(
        drone: DroneParameters,
        operation: OperationParameters,
        airspace: AirspaceEnvironment,
    ) -> Self {
        Self {
            drone,
            operation,
            airspace,
            ..Default::default()
        }
    }

    pub fn with_ground_mitigation(mut self, mitigation: GroundMitigation, robustness: Robustness) -> Self {
        self.ground_mitigations.push(GroundMitigationClaim { mitigation, robustness });
        self
    }

    pub fn with_strategic_mitigation(mut self, mitigation: StrategicMitigation) -> Self {
        self.strategic_mitigations.push(mitigation);
        self
    }

    pub fn with_tactical_mitigation(mut self, capability: TacticalCapability, robustness: Robustness) -> Self {
        self.tactical_mitigations.push(TacticalMitigationClaim { capability, robustness });
        self
    }
}

// ============================================================================
// Drone
// ============================================================================

/// Physical parameters of the unmanned aircraft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DroneParameters {
    /// Maximum characteristic dimension (wingspan, rotor diameter...) in metres
    pub max_characteristic_dimension_m: Option<f64>,
    /// Cruise speed in m/s
    pub cruise_speed_ms: Option<f64>,
    /// Maximum speed in m/s
    pub max_speed_ms: Option<f64>,
    /// Maximum take-off mass in kg
    pub mtow_kg: Option<f64>,
    /// Declared typical kinetic energy in joules; derived from MTOW and speed when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinetic_energy_j: Option<f64>,
    pub class_identification: Option<DroneClass>,
    pub uas_type: Option<UasType>,
    #[serde(default)]
    pub environmental_limitations: EnvironmentalLimitations,
}

impl DroneParameters {
    pub fn new(dimension_m: f64, max_speed_ms: f64, mtow_kg: f64) -> Self {
        Self {
            max_characteristic_dimension_m: Some(dimension_m),
            cruise_speed_ms: Some(max_speed_ms),
            max_speed_ms: Some(max_speed_ms),
            mtow_kg: Some(mtow_kg),
            ..Default::default()
        }
    }

    pub fn with_cruise_speed(mut self, speed_ms: f64) -> Self {
        self.cruise_speed_ms = Some(speed_ms);
        self
    }

    pub fn with_kinetic_energy(mut self, joules: f64) -> Self {
        self.kinetic_energy_j = Some(joules);
        self
    }

    pub fn with_class(mut self, class: DroneClass) -> Self {
        self.class_identification = Some(class);
        self
    }

    pub fn with_type(mut self, uas_type: UasType) -> Self {
        self.uas_type = Some(uas_type);
        self
    }

    pub fn with_limitations(mut self, limitations: EnvironmentalLimitations) -> Self {
        self.environmental_limitations = limitations;
        self
    }
}

/// Weather envelope the manufacturer declares for the aircraft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalLimitations {
    pub max_wind_speed_takeoff_ms: Option<f64>,
    pub max_gust_speed_ms: Option<f64>,
    pub min_temperature_c: Option<f64>,
    pub max_temperature_c: Option<f64>,
    /// Minimum visibility in metres
    pub visibility_m: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub other_limitations: String,
}

/// Class identification label of the UAS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DroneClass {
    Unclassified,
    C0,
    C1,
    C2,
    C3,
    C4,
    C5,
    C6,
    Prototype,
    Specific,
    Certified,
}

/// Airframe family of the UAS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UasType {
    Aeroplane,
    Helicopter,
    Multirotor,
    HybridVtol,
    LighterThanAir,
    Other,
}

// ============================================================================
// Operation
// ============================================================================

/// Concept of operations parameters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationParameters {
    pub operation_type: Option<OperationType>,
    pub day_night: Option<DayNight>,
    /// Maximum horizontal distance between pilot and aircraft in metres
    pub max_distance_from_pilot_m: Option<f64>,
    #[serde(default)]
    pub visual_observers: u32,
    /// Maximum operating height above ground level in metres
    pub max_height_m: Option<f64>,
    pub dangerous_goods: Option<bool>,
    pub dropping_materials: Option<bool>,
    /// Number of aircraft flown simultaneously by one remote pilot
    #[serde(default = "default_drone_count")]
    pub simultaneous_drones: u32,
    #[serde(default)]
    pub operating_area: OperatingArea,
}

fn default_drone_count() -> u32 {
    1
}

impl OperationParameters {
    pub fn new(operation_type: OperationType, density: PopulationDensity) -> Self {
        Self {
            operation_type: Some(operation_type),
            simultaneous_drones: 1,
            operating_area: OperatingArea::classified(density),
            ..Default::default()
        }
    }

    pub fn with_height(mut self, height_m: f64) -> Self {
        self.max_height_m = Some(height_m);
        self
    }

    pub fn with_observers(mut self, count: u32) -> Self {
        self.visual_observers = count;
        self
    }

    pub fn with_distance(mut self, distance_m: f64) -> Self {
        self.max_distance_from_pilot_m = Some(distance_m);
        self
    }

    pub fn with_day_night(mut self, day_night: DayNight) -> Self {
        self.day_night = Some(day_night);
        self
    }

    pub fn with_geo_file(mut self, reference: impl Into<String>) -> Self {
        self.operating_area.geo_file_refs.push(reference.into());
        self
    }

    /// Population density of the overflown area, if the geo data has been classified
    pub fn population_density(&self) -> Option<PopulationDensity> {
        self.operating_area.population_density
    }
}

/// Operating volume reduced to what the engine needs
///
/// Geo files (KML/KMZ/GeoJSON) are parsed by a separate geo-processing
/// collaborator; the engine only sees the resulting classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingArea {
    pub population_density: Option<PopulationDensity>,
    /// Opaque references (storage URLs) to the files the classification came from
    #[serde(default)]
    pub geo_file_refs: Vec<String>,
}

impl OperatingArea {
    pub fn classified(density: PopulationDensity) -> Self {
        Self {
            population_density: Some(density),
            geo_file_refs: Vec::new(),
        }
    }
}

/// Line-of-sight regime of the operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    #[serde(rename = "VLOS")]
    Vlos,
    #[serde(rename = "EVLOS")]
    Evlos,
    #[serde(rename = "BVLOS")]
    Bvlos,
}

impl OperationType {
    /// Whether a remote crew member keeps the aircraft in direct sight
    pub fn has_visual_contact(&self) -> bool {
        matches!(self, OperationType::Vlos | OperationType::Evlos)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OperationType::Vlos => write!(f, "VLOS"),
            OperationType::Evlos => write!(f, "EVLOS"),
            OperationType::Bvlos => write!(f, "BVLOS"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayNight {
    Day,
    Night,
    DayAndNight,
}

/// Ground population classification of the overflown area, least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationDensity {
    ControlledGroundArea,
    SparselyPopulated,
    Populated,
    GatheringOfPeople,
}

impl fmt::Display for PopulationDensity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PopulationDensity::ControlledGroundArea => write!(f, "controlled ground area"),
            PopulationDensity::SparselyPopulated => write!(f, "sparsely populated environment"),
            PopulationDensity::Populated => write!(f, "populated environment"),
            PopulationDensity::GatheringOfPeople => write!(f, "gathering of people"),
        }
    }
}

// ============================================================================
// Airspace
// ============================================================================

/// Airspace the operational volume sits in
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirspaceEnvironment {
    pub airspace_class: Option<AirspaceClass>,
    /// Within an airport or heliport environment
    #[serde(default)]
    pub airport_environment: bool,
    /// Within a Mode-S veil or transponder mandatory zone
    #[serde(default)]
    pub mode_s_veil_or_tmz: bool,
    /// Atypical or segregated airspace (no manned traffic expected)
    #[serde(default)]
    pub atypical_or_segregated: bool,
    /// Over an urban rather than rural environment
    #[serde(default)]
    pub urban: bool,
}

impl AirspaceEnvironment {
    pub fn new(class: AirspaceClass) -> Self {
        Self {
            airspace_class: Some(class),
            ..Default::default()
        }
    }

    pub fn airport(mut self) -> Self {
        self.airport_environment = true;
        self
    }

    pub fn mode_s_veil(mut self) -> Self {
        self.mode_s_veil_or_tmz = true;
        self
    }

    pub fn atypical(mut self) -> Self {
        self.atypical_or_segregated = true;
        self
    }

    pub fn urban(mut self) -> Self {
        self.urban = true;
        self
    }
}

/// ICAO airspace class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirspaceClass {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl AirspaceClass {
    /// Classes A to E are controlled airspace
    pub fn is_controlled(&self) -> bool {
        matches!(
            self,
            AirspaceClass::A | AirspaceClass::B | AirspaceClass::C | AirspaceClass::D | AirspaceClass::E
        )
    }
}

// ============================================================================
// Risk scales
// ============================================================================

/// Robustness level of a mitigation or safety objective
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Robustness {
    Low,
    Medium,
    High,
}

impl fmt::Display for Robustness {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Robustness::Low => write!(f, "Low"),
            Robustness::Medium => write!(f, "Medium"),
            Robustness::High => write!(f, "High"),
        }
    }
}

/// Air Risk Class, ordered from lowest (ARC-a) to highest (ARC-d) risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AirRiskClass {
    #[serde(rename = "ARC-a")]
    A,
    #[serde(rename = "ARC-b")]
    B,
    #[serde(rename = "ARC-c")]
    C,
    #[serde(rename = "ARC-d")]
    D,
}

impl AirRiskClass {
    pub const ALL: [AirRiskClass; 4] = [AirRiskClass::A, AirRiskClass::B, AirRiskClass::C, AirRiskClass::D];

    /// Zero-based column index in the SAIL matrix
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Class `steps` levels lower, saturating at ARC-a
    pub fn lowered(self, steps: u8) -> AirRiskClass {
        let idx = self.index().saturating_sub(steps as usize);
        AirRiskClass::ALL[idx]
    }
}

impl fmt::Display for AirRiskClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AirRiskClass::A => write!(f, "ARC-a"),
            AirRiskClass::B => write!(f, "ARC-b"),
            AirRiskClass::C => write!(f, "ARC-c"),
            AirRiskClass::D => write!(f, "ARC-d"),
        }
    }
}

/// Specific Assurance and Integrity Level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sail {
    I,
    II,
    III,
    IV,
    V,
    VI,
}

impl Sail {
    pub const ALL: [Sail; 6] = [Sail::I, Sail::II, Sail::III, Sail::IV, Sail::V, Sail::VI];

    /// Zero-based column index in the OSO table
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Sail {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let roman = match self {
            Sail::I => "I",
            Sail::II => "II",
            Sail::III => "III",
            Sail::IV => "IV",
            Sail::V => "V",
            Sail::VI => "VI",
        };
        write!(f, "SAIL {}", roman)
    }
}

// ============================================================================
// Mitigation selections
// ============================================================================

/// Ground risk mitigations, in the order they are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundMitigation {
    /// M1: strategic mitigations reducing the people at risk (sheltering,
    /// operational restrictions, ground observers)
    StrategicReduction,
    /// M2: effects of ground impact reduced (parachute, frangibility)
    ImpactReduction,
    /// M3: emergency response plan in place, validated and effective
    EmergencyResponsePlan,
}

impl GroundMitigation {
    pub const ALL: [GroundMitigation; 3] = [
        GroundMitigation::StrategicReduction,
        GroundMitigation::ImpactReduction,
        GroundMitigation::EmergencyResponsePlan,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            GroundMitigation::StrategicReduction => "M1",
            GroundMitigation::ImpactReduction => "M2",
            GroundMitigation::EmergencyResponsePlan => "M3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundMitigationClaim {
    pub mitigation: GroundMitigation,
    pub robustness: Robustness,
}

/// Strategic air mitigations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicMitigation {
    /// Restrict the operational volume to a less busy geographic boundary
    RestrictedBoundary,
    /// Restrict operations to times of lower traffic density
    RestrictedTime,
    /// Limit the exposure time in the busier portion of the volume
    RestrictedExposure,
    /// Common airspace structures (corridors, zones)
    CommonStructures,
    /// Common flight rules applicable to all airspace users
    CommonRules,
}

impl StrategicMitigation {
    pub fn id(&self) -> &'static str {
        match self {
            StrategicMitigation::RestrictedBoundary => "SM-boundary",
            StrategicMitigation::RestrictedTime => "SM-time",
            StrategicMitigation::RestrictedExposure => "SM-exposure",
            StrategicMitigation::CommonStructures => "SM-structures",
            StrategicMitigation::CommonRules => "SM-rules",
        }
    }

    pub fn category(&self) -> StrategicCategory {
        match self {
            StrategicMitigation::RestrictedBoundary
            | StrategicMitigation::RestrictedTime
            | StrategicMitigation::RestrictedExposure => StrategicCategory::OperationalRestrictions,
            StrategicMitigation::CommonStructures | StrategicMitigation::CommonRules => {
                StrategicCategory::CommonStructuresAndRules
            }
        }
    }
}

/// Non-overlapping strategic mitigation families; each lowers ARC by at most one class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicCategory {
    OperationalRestrictions,
    CommonStructuresAndRules,
}

/// Tactical (in-flight) mitigation capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticalCapability {
    /// See-and-avoid by the remote crew or visual observers
    VisualSeeAndAvoid,
    /// Onboard or ground-based detect-and-avoid system
    DetectAndAvoid,
    /// Electronic conspicuity (ADS-B out, FLARM, network remote ID)
    ElectronicConspicuity,
}

impl TacticalCapability {
    pub fn id(&self) -> &'static str {
        match self {
            TacticalCapability::VisualSeeAndAvoid => "TM-see-and-avoid",
            TacticalCapability::DetectAndAvoid => "TM-daa",
            TacticalCapability::ElectronicConspicuity => "TM-conspicuity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TacticalMitigationClaim {
    pub capability: TacticalCapability,
    pub robustness: Robustness,
}
