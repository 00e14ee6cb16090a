//! Shared components, resources, and definition types for Rootbound.
//!
//! This is the type contract. Every domain module imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════
// IDS & CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub type SpeciesId = String;
pub type ZoneId = String;
pub type ConditionId = String;
pub type TreatmentId = String;
pub type AmendmentId = String;
pub type PestId = String;

/// Fixed run horizon. Weeks are 0-based internally; week 30 is never generated.
pub const SEASON_WEEKS: u32 = 30;

pub const DEFAULT_GRID_ROWS: i32 = 3;
pub const DEFAULT_GRID_COLS: i32 = 3;

/// Chebyshev distance — the adjacency metric for companion and spread radii.
pub fn chebyshev(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs().max((a.1 - b.1).abs())
}

// ═══════════════════════════════════════════════════════════════════════
// TURN PHASES
// ═══════════════════════════════════════════════════════════════════════

/// Weekly phase cycle. DUSK runs the tick; the week counter increments on
/// the ADVANCE → DAWN wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Dawn,
    Plan,
    Act,
    Dusk,
    Advance,
}

impl Phase {
    /// The generic next phase in the cycle.
    pub fn next(self) -> Self {
        match self {
            Phase::Dawn => Phase::Plan,
            Phase::Plan => Phase::Act,
            Phase::Act => Phase::Dusk,
            Phase::Dusk => Phase::Advance,
            Phase::Advance => Phase::Dawn,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Dawn => "DAWN",
            Phase::Plan => "PLAN",
            Phase::Act => "ACT",
            Phase::Dusk => "DUSK",
            Phase::Advance => "ADVANCE",
        };
        write!(f, "{s}")
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

/// Everything a caller can do wrong. Tick systems never fail; action methods
/// validate fully before mutating, so an `Err` leaves all state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("unknown species `{0}`")]
    UnknownSpecies(SpeciesId),
    #[error("unknown zone `{0}`")]
    UnknownZone(ZoneId),
    #[error("unknown amendment `{0}`")]
    UnknownAmendment(AmendmentId),
    #[error("unknown condition `{0}`")]
    UnknownCondition(ConditionId),
    #[error("unknown treatment `{0}`")]
    UnknownTreatment(TreatmentId),
    #[error("({row}, {col}) is outside the garden")]
    OutOfBounds { row: i32, col: i32 },
    #[error("plot ({row}, {col}) already has a plant")]
    PlotOccupied { row: i32, col: i32 },
    #[error("no plant at ({row}, {col})")]
    NoPlantHere { row: i32, col: i32 },
    #[error("nothing ready to harvest at ({row}, {col})")]
    NothingToHarvest { row: i32, col: i32 },
    #[error("wrong phase: expected {expected}, currently {actual}")]
    WrongPhase { expected: Phase, actual: Phase },
    #[error("not enough energy: have {have}, need {need}")]
    InsufficientEnergy { have: u32, need: u32 },
    #[error("the run has ended")]
    RunEnded,
    #[error("invalid save: {reason}")]
    InvalidSave { reason: String },
}

pub type GameResult<T> = Result<T, GameError>;

// ═══════════════════════════════════════════════════════════════════════
// PLANT LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════

/// The seven lifecycle stages, integer-ordered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Seed,
    Germination,
    Seedling,
    Vegetative,
    Flowering,
    Fruiting,
    Senescence,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::Seed,
        Stage::Germination,
        Stage::Seedling,
        Stage::Vegetative,
        Stage::Flowering,
        Stage::Fruiting,
        Stage::Senescence,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Stages that never ripen and never contract conditions.
    pub fn is_immature(self) -> bool {
        matches!(self, Stage::Seed | Stage::Germination | Stage::Seedling)
    }

    pub fn label(self) -> &'static str {
        match self {
            Stage::Seed => "seed",
            Stage::Germination => "germination",
            Stage::Seedling => "seedling",
            Stage::Vegetative => "vegetative",
            Stage::Flowering => "flowering",
            Stage::Fruiting => "fruiting",
            Stage::Senescence => "senescence",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// WEATHER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wind {
    Calm,
    Light,
    Moderate,
    Strong,
}

impl Wind {
    pub fn label(self) -> &'static str {
        match self {
            Wind::Calm => "calm",
            Wind::Light => "light",
            Wind::Moderate => "moderate",
            Wind::Strong => "strong",
        }
    }
}

/// Multi-week special weather events. Parameters ride on the variant so the
/// soil and weather systems can read them without a side table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialEvent {
    Drought { moisture_penalty: f32 },
    HeavyRain { flood_risk: f32 },
    Heatwave { temp_bonus_c: f32 },
    EarlyFrost,
    IndianSummer { temp_bonus_c: f32 },
}

impl SpecialEvent {
    pub fn label(&self) -> &'static str {
        match self {
            SpecialEvent::Drought { .. } => "drought",
            SpecialEvent::HeavyRain { .. } => "heavy_rain",
            SpecialEvent::Heatwave { .. } => "heatwave",
            SpecialEvent::EarlyFrost => "early_frost",
            SpecialEvent::IndianSummer { .. } => "indian_summer",
        }
    }

    /// Air-temperature bonus applied to the weekly high while active.
    pub fn temp_bonus_c(&self) -> f32 {
        match self {
            SpecialEvent::Heatwave { temp_bonus_c } => *temp_bonus_c,
            SpecialEvent::IndianSummer { temp_bonus_c } => *temp_bonus_c,
            _ => 0.0,
        }
    }
}

/// One generated week of weather. The full 30-week schedule is fixed at
/// session start from `(zone, seed)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekWeather {
    pub week: u32,
    pub temp_high_c: f32,
    pub temp_low_c: f32,
    pub precipitation_mm: f32,
    pub humidity: f32,
    pub wind: Wind,
    pub frost: bool,
    pub special: Option<SpecialEvent>,
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS — plots
// ═══════════════════════════════════════════════════════════════════════

/// Position on the integer grid. Carried by plot, plant, and weed entities.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlotSlot {
    pub row: i32,
    pub col: i32,
}

impl PlotSlot {
    pub fn pos(&self) -> (i32, i32) {
        (self.row, self.col)
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunExposure {
    Full,
    Partial,
    Shade,
}

/// The nine soil fields. `ph` lives in [3, 10], `temperature_c` is
/// unbounded, everything else is a [0, 1] fraction.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Soil {
    pub ph: f32,
    pub nitrogen: f32,
    pub phosphorus: f32,
    pub potassium: f32,
    pub organic_matter: f32,
    pub moisture: f32,
    pub compaction: f32,
    pub biology: f32,
    pub temperature_c: f32,
}

impl Soil {
    /// Neutral starting profile for a fresh plot.
    // Fixed 20 °C start regardless of zone; early-season stalls for
    // warm-season crops in cold zones are a known artifact of this choice.
    pub fn starting_profile() -> Self {
        Self {
            ph: 6.5,
            nitrogen: 0.7,
            phosphorus: 0.65,
            potassium: 0.7,
            organic_matter: 0.5,
            moisture: 0.55,
            compaction: 0.3,
            biology: 0.5,
            temperature_c: 20.0,
        }
    }

    /// Re-clamp every field to its declared range.
    pub fn clamp_all(&mut self) {
        self.ph = self.ph.clamp(3.0, 10.0);
        self.nitrogen = self.nitrogen.clamp(0.0, 1.0);
        self.phosphorus = self.phosphorus.clamp(0.0, 1.0);
        self.potassium = self.potassium.clamp(0.0, 1.0);
        self.organic_matter = self.organic_matter.clamp(0.0, 1.0);
        self.moisture = self.moisture.clamp(0.0, 1.0);
        self.compaction = self.compaction.clamp(0.0, 1.0);
        self.biology = self.biology.clamp(0.0, 1.0);
    }

    pub fn get(&self, field: SoilField) -> f32 {
        match field {
            SoilField::Ph => self.ph,
            SoilField::Nitrogen => self.nitrogen,
            SoilField::Phosphorus => self.phosphorus,
            SoilField::Potassium => self.potassium,
            SoilField::OrganicMatter => self.organic_matter,
            SoilField::Moisture => self.moisture,
            SoilField::Compaction => self.compaction,
            SoilField::Biology => self.biology,
            SoilField::TemperatureC => self.temperature_c,
        }
    }

    pub fn apply_delta(&mut self, field: SoilField, delta: f32) {
        match field {
            SoilField::Ph => self.ph += delta,
            SoilField::Nitrogen => self.nitrogen += delta,
            SoilField::Phosphorus => self.phosphorus += delta,
            SoilField::Potassium => self.potassium += delta,
            SoilField::OrganicMatter => self.organic_matter += delta,
            SoilField::Moisture => self.moisture += delta,
            SoilField::Compaction => self.compaction += delta,
            SoilField::Biology => self.biology += delta,
            SoilField::TemperatureC => self.temperature_c += delta,
        }
        self.clamp_all();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilField {
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
    OrganicMatter,
    Moisture,
    Compaction,
    Biology,
    TemperatureC,
}

/// Amendments queued on a plot; applied by the soil system once mature,
/// then removed.
#[derive(Component, Debug, Clone, Default)]
pub struct PendingAmendments(pub Vec<PendingAmendment>);

#[derive(Debug, Clone)]
pub struct PendingAmendment {
    pub amendment_id: AmendmentId,
    pub applied_week: u32,
    pub effect_delay_weeks: u32,
    /// Field deltas in catalog order — kept as a list so application order
    /// is deterministic.
    pub effects: Vec<(SoilField, f32)>,
}

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS — plants
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct PlantSpecies(pub SpeciesId);

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Growth {
    /// Lifetime progress in [0, 1]. 0 = seed, 1 = senescence.
    pub progress: f32,
    pub stage: Stage,
    pub rate_modifier: f32,
}

impl Growth {
    pub fn sown() -> Self {
        Self {
            progress: 0.0,
            stage: Stage::Seed,
            rate_modifier: 1.0,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    /// Derived each tick from stress and condition stages. [0, 1].
    pub value: f32,
    /// Accumulated stress. [0, 1].
    pub stress: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self {
            value: 1.0,
            stress: 0.0,
        }
    }
}

/// Active conditions, unique by condition id within one plant.
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveConditions(pub Vec<ConditionEntry>);

impl ActiveConditions {
    pub fn has(&self, condition: &str) -> bool {
        self.0.iter().any(|c| c.condition_id == condition)
    }

    pub fn get(&self, condition: &str) -> Option<&ConditionEntry> {
        self.0.iter().find(|c| c.condition_id == condition)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionEntry {
    pub condition_id: ConditionId,
    pub onset_week: u32,
    /// Index into the vulnerability's symptom stage list.
    pub current_stage: usize,
    pub severity: f32,
}

impl ConditionEntry {
    pub fn onset(condition_id: ConditionId, week: u32) -> Self {
        Self {
            condition_id,
            onset_week: week,
            current_stage: 0,
            severity: 0.1,
        }
    }
}

/// Player interventions awaiting delayed feedback.
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveTreatments(pub Vec<TreatmentEntry>);

#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentEntry {
    pub action: TreatmentId,
    pub target_condition: Option<ConditionId>,
    pub applied_week: u32,
    pub feedback_week: u32,
}

/// Neighbor buffs/debuffs. Rebuilt from scratch by the companion system
/// every tick — never accumulated.
#[derive(Component, Debug, Clone, Default)]
pub struct CompanionBuffs(pub Vec<CompanionBuff>);

#[derive(Debug, Clone)]
pub struct CompanionBuff {
    pub source: SpeciesId,
    pub effects: Vec<CompanionEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanionEffect {
    pub kind: CompanionEffectKind,
    pub modifier: f32,
    pub radius: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanionEffectKind {
    /// Additive growth-rate bonus for the affected neighbor.
    GrowthRate,
    /// Growth penalty from an antagonist's root/leaf chemistry.
    Allelopathy,
    /// Fractional reduction of pest-event severity on the neighbor.
    PestDeterrent,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HarvestState {
    pub ripe: bool,
    pub remaining: u32,
    pub quality: f32,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Perennial {
    pub years_established: u32,
    pub dormant: bool,
}

/// Terminal marker. Never removed; the only state change a dead plant can
/// still take is the perennial dormancy reassignment in the frost system.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

/// Meta-progression marker set by the spread system for self-seeding
/// species that reached fruiting or senescence.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SelfSeeded;

// ═══════════════════════════════════════════════════════════════════════
// COMPONENTS — weeds
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Weed {
    pub severity: f32,
}

// ═══════════════════════════════════════════════════════════════════════
// SPECIES CATALOG
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantFamily {
    Solanaceae,
    Lamiaceae,
    Brassicaceae,
    Cucurbitaceae,
    Asteraceae,
    Rosaceae,
    Amaranthaceae,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantType {
    Annual,
    Perennial,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    pub stage: Stage,
    /// Duration range in weeks. The midpoint defines the stage's share of
    /// the progress axis.
    pub weeks: (f32, f32),
}

impl StageDef {
    pub fn midpoint(&self) -> f32 {
        (self.weeks.0 + self.weeks.1) * 0.5
    }
}

/// How forgiving a species is around each environmental ideal. Bands pick
/// the sigma of the Gaussian fit in the limiting-factor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceBand {
    Narrow,
    Typical,
    Broad,
}

impl ToleranceBand {
    pub fn ph_sigma(self) -> f32 {
        match self {
            ToleranceBand::Narrow => 0.6,
            ToleranceBand::Typical => 0.9,
            ToleranceBand::Broad => 1.3,
        }
    }

    pub fn moisture_sigma(self) -> f32 {
        match self {
            ToleranceBand::Narrow => 0.18,
            ToleranceBand::Typical => 0.25,
            ToleranceBand::Broad => 0.35,
        }
    }

    pub fn temp_sigma(self) -> f32 {
        match self {
            ToleranceBand::Narrow => 4.0,
            ToleranceBand::Typical => 6.0,
            ToleranceBand::Broad => 9.0,
        }
    }

    pub fn nutrient_sigma(self) -> f32 {
        match self {
            ToleranceBand::Narrow => 0.18,
            ToleranceBand::Typical => 0.25,
            ToleranceBand::Broad => 0.35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    pub ph: f32,
    pub moisture: f32,
    pub soil_temp_c: f32,
    pub nitrogen: f32,
    pub phosphorus: f32,
    pub potassium: f32,
    pub sun: SunExposure,
    pub temp_band: ToleranceBand,
    pub water_band: ToleranceBand,
    pub nutrient_band: ToleranceBand,
    /// Multiplier on the per-tick N/P/K uptake.
    pub nutrient_demand: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanionRule {
    pub species: SpeciesId,
    pub effects: Vec<CompanionEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    HumidityHigh,
    HumidityLow,
    TempHigh,
    TempLow,
    Overwater,
    Underwater,
    PhHigh,
    PhLow,
    NutrientDeficiency,
    NutrientExcess,
    Crowding,
    PestVector,
}

/// One environmental trigger. `threshold` is in the measurement's own unit
/// (fraction, °C, pH points, neighbor count, …); scores ramp linearly up to
/// 1.0 once the measurement passes the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDef {
    pub kind: TriggerKind,
    pub threshold: f32,
    /// For `pest_vector`: restrict to one vector. Absent means any active
    /// pest targeting the plant's family counts.
    #[serde(default)]
    pub pest: Option<PestId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomStage {
    /// Week offset from onset at which this stage becomes current.
    pub week: u32,
    pub description: String,
    /// Visual overlay key; feeds the diagnosis tag table.
    pub overlay: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnerabilityDef {
    pub condition: ConditionId,
    pub susceptibility: f32,
    pub triggers: Vec<TriggerDef>,
    /// Earliest stage that can contract the condition. Seed and germination
    /// are always immune; absent defaults to seedling.
    pub min_stage: Option<Stage>,
    pub symptoms: Vec<SymptomStage>,
    pub weeks_to_death: Option<u32>,
    /// Present when the condition spreads to same-vulnerability neighbors.
    pub spread_radius: Option<i32>,
}

impl VulnerabilityDef {
    pub fn effective_min_stage(&self) -> Stage {
        self.min_stage.unwrap_or(Stage::Seedling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunnerSpread {
    pub rate: f32,
    pub radius: i32,
    pub min_stage: Stage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelfSeedSpread {
    pub rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpreadingDef {
    pub runner: Option<RunnerSpread>,
    pub self_seed: Option<SelfSeedSpread>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarvestDef {
    /// Inclusive week window in which the species can ripen.
    pub window: (u32, u32),
    pub yield_potential: u32,
    pub continuous_harvest: bool,
}

impl HarvestDef {
    pub fn in_window(&self, week: u32) -> bool {
        week >= self.window.0 && week <= self.window.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrostTolerance {
    None,
    Light,
    Moderate,
    Hard,
}

impl FrostTolerance {
    /// A frost kills when its severity exceeds this threshold.
    pub fn kill_threshold(self) -> Option<f32> {
        match self {
            FrostTolerance::None => Some(0.0),
            FrostTolerance::Light => Some(0.5),
            FrostTolerance::Moderate => Some(0.8),
            FrostTolerance::Hard => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDef {
    pub id: SpeciesId,
    pub name: String,
    pub family: PlantFamily,
    pub plant_type: PlantType,
    pub stages: Vec<StageDef>,
    pub needs: Needs,
    /// Recommended sowing window (weeks, inclusive). Informational.
    pub season_window: (u32, u32),
    pub companions: Vec<CompanionRule>,
    pub antagonists: Vec<CompanionRule>,
    pub vulnerabilities: Vec<VulnerabilityDef>,
    #[serde(default)]
    pub spreading: Option<SpreadingDef>,
    pub harvest: HarvestDef,
    pub frost_tolerance: FrostTolerance,
}

impl SpeciesDef {
    /// Expected weeks from seed to senescence (sum of stage midpoints).
    pub fn total_weeks(&self) -> f32 {
        self.stages.iter().map(StageDef::midpoint).sum()
    }

    /// Baseline progress per tick before modifiers.
    pub fn base_rate(&self) -> f32 {
        let total = self.total_weeks();
        if total <= 0.0 {
            0.0
        } else {
            1.0 / total
        }
    }

    /// Map lifetime progress onto a stage using cumulative midpoint
    /// segments. Progress 0 is seed; progress 1 is senescence.
    pub fn stage_for_progress(&self, progress: f32) -> Stage {
        if progress >= 1.0 {
            return Stage::Senescence;
        }
        let total = self.total_weeks();
        if total <= 0.0 {
            return Stage::Seed;
        }
        let mut cumulative = 0.0;
        for def in &self.stages {
            cumulative += def.midpoint() / total;
            if progress < cumulative {
                return def.stage;
            }
        }
        Stage::Senescence
    }

    pub fn vulnerability(&self, condition: &str) -> Option<&VulnerabilityDef> {
        self.vulnerabilities.iter().find(|v| v.condition == condition)
    }
}

/// Gaussian fit of an observed value against a species ideal.
pub fn gaussian_fit(value: f32, ideal: f32, sigma: f32) -> f32 {
    if sigma <= 0.0 {
        return if (value - ideal).abs() < f32::EPSILON { 1.0 } else { 0.0 };
    }
    let d = value - ideal;
    (-(d * d) / (2.0 * sigma * sigma)).exp()
}

// ═══════════════════════════════════════════════════════════════════════
// CLIMATE ZONES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecipPattern {
    WinterWet,
    SummerWet,
    Even,
    Arid,
}

/// A candidate special event with its weekly Bernoulli weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneEventSpec {
    pub event: SpecialEvent,
    pub weight: f32,
    pub duration_weeks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDef {
    pub id: ZoneId,
    pub name: String,
    /// Mean weekly temperature high for each of the 30 weeks.
    pub temp_curve_c: Vec<f32>,
    pub variance: f32,
    pub precip_pattern: PrecipPattern,
    /// Inclusive frost-free window; frost probability is zero strictly
    /// before the window's end.
    pub frost_free: (u32, u32),
    pub first_frost_week_avg: f32,
    pub humidity_baseline: f32,
    /// Candidate special events in fixed roll order.
    pub events: Vec<ZoneEventSpec>,
    /// Pest weights in fixed roll order. Unknown pest ids are ignored.
    pub pests: Vec<(PestId, f32)>,
}

impl ZoneDef {
    /// Sigmoid frost probability; exactly 0.5 at the average first-frost
    /// week, zero strictly before the frost-free window ends.
    pub fn frost_probability(&self, week: u32) -> f32 {
        if week < self.frost_free.1 {
            return 0.0;
        }
        let x = -0.5 * (week as f32 - self.first_frost_week_avg);
        1.0 / (1.0 + x.exp())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AMENDMENTS, TREATMENTS, CONDITIONS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmendmentDef {
    pub id: AmendmentId,
    pub name: String,
    pub effect_delay_weeks: u32,
    pub effects: Vec<(SoilField, f32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentDef {
    pub id: TreatmentId,
    pub name: String,
    /// Condition ids this action actually counters. Empty for pull_plant,
    /// which resolves by a special case instead.
    pub counters: Vec<ConditionId>,
    pub feedback_delay_weeks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Fungal,
    Pest,
    Abiotic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionDef {
    pub id: ConditionId,
    pub name: String,
    pub category: ConditionCategory,
}

// ═══════════════════════════════════════════════════════════════════════
// PESTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PestDef {
    pub id: PestId,
    pub name: String,
    pub target_families: Vec<PlantFamily>,
    pub severity_range: (f32, f32),
    pub duration_range: (u32, u32),
    pub earliest_week: u32,
    pub min_gap_weeks: u32,
    pub visual: String,
}

/// A scheduled pest arrival. The full schedule is fixed at session start
/// from `(zone, seed)` on an independent RNG sub-stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestEvent {
    pub pest_id: PestId,
    pub arrival_week: u32,
    pub severity: f32,
    pub duration_weeks: u32,
}

impl PestEvent {
    pub fn active_during(&self, week: u32) -> bool {
        week >= self.arrival_week && week < self.arrival_week + self.duration_weeks
    }
}

// ═══════════════════════════════════════════════════════════════════════
// REGISTRIES (read-only resources)
// ═══════════════════════════════════════════════════════════════════════

#[derive(Resource, Debug, Clone, Default)]
pub struct SpeciesRegistry {
    pub species: HashMap<SpeciesId, SpeciesDef>,
}

impl SpeciesRegistry {
    pub fn get(&self, id: &str) -> Option<&SpeciesDef> {
        self.species.get(id)
    }
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ZoneRegistry {
    pub zones: HashMap<ZoneId, ZoneDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct AmendmentRegistry {
    pub amendments: HashMap<AmendmentId, AmendmentDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TreatmentRegistry {
    pub treatments: HashMap<TreatmentId, TreatmentDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ConditionRegistry {
    pub conditions: HashMap<ConditionId, ConditionDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PestRegistry {
    pub pests: HashMap<PestId, PestDef>,
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD INDEX
// ═══════════════════════════════════════════════════════════════════════

/// Grid dimensions plus `(row, col) → Entity` indexes for plots, plants,
/// and weeds. Point lookups only — systems iterate via queries, never via
/// these maps, so map ordering can't leak into RNG consumption order.
#[derive(Resource, Debug, Default)]
pub struct GardenMap {
    pub rows: i32,
    pub cols: i32,
    pub plots: HashMap<(i32, i32), Entity>,
    pub plants: HashMap<(i32, i32), Entity>,
    pub weeds: HashMap<(i32, i32), Entity>,
}

impl GardenMap {
    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        row >= 0 && row < self.rows && col >= 0 && col < self.cols
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TICK CONTEXT & REPORT
// ═══════════════════════════════════════════════════════════════════════

/// Read-only context shared by every system in one tick.
#[derive(Resource, Debug, Clone)]
pub struct TickContext {
    pub week: u32,
    pub weather: WeekWeather,
    pub first_frost_week_avg: f32,
    pub frost_free: (u32, u32),
    /// Pest events active this week, in schedule order.
    pub active_pests: Vec<PestEvent>,
}

impl TickContext {
    pub fn frost_probability(&self) -> f32 {
        if self.week < self.frost_free.1 {
            return 0.0;
        }
        let x = -0.5 * (self.week as f32 - self.first_frost_week_avg);
        1.0 / (1.0 + x.exp())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrostResult {
    pub killing_frost: bool,
    /// One entry per plant killed, duplicates included.
    pub killed: Vec<SpeciesId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreatmentResult {
    Resolved,
    Stabilized,
    Ineffective,
    Worsened,
}

impl TreatmentResult {
    pub fn label(self) -> &'static str {
        match self {
            TreatmentResult::Resolved => "resolved",
            TreatmentResult::Stabilized => "stabilized",
            TreatmentResult::Ineffective => "ineffective",
            TreatmentResult::Worsened => "worsened",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TreatmentOutcome {
    pub row: i32,
    pub col: i32,
    pub species: SpeciesId,
    pub action: TreatmentId,
    pub target_condition: Option<ConditionId>,
    pub result: TreatmentResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Disease,
    Frost,
    Pulled,
}

/// Diff summary produced by one tick. Reset before the pipeline runs;
/// systems append as they mutate.
#[derive(Resource, Debug, Clone, Default)]
pub struct TickReport {
    pub week: u32,
    pub new_conditions: Vec<(i32, i32, ConditionId)>,
    pub spread_infections: Vec<(i32, i32, ConditionId)>,
    pub deaths: Vec<(i32, i32, SpeciesId, DeathCause)>,
    pub runner_spawns: Vec<(i32, i32, SpeciesId)>,
    pub self_seeded: Vec<SpeciesId>,
    pub new_weeds: Vec<(i32, i32)>,
    pub ripened: Vec<(i32, i32, SpeciesId)>,
    pub treatment_outcomes: Vec<TreatmentOutcome>,
    pub frost: FrostResult,
}

impl TickReport {
    pub fn reset(&mut self, week: u32) {
        *self = TickReport {
            week,
            ..Default::default()
        };
    }
}
