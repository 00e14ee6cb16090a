//! Data layer — populates every registry at session start.
//!
//! All built-in catalog content is hard-coded in submodules, mirroring the
//! structure of the external JSON formats; `*_from_json` loaders accept
//! replacement catalogs with structural validation at load time. Nothing in
//! the tick path ever parses JSON.

mod amendments;
mod conditions;
mod pests;
mod species;
mod zones;

pub use conditions::{overlay_tags, SIMILAR_CONDITIONS};

use bevy::prelude::*;

use crate::shared::*;

/// Build and insert every registry into a fresh world.
pub fn insert_registries(world: &mut World) {
    let mut species_registry = SpeciesRegistry::default();
    species::populate_species(&mut species_registry);

    let mut zone_registry = ZoneRegistry::default();
    zones::populate_zones(&mut zone_registry);

    let mut amendment_registry = AmendmentRegistry::default();
    amendments::populate_amendments(&mut amendment_registry);

    let mut treatment_registry = TreatmentRegistry::default();
    conditions::populate_treatments(&mut treatment_registry);

    let mut condition_registry = ConditionRegistry::default();
    conditions::populate_conditions(&mut condition_registry);

    let mut pest_registry = PestRegistry::default();
    pests::populate_pests(&mut pest_registry);

    debug!(
        "registries: {} species, {} zones, {} amendments, {} treatments, {} conditions, {} pests",
        species_registry.species.len(),
        zone_registry.zones.len(),
        amendment_registry.amendments.len(),
        treatment_registry.treatments.len(),
        condition_registry.conditions.len(),
        pest_registry.pests.len(),
    );

    world.insert_resource(species_registry);
    world.insert_resource(zone_registry);
    world.insert_resource(amendment_registry);
    world.insert_resource(treatment_registry);
    world.insert_resource(condition_registry);
    world.insert_resource(pest_registry);
}

/// Parse an external species catalog. Structural validation only; semantic
/// tuning lives with whoever authored the file.
pub fn species_from_json(json: &str) -> Result<Vec<SpeciesDef>, String> {
    let defs: Vec<SpeciesDef> = serde_json::from_str(json).map_err(|e| e.to_string())?;
    for def in &defs {
        if def.stages.is_empty() {
            return Err(format!("species `{}` has no growth stages", def.id));
        }
        if def.harvest.window.0 > def.harvest.window.1 {
            return Err(format!("species `{}` has an inverted harvest window", def.id));
        }
    }
    Ok(defs)
}

/// Parse an external climate-zone catalog.
pub fn zones_from_json(json: &str) -> Result<Vec<ZoneDef>, String> {
    let defs: Vec<ZoneDef> = serde_json::from_str(json).map_err(|e| e.to_string())?;
    for def in &defs {
        if def.temp_curve_c.len() != SEASON_WEEKS as usize {
            return Err(format!(
                "zone `{}` needs a {SEASON_WEEKS}-week temperature curve, got {}",
                def.id,
                def.temp_curve_c.len()
            ));
        }
    }
    Ok(defs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogs_cross_reference_cleanly() {
        let mut world = World::new();
        insert_registries(&mut world);

        let species = world.resource::<SpeciesRegistry>().clone();
        let conditions = world.resource::<ConditionRegistry>().clone();
        let treatments = world.resource::<TreatmentRegistry>().clone();
        let pests = world.resource::<PestRegistry>().clone();

        // Every vulnerability references a cataloged condition, every
        // pest_vector trigger a cataloged pest, and every symptom overlay
        // has a tag-table entry.
        for def in species.species.values() {
            for vuln in &def.vulnerabilities {
                assert!(
                    conditions.conditions.contains_key(&vuln.condition),
                    "{} references unknown condition {}",
                    def.id,
                    vuln.condition
                );
                assert!(!vuln.symptoms.is_empty(), "{} has an empty symptom list", vuln.condition);
                for trigger in &vuln.triggers {
                    if let Some(pest) = &trigger.pest {
                        assert!(pests.pests.contains_key(pest));
                    }
                }
                for symptom in &vuln.symptoms {
                    assert!(
                        !overlay_tags(&symptom.overlay).is_empty(),
                        "overlay `{}` has no tags",
                        symptom.overlay
                    );
                }
            }
        }

        // Every treatment counter names a cataloged condition.
        for def in treatments.treatments.values() {
            for countered in &def.counters {
                assert!(conditions.conditions.contains_key(countered));
            }
        }
    }

    #[test]
    fn zone_curves_span_the_season() {
        let mut world = World::new();
        insert_registries(&mut world);
        let zones = world.resource::<ZoneRegistry>();
        for zone in zones.zones.values() {
            assert_eq!(zone.temp_curve_c.len(), SEASON_WEEKS as usize);
            assert!(zone.frost_free.0 < zone.frost_free.1);
        }
    }

    #[test]
    fn species_round_trip_through_json() {
        let mut registry = SpeciesRegistry::default();
        super::species::populate_species(&mut registry);
        let tomato = registry.get("tomato_cherokee_purple").unwrap();
        let json = serde_json::to_string(&vec![tomato.clone()]).unwrap();
        let parsed = species_from_json(&json).unwrap();
        assert_eq!(parsed[0].id, tomato.id);
        assert_eq!(parsed[0].stages.len(), tomato.stages.len());
    }
}
